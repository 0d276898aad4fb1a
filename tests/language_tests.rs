// End-to-end language behavior: scanning, precedence, evaluation, and the
// runtime error taxonomy, driven through the public library API.

use rbasic::error::{BasicError, ErrorKind};
use rbasic::interpreter::Interpreter;
use rbasic::parser::Parser;
use rbasic::scanner::Scanner;
use rbasic::token::TokenKind;
use rbasic::value::Value;

fn scan(source: &str) -> Vec<rbasic::token::Token> {
    let mut scanner = Scanner::new(source.to_string());
    scanner.scan_tokens().expect("scan failed")
}

fn run_program(source: &str) -> Result<Interpreter, BasicError> {
    let mut scanner = Scanner::new(source.to_string());
    let tokens = scanner.scan_tokens()?;
    let mut parser = Parser::new(tokens);
    let program = parser.parse()?;
    let mut interpreter = Interpreter::new();
    interpreter.interpret(&program)?;
    Ok(interpreter)
}

fn variable(interpreter: &Interpreter, name: &str) -> Value {
    interpreter
        .environment()
        .get(name)
        .unwrap_or_else(|| panic!("variable {} not set", name))
}

fn expect_error(source: &str) -> BasicError {
    match run_program(source) {
        Ok(_) => panic!("program succeeded but was expected to fail: {:?}", source),
        Err(error) => error,
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

#[test]
fn scanner_classifies_and_positions_tokens() {
    let tokens = scan("LET count = 3.14 + 7");

    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Let,
            TokenKind::Ident,
            TokenKind::Equal,
            TokenKind::FloatLit,
            TokenKind::Add,
            TokenKind::IntLit,
            TokenKind::Eol,
            TokenKind::Eof,
        ]
    );

    assert_eq!(tokens[1].lexeme, "count");
    assert_eq!((tokens[1].span.line, tokens[1].span.column), (1, 5));
    assert_eq!(tokens[3].lexeme, "3.14");
    assert_eq!((tokens[3].span.line, tokens[3].span.column), (1, 13));
    assert_eq!(tokens[5].lexeme, "7");
    assert_eq!((tokens[5].span.line, tokens[5].span.column), (1, 20));
}

#[test]
fn scanner_matches_keywords_case_insensitively() {
    let tokens = scan("let while Loop pRiNt");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Let,
            TokenKind::While,
            TokenKind::Loop,
            TokenKind::Print,
            TokenKind::Eol,
            TokenKind::Eof,
        ]
    );
    // original-case lexemes are preserved
    assert_eq!(tokens[2].lexeme, "Loop");
}

#[test]
fn scanner_caps_identifiers_at_31_characters() {
    let name = "a".repeat(35);
    let tokens = scan(&name);

    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[0].lexeme.len(), 31);
    assert_eq!(tokens[1].kind, TokenKind::Ident);
    assert_eq!(tokens[1].lexeme.len(), 4);
}

#[test]
fn scanner_matches_two_character_operators() {
    let tokens = scan("1 <= 2 >= 3");
    assert_eq!(tokens[1].kind, TokenKind::NotGreater);
    assert_eq!(tokens[1].lexeme, "<=");
    assert_eq!(tokens[3].kind, TokenKind::NotLess);
    assert_eq!(tokens[3].lexeme, ">=");
}

#[test]
fn scanner_emits_eol_for_empty_lines() {
    let tokens = scan("PRINT 1\n\nPRINT 2");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Print,
            TokenKind::IntLit,
            TokenKind::Eol,
            TokenKind::Eol,
            TokenKind::Print,
            TokenKind::IntLit,
            TokenKind::Eol,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn scanner_reports_unknown_lexeme_position() {
    let mut scanner = Scanner::new("LET X = $".to_string());
    let error = scanner.scan_tokens().unwrap_err();

    assert_eq!(error.kind, ErrorKind::UnmatchedLexeme);
    assert_eq!((error.span.line, error.span.column), (1, 9));
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[test]
fn multiplication_binds_tighter_than_addition() {
    let interpreter = run_program("LET X = 1 + 2 * 3").unwrap();
    assert_eq!(variable(&interpreter, "X"), Value::Int(7));
}

#[test]
fn parentheses_reset_precedence() {
    let interpreter = run_program("LET X = (1 + 2) * 3").unwrap();
    assert_eq!(variable(&interpreter, "X"), Value::Int(9));
}

#[test]
fn subtraction_is_left_associative() {
    let interpreter = run_program("LET X = 10 - 3 - 2").unwrap();
    assert_eq!(variable(&interpreter, "X"), Value::Int(5));
}

#[test]
fn division_produces_a_true_quotient() {
    let interpreter = run_program("LET X = 7 / 2").unwrap();
    assert_eq!(variable(&interpreter, "X"), Value::Float(3.5));
}

#[test]
fn mixing_int_and_float_promotes_to_float() {
    let interpreter = run_program("LET X = 1 + 0.5\nLET Y = 2.0 * 3").unwrap();
    assert_eq!(variable(&interpreter, "X"), Value::Float(1.5));
    assert_eq!(variable(&interpreter, "Y"), Value::Float(6.0));
}

#[test]
fn unary_minus_negates_and_stacks() {
    let interpreter = run_program("LET X = -5\nLET Y = --5\nLET Z = +3").unwrap();
    assert_eq!(variable(&interpreter, "X"), Value::Int(-5));
    assert_eq!(variable(&interpreter, "Y"), Value::Int(5));
    assert_eq!(variable(&interpreter, "Z"), Value::Int(3));
}

#[test]
fn relational_operators_produce_booleans() {
    let interpreter = run_program("LET X = 1 = 1\nLET Y = 2 <= 1").unwrap();
    assert_eq!(variable(&interpreter, "X"), Value::Bool(true));
    assert_eq!(variable(&interpreter, "Y"), Value::Bool(false));
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[test]
fn assignment_round_trips_through_the_environment() {
    let interpreter = run_program("LET X = 5\nLET Y = X + 1").unwrap();
    assert_eq!(variable(&interpreter, "X"), Value::Int(5));
    assert_eq!(variable(&interpreter, "Y"), Value::Int(6));
}

#[test]
fn reassignment_overwrites_the_binding() {
    let interpreter = run_program("LET X = 1\nLET X = X + 1").unwrap();
    assert_eq!(variable(&interpreter, "X"), Value::Int(2));
}

#[test]
fn loop_runs_body_while_condition_holds() {
    let interpreter = run_program(
        "LET I = 0\nLET N = 0\nDO WHILE I < 3\nLET I = I + 1\nLET N = N + 1\nLOOP",
    )
    .unwrap();
    assert_eq!(variable(&interpreter, "I"), Value::Int(3));
    assert_eq!(variable(&interpreter, "N"), Value::Int(3));
}

#[test]
fn loop_with_false_condition_never_runs() {
    let interpreter = run_program("DO WHILE 1 > 2\nLET X = 1\nLOOP").unwrap();
    assert_eq!(interpreter.environment().get("X"), None);
}

#[test]
fn conditional_gates_its_body() {
    let interpreter = run_program("IF 1 > 2 THEN\nLET X = 1\nEND IF").unwrap();
    assert_eq!(interpreter.environment().get("X"), None);

    let interpreter = run_program("LET N = 0\nIF 2 > 1 THEN\nLET N = N + 1\nEND IF").unwrap();
    assert_eq!(variable(&interpreter, "N"), Value::Int(1));
}

#[test]
fn numeric_conditions_use_nonzero_truthiness() {
    let interpreter = run_program("LET X = 0\nIF 1 THEN\nLET X = 1\nEND IF").unwrap();
    assert_eq!(variable(&interpreter, "X"), Value::Int(1));
}

#[test]
fn blocks_nest() {
    let source = "LET I = 0\n\
                  LET BIG = 0\n\
                  DO WHILE I < 4\n\
                  LET I = I + 1\n\
                  IF I > 2 THEN\n\
                  LET BIG = BIG + 1\n\
                  END IF\n\
                  LOOP";
    let interpreter = run_program(source).unwrap();
    assert_eq!(variable(&interpreter, "I"), Value::Int(4));
    assert_eq!(variable(&interpreter, "BIG"), Value::Int(2));
}

#[test]
fn end_statement_has_no_effect() {
    let interpreter = run_program("LET X = 1\nEND\nLET Y = 2").unwrap();
    assert_eq!(variable(&interpreter, "Y"), Value::Int(2));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn reading_an_unassigned_variable_fails() {
    let error = expect_error("PRINT X");
    assert_eq!(error.kind, ErrorKind::UndefinedVariable);
    assert!(error.message.contains("X"));
}

#[test]
fn division_by_zero_is_reported() {
    let error = expect_error("PRINT 1 / 0");
    assert_eq!(error.kind, ErrorKind::DivisionByZero);

    let error = expect_error("LET X = 0\nPRINT 2.5 / X");
    assert_eq!(error.kind, ErrorKind::DivisionByZero);
}

#[test]
fn arithmetic_on_booleans_is_an_illegal_operator() {
    let error = expect_error("PRINT (1 < 2) + 3");
    assert_eq!(error.kind, ErrorKind::IllegalOperator);
}

#[test]
fn parse_errors_carry_category_and_position() {
    let error = expect_error("LET X = (1 + 2");
    assert_eq!(error.kind, ErrorKind::MismatchedParenthesis);
    assert_eq!((error.span.line, error.span.column), (1, 15));

    let error = expect_error("X = 5");
    assert_eq!(error.kind, ErrorKind::InvalidStatement);

    let error = expect_error("LET 5 = X");
    assert_eq!(error.kind, ErrorKind::InvalidAssignment);

    let error = expect_error("DO UNTIL X < 3");
    assert_eq!(error.kind, ErrorKind::InvalidLoop);

    let error = expect_error("IF 1 THEN PRINT 1");
    assert_eq!(error.kind, ErrorKind::InvalidIfStatement);
}

// ---------------------------------------------------------------------------
// Parsing and display
// ---------------------------------------------------------------------------

#[test]
fn parsing_the_same_source_twice_yields_equal_trees() {
    let source = "LET I = 0\nDO WHILE I < 3\nLET I = I + 1\nLOOP\nPRINT I";

    let parse = |src: &str| {
        let mut scanner = Scanner::new(src.to_string());
        let tokens = scanner.scan_tokens().unwrap();
        Parser::new(tokens).parse().unwrap()
    };

    assert_eq!(parse(source), parse(source));
}

#[test]
fn values_display_in_natural_numeric_form() {
    assert_eq!(Value::Int(3).to_string(), "3");
    assert_eq!(Value::Int(-7).to_string(), "-7");
    assert_eq!(Value::Float(3.0).to_string(), "3.0");
    assert_eq!(Value::Float(3.5).to_string(), "3.5");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::Bool(false).to_string(), "false");
}

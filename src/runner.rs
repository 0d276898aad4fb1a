use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::scanner::Scanner;

/// Drives the full pipeline over one source text and reports the first
/// error against it. Each stage either completes or aborts the run.
pub fn run(source: &str, filename: Option<&str>) {
    let mut scanner = Scanner::new(source.to_string());
    let tokens = match scanner.scan_tokens() {
        Ok(tokens) => tokens,
        Err(error) => {
            error.report(source, filename);
            return;
        }
    };

    let mut parser = Parser::new(tokens);
    let program = match parser.parse() {
        Ok(program) => program,
        Err(error) => {
            error.report(source, filename);
            return;
        }
    };

    let mut interpreter = Interpreter::new();
    if let Err(error) = interpreter.interpret(&program) {
        error.report(source, filename);
    }
}

/// Prints the token stream one token per line instead of running.
pub fn dump_tokens(source: &str, filename: Option<&str>) {
    let mut scanner = Scanner::new(source.to_string());
    match scanner.scan_tokens() {
        Ok(tokens) => {
            for token in tokens {
                println!("{}", token);
            }
        }
        Err(error) => error.report(source, filename),
    }
}

/// Prints the parsed program instead of running it.
pub fn dump_ast(source: &str, filename: Option<&str>) {
    let mut scanner = Scanner::new(source.to_string());
    let tokens = match scanner.scan_tokens() {
        Ok(tokens) => tokens,
        Err(error) => {
            error.report(source, filename);
            return;
        }
    };

    let mut parser = Parser::new(tokens);
    match parser.parse() {
        Ok(program) => println!("{:#?}", program),
        Err(error) => error.report(source, filename),
    }
}

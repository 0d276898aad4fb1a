use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::scanner::Scanner;
use crate::token::TokenKind;
use std::io::{self, Write};

/// Interactive mode with persistent variable state between commands.
///
/// The language is line-oriented and block statements span lines, so input
/// is buffered while a DO WHILE or IF block is still open and run once the
/// block depth returns to zero.
pub fn start() {
    println!("rbasic v0.1.0");
    println!("Type 'exit' or press Ctrl+D to quit");
    println!();

    let mut interpreter = Interpreter::new();
    let mut buffer = String::new();
    let mut depth: i64 = 0;

    loop {
        if buffer.is_empty() {
            print!("> ");
        } else {
            print!(". ");
        }
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {
                let trimmed = line.trim();
                if buffer.is_empty() {
                    if trimmed.is_empty() {
                        continue;
                    }
                    if trimmed == "exit" || trimmed == "quit" {
                        println!("Goodbye!");
                        break;
                    }
                }

                depth = (depth + block_delta(trimmed)).max(0);
                buffer.push_str(&line);

                if depth == 0 {
                    run_command(&buffer, &mut interpreter);
                    buffer.clear();
                }
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

/// Block-depth change contributed by one input line: DO and IF open a
/// block, LOOP and END IF close one. Lines that fail to scan contribute
/// nothing and surface their error when the buffer runs.
fn block_delta(line: &str) -> i64 {
    let mut scanner = Scanner::new(line.to_string());
    let tokens = match scanner.scan_tokens() {
        Ok(tokens) => tokens,
        Err(_) => return 0,
    };

    match tokens.first().map(|token| token.kind) {
        Some(TokenKind::Do) | Some(TokenKind::If) => 1,
        Some(TokenKind::Loop) => -1,
        Some(TokenKind::End)
            if tokens.get(1).map(|token| token.kind) == Some(TokenKind::If) =>
        {
            -1
        }
        _ => 0,
    }
}

fn run_command(source: &str, interpreter: &mut Interpreter) {
    let mut scanner = Scanner::new(source.to_string());
    let tokens = match scanner.scan_tokens() {
        Ok(tokens) => tokens,
        Err(error) => {
            error.report(source, None);
            return;
        }
    };

    let mut parser = Parser::new(tokens);
    let program = match parser.parse() {
        Ok(program) => program,
        Err(error) => {
            error.report(source, None);
            return;
        }
    };

    if let Err(error) = interpreter.interpret(&program) {
        error.report(source, None);
    }
}

mod ast;
mod error;
mod interpreter;
mod parser;
mod repl;
mod runner;
mod scanner;
mod token;
mod value;

use clap::{Arg, Command};
use std::fs;
use std::path::Path;

fn main() {
    let matches = Command::new("rbasic")
        .about("A tree-walking interpreter for a small subset of BASIC")
        .arg(
            Arg::new("file")
                .help("The BASIC source file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive mode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Print the token stream instead of running the program")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .help("Print the parsed program instead of running it")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if let Some(file_path) = matches.get_one::<String>("file") {
        run_file(
            file_path,
            matches.get_flag("tokens"),
            matches.get_flag("ast"),
        );
    } else {
        repl::start();
    }
}

fn run_file(path: &str, tokens: bool, ast: bool) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            let filename = path.to_str();
            if tokens {
                runner::dump_tokens(&source, filename);
            } else if ast {
                runner::dump_ast(&source, filename);
            } else {
                runner::run(&source, filename);
            }
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

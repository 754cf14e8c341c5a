mod repl;

use clap::Parser;
use loom::{Engine, TokenKind};
use std::fs;
use std::process::ExitCode;

/// A small dynamically-typed scripting language.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Source file to run. Omit to start the REPL.
    source_file: Option<String>,

    /// Print the token stream and stop.
    #[arg(short = 'l', long = "lexer", conflicts_with_all = ["parser", "interpreter"])]
    lexer: bool,

    /// Print the parsed AST and stop.
    #[arg(short = 'p', long = "parser", conflicts_with_all = ["lexer", "interpreter"])]
    parser: bool,

    /// Evaluate the program (default).
    #[arg(short = 'i', long = "interpreter", conflicts_with_all = ["lexer", "parser"])]
    interpreter: bool,
}

#[derive(Clone, Copy)]
enum Mode {
    Lexer,
    Parser,
    Interpreter,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.lexer {
            Mode::Lexer
        } else if self.parser {
            Mode::Parser
        } else {
            Mode::Interpreter
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mode = cli.mode();

    match cli.source_file {
        Some(path) => run_file(&path, mode),
        None => match repl::run(mode) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_file(path: &str, mode: Mode) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error reading '{path}': {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(path, bytes = source.len(), "read source file");

    let engine = Engine::new();

    match mode {
        Mode::Lexer => match engine.tokenize(&source) {
            Ok(tokens) => {
                tracing::debug!(count = tokens.len(), "tokenized");
                for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
                    println!("{:?}", token);
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", loom::LoomError::from(e).report(&source));
                ExitCode::FAILURE
            }
        },
        Mode::Parser => match engine.parse(&source) {
            Ok(program) => {
                tracing::debug!(statements = program.statements.len(), "parsed");
                println!("{}", program.pretty());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e.report(&source));
                ExitCode::FAILURE
            }
        },
        Mode::Interpreter => match engine.eval(&source) {
            Ok(_) => {
                tracing::debug!("evaluation finished");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e.report(&source));
                ExitCode::FAILURE
            }
        },
    }
}


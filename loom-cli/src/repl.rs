use crate::Mode;
use loom::{Engine, Environment, TokenKind};
use rustyline::error::ReadlineError;
use rustyline::Editor;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run(mode: Mode) -> anyhow::Result<()> {
    let engine = Engine::new();
    let scope = Environment::root();
    let mut editor: Editor<()> = Editor::new()?;

    println!("loom {VERSION}\nPress CTRL-D to exit");

    loop {
        match read_multi_line_input(&mut editor)? {
            Some(input) => evaluate(&engine, &scope, &input, mode),
            None => return Ok(()),
        }
    }
}

/// Collects lines until the buffered input is a syntactically complete
/// statement: keep reading while the last non-blank line is indented or
/// ends with `:` (opens a block), auto-continuing with the previous
/// line's leading whitespace, the way the reference REPL's
/// `multiline_input` and hebi's `Repl::read_multi_line_input` both do.
fn read_multi_line_input(editor: &mut Editor<()>) -> anyhow::Result<Option<String>> {
    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { ">> " } else { ".. " };
        let indent = continuation_indent(&buffer);
        let line = match editor.readline_with_initial(prompt, (&indent, "")) {
            Ok(line) => line,
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        editor.add_history_entry(&line);

        if buffer.is_empty() && line.trim() == "exit" {
            return Ok(None);
        }
        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(&line);

        if buffer.trim().is_empty() {
            return Ok(Some(buffer));
        }
        if needs_more_input(&buffer) {
            continue;
        }
        return Ok(Some(buffer));
    }
}

fn continuation_indent(buffer: &str) -> String {
    let last_line = buffer.lines().last().unwrap_or("");
    let width = last_line.chars().take_while(|c| c.is_whitespace()).count();
    last_line.chars().take(width).collect()
}

fn needs_more_input(buffer: &str) -> bool {
    let last_line = buffer.lines().last().unwrap_or("");
    if last_line.trim().is_empty() {
        return false;
    }
    let is_indented = last_line.starts_with(|c: char| c.is_whitespace());
    let begins_block = last_line.trim_end().ends_with(':');
    is_indented || begins_block
}

fn evaluate(engine: &Engine, scope: &Environment, input: &str, mode: Mode) {
    if input.trim().is_empty() {
        return;
    }
    match mode {
        Mode::Lexer => match engine.tokenize(input) {
            Ok(tokens) => {
                for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
                    println!("{token:?}");
                }
            }
            Err(e) => println!("{}", loom::LoomError::from(e).report(input)),
        },
        Mode::Parser => match engine.parse(input) {
            Ok(program) => println!("{}", program.pretty()),
            Err(e) => println!("{}", e.report(input)),
        },
        Mode::Interpreter => match engine.eval_with_scope(input, scope) {
            Ok(value) => {
                if !matches!(value, loom::Value::Unit) {
                    println!("{value}");
                }
            }
            Err(e) => println!("{}", e.report(input)),
        },
    }
}

//! Module containing error definitions for the evaluation process, plus the
//! shared source-position error reporter used by every error taxon.

use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::token::Token;
use std::fmt;

/// A runtime error, tagged with the token whose evaluation raised it.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    UndefinedVariable(String),
    TypeMismatch(String),
    DivisionByZero,
    IndexOutOfBounds { index: i64, len: usize },
    ReturnOutsideFunction,
    BreakOutsideLoop,
    ContinueOutsideLoop,
    StackOverflow,
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeErrorKind::UndefinedVariable(name) => write!(f, "undefined variable '{name}'"),
            RuntimeErrorKind::TypeMismatch(msg) => write!(f, "{msg}"),
            RuntimeErrorKind::DivisionByZero => write!(f, "division by zero"),
            RuntimeErrorKind::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            RuntimeErrorKind::ReturnOutsideFunction => {
                write!(f, "'return' outside of a function")
            }
            RuntimeErrorKind::BreakOutsideLoop => write!(f, "'break' outside of a loop"),
            RuntimeErrorKind::ContinueOutsideLoop => write!(f, "'continue' outside of a loop"),
            RuntimeErrorKind::StackOverflow => write!(f, "call stack overflow"),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for RuntimeError {}

/// The union of every error this crate can produce, with a single
/// `Display` that renders the same line+caret report regardless of taxon.
#[derive(Debug, Clone)]
pub enum LoomError {
    Lex(LexError),
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl LoomError {
    /// The token the error is anchored to, when one is available. `LexError`
    /// carries only a raw offset, not a `Token`.
    pub fn report(&self, source: &str) -> String {
        match self {
            LoomError::Lex(e) => report_at_offset(source, e.offset, &e.to_string()),
            LoomError::Parse(e) => report(source, &e.token, &e.message),
            LoomError::Runtime(e) => report(source, &e.token, &e.kind.to_string()),
        }
    }
}

impl fmt::Display for LoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoomError::Lex(e) => write!(f, "{e}"),
            LoomError::Parse(e) => write!(f, "{e}"),
            LoomError::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoomError {}

impl From<LexError> for LoomError {
    fn from(e: LexError) -> Self {
        LoomError::Lex(e)
    }
}

impl From<ParseError> for LoomError {
    fn from(e: ParseError) -> Self {
        LoomError::Parse(e)
    }
}

impl From<RuntimeError> for LoomError {
    fn from(e: RuntimeError) -> Self {
        LoomError::Runtime(e)
    }
}

/// Formats a line+caret error report, matching the reference interpreter's
/// `ErrorReporter.report`:
///
/// ```text
/// Error at line <N>:
/// <source line text>
/// <spaces><caret>
/// <message>
/// ```
pub fn report(source: &str, token: &Token, message: &str) -> String {
    report_at_offset(source, token.offset, message)
}

fn report_at_offset(source: &str, offset: usize, message: &str) -> String {
    let mut line_num = 1;
    let mut pos_in_line = offset;
    for (i, byte) in source.bytes().enumerate().take(offset) {
        if byte == b'\n' {
            line_num += 1;
            pos_in_line = offset - (i + 1);
        }
    }
    let error_line = source.lines().nth(line_num - 1).unwrap_or("");
    format!(
        "Error at line {line_num}:\n{error_line}\n{}^\n{message}",
        " ".repeat(pos_in_line)
    )
}

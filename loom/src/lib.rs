//! # loom
//!
//! `loom` is a tiny, embeddable scripting language with a familiar,
//! Python-flavored syntax: indentation instead of braces, dynamically
//! typed values, first-class functions and closures.
//!
//! # A Quick Example
//!
//! ```
//! use loom::Engine;
//!
//! let engine = Engine::new();
//! let result = engine.eval(r#"
//! def fib(n):
//!     if n < 2:
//!         return n
//!     return fib(n - 1) + fib(n - 2)
//! fib(7)
//! "#).unwrap();
//!
//! assert_eq!(result.to_string(), "13");
//! ```

mod ast;
mod environment;
mod error;
mod evaluator;
mod lexer;
mod parser;
mod token;
mod value;

pub use ast::{BinaryOp, Block, Expr, Program, Stmt, UnaryOp};
pub use environment::Environment;
pub use error::{report, LoomError, RuntimeError, RuntimeErrorKind};
pub use lexer::{tokenize, LexError, Lexer};
pub use parser::{parse, ParseError, Parser};
pub use token::{EcoString, Lexeme, Token, TokenKind};
pub use value::{FunctionValue, NativeFunction, Value};

/// The crate's single top-level entry point: tokenize, parse, and evaluate
/// `loom` source, with a persistent root environment that can be reused
/// across calls the way a host reuses a `Scope` across evaluations.
pub struct Engine {
    root: Environment,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// A fresh engine with its own root environment and the built-in
    /// natives (`len`, `chr`) available.
    pub fn new() -> Self {
        Self { root: Environment::root() }
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        lexer::tokenize(source)
    }

    pub fn parse(&self, source: &str) -> Result<Program, LoomError> {
        let tokens = self.tokenize(source)?;
        let (program, error) = parser::parse(tokens);
        match error {
            Some(e) => Err(e.into()),
            None => Ok(program),
        }
    }

    /// One-shot evaluation against a fresh root environment.
    pub fn eval(&self, source: &str) -> Result<Value, LoomError> {
        self.eval_with_scope(source, &Environment::root())
    }

    /// Evaluation against a caller-supplied environment, so callers (e.g.
    /// a REPL) can keep variables and functions alive across calls.
    pub fn eval_with_scope(&self, source: &str, env: &Environment) -> Result<Value, LoomError> {
        let program = self.parse(source)?;
        evaluator::eval_program(&program, env).map_err(Into::into)
    }

    /// This engine's persistent root environment, pre-populated with the
    /// built-in natives. Intended for REPL-style reuse across input lines.
    pub fn scope(&self) -> &Environment {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fibonacci() {
        let engine = Engine::new();
        let env = Environment::root();
        engine
            .eval_with_scope(
                r#"
def fib(n):
    if n < 2:
        return n
    return fib(n - 1) + fib(n - 2)
result = fib(7)
"#,
                &env,
            )
            .unwrap();
        assert_eq!(env.lookup("result"), Some(Value::Int(13)));
    }

    #[test]
    fn short_circuit_and_or() {
        let engine = Engine::new();
        let env = Environment::root();
        engine
            .eval_with_scope("a = false and undefined_name()", &env)
            .unwrap();
        assert_eq!(env.lookup("a"), Some(Value::Bool(false)));

        let env = Environment::root();
        engine
            .eval_with_scope("a = true or undefined_name()", &env)
            .unwrap();
        assert_eq!(env.lookup("a"), Some(Value::Bool(true)));
    }

    #[test]
    fn integer_division_produces_float() {
        let engine = Engine::new();
        let result = engine.eval("4 / 2").unwrap();
        assert_eq!(result, Value::Float(2.0));
    }

    #[test]
    fn closures_capture_definition_environment() {
        let engine = Engine::new();
        let env = Environment::root();
        engine
            .eval_with_scope(
                r#"
def make_adder(n):
    def adder(x):
        return x + n
    return adder
add5 = make_adder(5)
result = add5(10)
"#,
                &env,
            )
            .unwrap();
        assert_eq!(env.lookup("result"), Some(Value::Int(15)));
    }

    #[test]
    fn top_level_return_is_a_runtime_error() {
        let engine = Engine::new();
        assert!(engine.eval("return 1").is_err());
    }
}

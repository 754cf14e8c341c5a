//! Runtime value type.
//!
//! Values are cloned by value except `Array`, `Function`, and `Native`,
//! which carry shared payloads (`Rc`), giving arrays reference semantics
//! and function values cheap, shared closures.

use crate::ast::Block;
use crate::environment::Environment;
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::token::{format_float, EcoString, Token};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(EcoString),
    Array(Rc<RefCell<Vec<Value>>>),
    Function(Rc<FunctionValue>),
    Native(Rc<NativeFunction>),
    /// The absent result of a statement that doesn't produce a value.
    Unit,
}

pub struct FunctionValue {
    pub name: EcoString,
    pub params: Vec<EcoString>,
    pub body: Block,
    pub definition_env: Environment,
}

pub struct NativeFunction {
    pub name: &'static str,
    pub call: Box<dyn Fn(&[Value], &Token) -> Result<Value, RuntimeError>>,
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Function(_) | Value::Native(_) => "function",
            Value::Unit => "unit",
        }
    }

    /// Truthiness: `Bool` by its value; numbers nonzero; strings/arrays
    /// nonempty; functions always truthy; `Unit` always falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::Array(items) => !items.borrow().is_empty(),
            Value::Function(_) | Value::Native(_) => true,
            Value::Unit => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn mismatch(&self, other: &Value, op: &str, token: &Token) -> RuntimeError {
        RuntimeError {
            kind: RuntimeErrorKind::TypeMismatch(format!(
                "cannot apply {op} to {} and {}",
                self.type_name(),
                other.type_name()
            )),
            token: token.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Unit, Value::Unit) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{}", format_float(*n)),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(items) => {
                let items = items.borrow();
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Function(func) => write!(f, "<function {}>", func.name),
            Value::Native(func) => write!(f, "<native function {}>", func.name),
            Value::Unit => write!(f, "unit"),
        }
    }
}

//! Tree-walking evaluator.
//!
//! Evaluates `ast::{Expr, Stmt}` directly — no separate IR/bytecode pass.
//! Non-local control flow (`return`, `break`, `continue`) propagates as the
//! `Err` arm of a `Result`, the same pattern as `EvalAltResult::LoopBreak`:
//! every statement-sequencing function simply forwards `Signal` with `?`.

use crate::ast::{BinaryOp, Block, Expr, Program, Stmt, UnaryOp};
use crate::environment::Environment;
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::token::Token;
use crate::value::{FunctionValue, NativeFunction, Value};
use smallvec::SmallVec;
use std::rc::Rc;

/// Call arguments are almost always a handful of values; inline storage
/// avoids a heap allocation for the common case, the same tradeoff the
/// engine makes for its own argument lists.
type Args = SmallVec<[Value; 4]>;

const MAX_CALL_DEPTH: usize = 512;

enum Flow {
    Return(Value),
    Break,
    Continue,
}

enum Signal {
    Error(RuntimeError),
    Flow(Flow),
}

impl From<RuntimeError> for Signal {
    fn from(e: RuntimeError) -> Self {
        Signal::Error(e)
    }
}

type EvalResult<T> = Result<T, Signal>;

fn err(kind: RuntimeErrorKind, token: &Token) -> Signal {
    Signal::Error(RuntimeError { kind, token: token.clone() })
}

/// Evaluates a whole program against `env`. A top-level `return`/`break`/
/// `continue` that escapes every statement is converted here into a proper
/// runtime error, matching the specification's requirement that such a
/// statement "escapes the evaluator" rather than silently terminating.
pub fn eval_program(program: &Program, env: &Environment) -> Result<Value, RuntimeError> {
    let mut depth = 0usize;
    let mut result = Value::Unit;
    for stmt in &program.statements {
        match eval_stmt(stmt, env, &mut depth) {
            Ok(v) => result = v,
            Err(Signal::Error(e)) => return Err(e),
            Err(Signal::Flow(Flow::Return(_))) => {
                return Err(RuntimeError {
                    kind: RuntimeErrorKind::ReturnOutsideFunction,
                    token: stmt.token().clone(),
                })
            }
            Err(Signal::Flow(Flow::Break)) => {
                return Err(RuntimeError {
                    kind: RuntimeErrorKind::BreakOutsideLoop,
                    token: stmt.token().clone(),
                })
            }
            Err(Signal::Flow(Flow::Continue)) => {
                return Err(RuntimeError {
                    kind: RuntimeErrorKind::ContinueOutsideLoop,
                    token: stmt.token().clone(),
                })
            }
        }
    }
    Ok(result)
}

fn eval_block(block: &Block, env: &Environment, depth: &mut usize) -> EvalResult<Value> {
    let mut result = Value::Unit;
    for stmt in &block.statements {
        result = eval_stmt(stmt, env, depth)?;
    }
    Ok(result)
}

fn eval_stmt(stmt: &Stmt, env: &Environment, depth: &mut usize) -> EvalResult<Value> {
    match stmt {
        Stmt::Expr(expr) => eval_expr(expr, env, depth),
        Stmt::Assignment(name, value, _) => {
            let value = eval_expr(value, env, depth)?;
            env.assign(name, value);
            Ok(Value::Unit)
        }
        Stmt::Conditional(cond, then_block, else_branch, _) => {
            if eval_expr(cond, env, depth)?.is_truthy() {
                eval_block(then_block, &env.create_child(), depth)
            } else if let Some(else_branch) = else_branch {
                eval_stmt(else_branch, env, depth)
            } else {
                Ok(Value::Unit)
            }
        }
        Stmt::While(cond, body, _) => {
            while eval_expr(cond, env, depth)?.is_truthy() {
                match eval_block(body, &env.create_child(), depth) {
                    Ok(_) => {}
                    Err(Signal::Flow(Flow::Break)) => break,
                    Err(Signal::Flow(Flow::Continue)) => continue,
                    Err(other) => return Err(other),
                }
            }
            Ok(Value::Unit)
        }
        Stmt::For(pre, cond, post, body, _) => {
            let loop_env = env.create_child();
            eval_stmt(pre, &loop_env, depth)?;
            while eval_expr(cond, &loop_env, depth)?.is_truthy() {
                match eval_block(body, &loop_env.create_child(), depth) {
                    Ok(_) => {}
                    Err(Signal::Flow(Flow::Break)) => break,
                    Err(Signal::Flow(Flow::Continue)) => {}
                    Err(other) => return Err(other),
                }
                eval_stmt(post, &loop_env, depth)?;
            }
            Ok(Value::Unit)
        }
        Stmt::FunctionDefinition(name, params, body, _) => {
            let function = Value::Function(Rc::new(FunctionValue {
                name: name.clone(),
                params: params.clone(),
                body: body.clone(),
                definition_env: env.clone(),
            }));
            env.bind_local(name.clone(), function);
            Ok(Value::Unit)
        }
        Stmt::Return(expr, _) => {
            let value = eval_expr(expr, env, depth)?;
            Err(Signal::Flow(Flow::Return(value)))
        }
        Stmt::Break(_) => Err(Signal::Flow(Flow::Break)),
        Stmt::Continue(_) => Err(Signal::Flow(Flow::Continue)),
    }
}

fn eval_expr(expr: &Expr, env: &Environment, depth: &mut usize) -> EvalResult<Value> {
    match expr {
        Expr::Integer(n, _) => Ok(Value::Int(*n)),
        Expr::Float(n, _) => Ok(Value::Float(*n)),
        Expr::Str(s, _) => Ok(Value::Str(s.clone())),
        Expr::Bool(b, _) => Ok(Value::Bool(*b)),
        Expr::Array(items, _) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval_expr(item, env, depth)?);
            }
            Ok(Value::array(values))
        }
        Expr::Identifier(name, token) => env
            .lookup(name)
            .ok_or_else(|| err(RuntimeErrorKind::UndefinedVariable(name.to_string()), token)),
        Expr::Unary(op, operand, token) => {
            let value = eval_expr(operand, env, depth)?;
            eval_unary(*op, value, token)
        }
        Expr::Binary(BinaryOp::And, left, right, _) => {
            let left = eval_expr(left, env, depth)?;
            if !left.is_truthy() {
                return Ok(left);
            }
            eval_expr(right, env, depth)
        }
        Expr::Binary(BinaryOp::Or, left, right, _) => {
            let left = eval_expr(left, env, depth)?;
            if left.is_truthy() {
                return Ok(left);
            }
            eval_expr(right, env, depth)
        }
        Expr::Binary(op, left, right, token) => {
            let left = eval_expr(left, env, depth)?;
            let right = eval_expr(right, env, depth)?;
            eval_binary(*op, left, right, token)
        }
        Expr::Index(base, index, token) => {
            let base = eval_expr(base, env, depth)?;
            let index = eval_expr(index, env, depth)?;
            eval_index(base, index, token)
        }
        Expr::Call(name, args, token) => eval_call(name, args, env, token, depth),
    }
}

fn eval_unary(op: UnaryOp, value: Value, token: &Token) -> EvalResult<Value> {
    match (op, &value) {
        (UnaryOp::Negative, Value::Int(n)) => Ok(Value::Int(-n)),
        (UnaryOp::Negative, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Not, _) => Ok(Value::Bool(!value.is_truthy())),
        (UnaryOp::Negative, _) => Err(Signal::Error(RuntimeError {
            kind: RuntimeErrorKind::TypeMismatch(format!(
                "cannot negate a {}",
                value.type_name()
            )),
            token: token.clone(),
        })),
    }
}

fn eval_binary(op: BinaryOp, left: Value, right: Value, token: &Token) -> EvalResult<Value> {
    use BinaryOp::*;
    match op {
        Plus => match (&left, &right) {
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}").into())),
            _ => numeric(left, right, token, "+", |a, b| a + b, |a, b| a + b),
        },
        Minus => numeric(left, right, token, "-", |a, b| a - b, |a, b| a - b),
        Multiplication => numeric(left, right, token, "*", |a, b| a * b, |a, b| a * b),
        Division => {
            let a = left.as_f64().ok_or_else(|| left.mismatch(&right, "/", token))?;
            let b = right.as_f64().ok_or_else(|| left.mismatch(&right, "/", token))?;
            if b == 0.0 {
                return Err(err(RuntimeErrorKind::DivisionByZero, token));
            }
            Ok(Value::Float(a / b))
        }
        Less => compare(left, right, token, |o| o.is_lt()),
        LessOrEqual => compare(left, right, token, |o| o.is_le()),
        Greater => compare(left, right, token, |o| o.is_gt()),
        GreaterOrEqual => compare(left, right, token, |o| o.is_ge()),
        Equal => Ok(Value::Bool(left == right)),
        NotEqual => Ok(Value::Bool(left != right)),
        And | Or => unreachable!("short-circuit operators are handled in eval_expr"),
    }
}

fn numeric(
    left: Value,
    right: Value,
    token: &Token,
    op: &str,
    int_op: impl Fn(i64, i64) -> i64,
    float_op: impl Fn(f64, f64) -> f64,
) -> EvalResult<Value> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(int_op(*a, *b))),
        (Value::Float(_), _) | (_, Value::Float(_)) => {
            let a = left.as_f64().ok_or_else(|| left.mismatch(&right, op, token))?;
            let b = right.as_f64().ok_or_else(|| left.mismatch(&right, op, token))?;
            Ok(Value::Float(float_op(a, b)))
        }
        _ => Err(left.mismatch(&right, op, token).into()),
    }
}

fn compare(
    left: Value,
    right: Value,
    token: &Token,
    matches: impl Fn(std::cmp::Ordering) -> bool,
) -> EvalResult<Value> {
    let ordering = match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        _ => {
            let a = left.as_f64().ok_or_else(|| left.mismatch(&right, "comparison", token))?;
            let b = right.as_f64().ok_or_else(|| left.mismatch(&right, "comparison", token))?;
            a.partial_cmp(&b)
                .ok_or_else(|| left.mismatch(&right, "comparison", token))?
        }
    };
    Ok(Value::Bool(matches(ordering)))
}

fn eval_index(base: Value, index: Value, token: &Token) -> EvalResult<Value> {
    let i = match index {
        Value::Int(n) => n,
        other => {
            return Err(err(
                RuntimeErrorKind::TypeMismatch(format!(
                    "index must be an integer, got {}",
                    other.type_name()
                )),
                token,
            ))
        }
    };
    match base {
        Value::Array(items) => {
            let items = items.borrow();
            let idx = normalize_index(i, items.len())
                .ok_or_else(|| err(RuntimeErrorKind::IndexOutOfBounds { index: i, len: items.len() }, token))?;
            Ok(items[idx].clone())
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let idx = normalize_index(i, chars.len())
                .ok_or_else(|| err(RuntimeErrorKind::IndexOutOfBounds { index: i, len: chars.len() }, token))?;
            Ok(Value::Str(chars[idx].to_string().into()))
        }
        other => Err(err(
            RuntimeErrorKind::TypeMismatch(format!("cannot index a {}", other.type_name())),
            token,
        )),
    }
}

fn normalize_index(i: i64, len: usize) -> Option<usize> {
    if i >= 0 {
        let i = i as usize;
        (i < len).then_some(i)
    } else {
        let from_end = (-i) as usize;
        (from_end <= len).then(|| len - from_end)
    }
}

fn eval_call(
    name: &str,
    args: &[Expr],
    env: &Environment,
    token: &Token,
    depth: &mut usize,
) -> EvalResult<Value> {
    let mut values: Args = SmallVec::with_capacity(args.len());
    for arg in args {
        values.push(eval_expr(arg, env, depth)?);
    }

    let callee = env
        .lookup(name)
        .or_else(|| native(name))
        .ok_or_else(|| err(RuntimeErrorKind::UndefinedVariable(name.to_string()), token))?;

    match callee {
        Value::Native(native) => (native.call)(&values, token).map_err(Signal::Error),
        Value::Function(function) => call_function(&function, &values, depth),
        other => Err(err(
            RuntimeErrorKind::TypeMismatch(format!("{} is not callable", other.type_name())),
            token,
        )),
    }
}

fn call_function(function: &FunctionValue, args: &[Value], depth: &mut usize) -> EvalResult<Value> {
    *depth += 1;
    if *depth > MAX_CALL_DEPTH {
        *depth -= 1;
        return Err(Signal::Error(RuntimeError {
            kind: RuntimeErrorKind::StackOverflow,
            token: function.body.token.clone(),
        }));
    }

    // The call frame's parent is the function's definition environment,
    // not the caller's — this is what makes closures lexically scoped.
    let call_env = function.definition_env.create_child();
    for (param, arg) in function.params.iter().zip(args.iter()) {
        call_env.bind_local(param.clone(), arg.clone());
    }

    let result = match eval_block(&function.body, &call_env, depth) {
        Ok(_) => Ok(Value::Unit),
        Err(Signal::Flow(Flow::Return(value))) => Ok(value),
        Err(other) => Err(other),
    };
    *depth -= 1;
    result
}

fn native(name: &str) -> Option<Value> {
    match name {
        "len" => Some(Value::Native(Rc::new(NativeFunction { name: "len", call: Box::new(native_len) }))),
        "chr" => Some(Value::Native(Rc::new(NativeFunction { name: "chr", call: Box::new(native_chr) }))),
        _ => None,
    }
}

fn native_len(args: &[Value], token: &Token) -> Result<Value, RuntimeError> {
    match args.first() {
        Some(Value::Array(items)) => Ok(Value::Int(items.borrow().len() as i64)),
        Some(Value::Str(s)) => Ok(Value::Int(s.chars().count() as i64)),
        Some(other) => Err(RuntimeError {
            kind: RuntimeErrorKind::TypeMismatch(format!("len() expects a string or array, got {}", other.type_name())),
            token: token.clone(),
        }),
        None => Err(RuntimeError {
            kind: RuntimeErrorKind::TypeMismatch("len() expects one argument".to_string()),
            token: token.clone(),
        }),
    }
}

fn native_chr(args: &[Value], token: &Token) -> Result<Value, RuntimeError> {
    match args.first() {
        Some(Value::Int(n)) => {
            let code = u32::try_from(*n).ok().and_then(char::from_u32).ok_or_else(|| RuntimeError {
                kind: RuntimeErrorKind::TypeMismatch(format!("{n} is not a valid character code")),
                token: token.clone(),
            })?;
            Ok(Value::Str(code.to_string().into()))
        }
        Some(other) => Err(RuntimeError {
            kind: RuntimeErrorKind::TypeMismatch(format!("chr() expects an integer, got {}", other.type_name())),
            token: token.clone(),
        }),
        None => Err(RuntimeError {
            kind: RuntimeErrorKind::TypeMismatch("chr() expects one argument".to_string()),
            token: token.clone(),
        }),
    }
}

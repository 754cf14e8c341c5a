//! Module defining the AST (abstract syntax tree).
//!
//! Every node carries the [`Token`] that introduced it, by value, so a
//! runtime or parse error can always point back at source position.

use crate::token::{format_float, EcoString, Token};

/// A binary operator, named after the evaluation dispatch it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Multiplication,
    Division,
    And,
    Or,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
}

impl BinaryOp {
    fn pretty_name(self) -> &'static str {
        match self {
            BinaryOp::Plus => "PlusOperation",
            BinaryOp::Minus => "MinusOperation",
            BinaryOp::Multiplication => "MultiplicationOperation",
            BinaryOp::Division => "DivisionOperation",
            BinaryOp::And => "AndOperation",
            BinaryOp::Or => "OrOperation",
            BinaryOp::Less => "LessOperation",
            BinaryOp::LessOrEqual => "LessOrEqualOperation",
            BinaryOp::Greater => "GreaterOperation",
            BinaryOp::GreaterOrEqual => "GreaterOrEqualOperation",
            BinaryOp::Equal => "EqualOperation",
            BinaryOp::NotEqual => "NotEqualOperation",
        }
    }
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negative,
    Not,
}

impl UnaryOp {
    fn pretty_name(self) -> &'static str {
        match self {
            UnaryOp::Negative => "NegativeOperation",
            UnaryOp::Not => "NotOperation",
        }
    }
}

/// An expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    Integer(i64, Token),
    Float(f64, Token),
    Str(EcoString, Token),
    Bool(bool, Token),
    Array(Vec<Expr>, Token),
    Identifier(EcoString, Token),
    Unary(UnaryOp, Box<Expr>, Token),
    Binary(BinaryOp, Box<Expr>, Box<Expr>, Token),
    /// Subscript `base[index]`.
    Index(Box<Expr>, Box<Expr>, Token),
    Call(EcoString, Vec<Expr>, Token),
}

impl Expr {
    pub fn token(&self) -> &Token {
        match self {
            Expr::Integer(_, t)
            | Expr::Float(_, t)
            | Expr::Str(_, t)
            | Expr::Bool(_, t)
            | Expr::Array(_, t)
            | Expr::Identifier(_, t)
            | Expr::Unary(_, _, t)
            | Expr::Binary(_, _, _, t)
            | Expr::Index(_, _, t)
            | Expr::Call(_, _, t) => t,
        }
    }

    pub fn pretty(&self) -> String {
        match self {
            Expr::Integer(n, _) => format!("Integer({n})"),
            Expr::Float(n, _) => format!("Float({})", format_float(*n)),
            Expr::Str(s, _) => format!("String({s})"),
            Expr::Bool(b, _) => format!("Bool({})", if *b { "True" } else { "False" }),
            Expr::Array(items, _) => {
                let items = items.iter().map(Expr::pretty).collect::<Vec<_>>().join(", ");
                format!("Array([{items}])")
            }
            Expr::Identifier(name, _) => format!("Identifier({name})"),
            Expr::Unary(op, operand, _) => format!("{}({})", op.pretty_name(), operand.pretty()),
            Expr::Binary(op, left, right, _) => {
                format!("{}({}, {})", op.pretty_name(), left.pretty(), right.pretty())
            }
            Expr::Index(base, index, _) => format!("Index({}, {})", base.pretty(), index.pretty()),
            Expr::Call(name, args, _) => {
                let args = args.iter().map(Expr::pretty).collect::<Vec<_>>().join(", ");
                format!("FunctionCall(Identifier({name}), [{args}])")
            }
        }
    }
}

/// An ordered sequence of statements introduced by a block-opening `:`.
#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub token: Token,
}

impl Block {
    fn pretty_statements(&self) -> String {
        self.statements.iter().map(Stmt::pretty).collect::<Vec<_>>().join(", ")
    }
}

/// A statement node.
#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    Assignment(EcoString, Expr, Token),
    /// The else-branch, when present, is itself a `Conditional` whose
    /// condition is a synthetic `Expr::Bool(true, ..)` for a plain `else`.
    Conditional(Expr, Block, Option<Box<Stmt>>, Token),
    While(Expr, Block, Token),
    For(Box<Stmt>, Expr, Box<Stmt>, Block, Token),
    FunctionDefinition(EcoString, Vec<EcoString>, Block, Token),
    Return(Expr, Token),
    Break(Token),
    Continue(Token),
}

impl Stmt {
    pub fn token(&self) -> &Token {
        match self {
            Stmt::Expr(e) => e.token(),
            Stmt::Assignment(_, _, t)
            | Stmt::Conditional(_, _, _, t)
            | Stmt::While(_, _, t)
            | Stmt::For(_, _, _, _, t)
            | Stmt::FunctionDefinition(_, _, _, t)
            | Stmt::Return(_, t)
            | Stmt::Break(t)
            | Stmt::Continue(t) => t,
        }
    }

    pub fn pretty(&self) -> String {
        match self {
            Stmt::Expr(e) => e.pretty(),
            Stmt::Assignment(name, value, _) => {
                format!("Assignment(Identifier({name}), {})", value.pretty())
            }
            Stmt::Conditional(cond, then_block, else_branch, _) => {
                let mut out = format!(
                    "Conditional({}) Then [{}]",
                    cond.pretty(),
                    then_block.pretty_statements()
                );
                if let Some(else_branch) = else_branch {
                    out.push_str(&format!(" Else [{}]", else_branch.pretty()));
                }
                out
            }
            Stmt::While(cond, body, _) => {
                format!("While({}) Then [{}]", cond.pretty(), body.pretty_statements())
            }
            Stmt::For(pre, cond, post, body, _) => {
                format!(
                    "For({}; {}; {}) Then [{}]",
                    pre.pretty(),
                    cond.pretty(),
                    post.pretty(),
                    body.pretty_statements()
                )
            }
            Stmt::FunctionDefinition(name, params, body, _) => {
                let params = params
                    .iter()
                    .map(|p| format!("Identifier({p})"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "FunctionDefinition(Identifier({name}), [{params}], [{}])",
                    body.pretty_statements()
                )
            }
            Stmt::Return(expr, _) => format!("ReturnStatement({})", expr.pretty()),
            Stmt::Break(_) => "BreakStatement".to_string(),
            Stmt::Continue(_) => "ContinueStatement".to_string(),
        }
    }
}

/// A whole parsed source file: an ordered sequence of top-level statements.
/// `Program` carries no token of its own — there is no single introducing
/// token for "the whole file".
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn pretty(&self) -> String {
        self.statements.iter().map(Stmt::pretty).collect::<Vec<_>>().join("\n")
    }
}

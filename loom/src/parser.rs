//! Recursive-descent parser.
//!
//! Operator precedence is implemented by the standard "climb one level at a
//! time" technique: each level parses one operand at its level, then loops
//! consuming `(operator, operand)` pairs at the same level, producing
//! left-associative trees.

use crate::ast::{BinaryOp, Block, Expr, Program, Stmt, UnaryOp};
use crate::token::{Token, TokenKind};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub token: Token,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
    has_error: bool,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0, has_error: false, errors: Vec::new() }
    }

    /// Parse the whole token stream into a [`Program`]. Returns the first
    /// error encountered, if any; parsing still attempts to recover and
    /// collect further top-level statements on a best-effort basis, but
    /// only the first error is reported.
    pub fn parse(mut self) -> (Program, Option<ParseError>) {
        let mut statements = Vec::new();
        self.ignore_newlines();
        while !self.check(TokenKind::Eof) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => {
                    // Best-effort recovery: skip to the next newline/EOF and
                    // keep collecting statements; only the first error wins.
                    while !self.check(TokenKind::Newline) && !self.check(TokenKind::Eof) {
                        self.advance();
                    }
                }
            }
            self.ignore_newlines();
        }
        (Program { statements }, self.errors.into_iter().next())
    }

    // ---- statement grammar ----

    fn parse_statement(&mut self) -> Result<Stmt, ()> {
        match self.current().kind {
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => {
                let token = self.advance().clone();
                Ok(Stmt::Break(token))
            }
            TokenKind::Continue => {
                let token = self.advance().clone();
                Ok(Stmt::Continue(token))
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Def => self.parse_function_definition(),
            TokenKind::Identifier if self.peek_kind(1) == Some(TokenKind::Equal) => {
                self.parse_assignment_statement()
            }
            _ => self.parse_expression().map(Stmt::Expr),
        }
    }

    fn parse_assignment_statement(&mut self) -> Result<Stmt, ()> {
        let name_token = self.advance().clone();
        let name = name_token.text().into();
        let token = self.expect(TokenKind::Equal)?.clone();
        let value = self.parse_expression()?;
        Ok(Stmt::Assignment(name, value, token))
    }

    fn parse_return_statement(&mut self) -> Result<Stmt, ()> {
        let token = self.advance().clone();
        let value = self.parse_expression()?;
        Ok(Stmt::Return(value, token))
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, ()> {
        let token = self.advance().clone();
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        let otherwise = self.parse_otherwise()?;
        Ok(Stmt::Conditional(condition, body, otherwise, token))
    }

    fn parse_otherwise(&mut self) -> Result<Option<Box<Stmt>>, ()> {
        self.ignore_newlines_if_followed_by_elif_or_else();
        match self.current().kind {
            TokenKind::Elif => {
                let token = self.advance().clone();
                let condition = self.parse_expression()?;
                let body = self.parse_block()?;
                let otherwise = self.parse_otherwise()?;
                Ok(Some(Box::new(Stmt::Conditional(condition, body, otherwise, token))))
            }
            TokenKind::Else => {
                let token = self.advance().clone();
                let body = self.parse_block()?;
                let true_token = token.clone();
                Ok(Some(Box::new(Stmt::Conditional(
                    Expr::Bool(true, true_token),
                    body,
                    None,
                    token,
                ))))
            }
            _ => Ok(None),
        }
    }

    /// `elif`/`else` continue the same statement, so a newline before them
    /// must not be mistaken for the end of the enclosing statement.
    fn ignore_newlines_if_followed_by_elif_or_else(&mut self) {
        let mut lookahead = self.index;
        while matches!(self.tokens.get(lookahead).map(|t| t.kind), Some(TokenKind::Newline)) {
            lookahead += 1;
        }
        if matches!(
            self.tokens.get(lookahead).map(|t| t.kind),
            Some(TokenKind::Elif) | Some(TokenKind::Else)
        ) {
            self.index = lookahead;
        }
    }

    fn parse_while_statement(&mut self) -> Result<Stmt, ()> {
        let token = self.advance().clone();
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Stmt::While(condition, body, token))
    }

    fn parse_for_statement(&mut self) -> Result<Stmt, ()> {
        let token = self.advance().clone();
        let pre = self.parse_assignment_statement()?;
        self.expect(TokenKind::Semicolon)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        let post = self.parse_assignment_statement()?;
        let body = self.parse_block()?;
        Ok(Stmt::For(Box::new(pre), condition, Box::new(post), body, token))
    }

    fn parse_function_definition(&mut self) -> Result<Stmt, ()> {
        let token = self.advance().clone();
        let name = self.expect(TokenKind::Identifier)?.text().into();
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.expect(TokenKind::Identifier)?.text().into());
                if self.check(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Stmt::FunctionDefinition(name, params, body, token))
    }

    fn parse_block(&mut self) -> Result<Block, ()> {
        let token = self.expect(TokenKind::Colon)?.clone();
        self.expect(TokenKind::Newline)?;
        self.expect(TokenKind::Indent)?;
        let mut statements = Vec::new();
        self.ignore_newlines();
        while !self.check(TokenKind::Dedent) && !self.check(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
            self.ignore_newlines();
        }
        self.expect(TokenKind::Dedent)?;
        Ok(Block { statements, token })
    }

    // ---- expression grammar ----

    fn parse_expression(&mut self) -> Result<Expr, ()> {
        self.parse_logical_expression()
    }

    fn parse_logical_expression(&mut self) -> Result<Expr, ()> {
        let mut left = self.parse_comparison_expression()?;
        loop {
            let op = match self.current().kind {
                TokenKind::And => BinaryOp::And,
                TokenKind::Or => BinaryOp::Or,
                _ => break,
            };
            let token = self.advance().clone();
            let right = self.parse_comparison_expression()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right), token);
        }
        Ok(left)
    }

    fn parse_comparison_expression(&mut self) -> Result<Expr, ()> {
        let mut left = self.parse_arithmetic_expression()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEqual => BinaryOp::LessOrEqual,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEqual => BinaryOp::GreaterOrEqual,
                TokenKind::EqualEqual => BinaryOp::Equal,
                TokenKind::BangEqual => BinaryOp::NotEqual,
                _ => break,
            };
            let token = self.advance().clone();
            let right = self.parse_arithmetic_expression()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right), token);
        }
        Ok(left)
    }

    fn parse_arithmetic_expression(&mut self) -> Result<Expr, ()> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Plus,
                TokenKind::Minus => BinaryOp::Minus,
                _ => break,
            };
            let token = self.advance().clone();
            let right = self.parse_term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right), token);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ()> {
        let mut left = self.parse_unary_expression()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Multiplication,
                TokenKind::Slash => BinaryOp::Division,
                _ => break,
            };
            let token = self.advance().clone();
            let right = self.parse_unary_expression()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right), token);
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Expr, ()> {
        match self.current().kind {
            TokenKind::Minus => {
                let token = self.advance().clone();
                let operand = self.parse_unary_expression()?;
                Ok(Expr::Unary(UnaryOp::Negative, Box::new(operand), token))
            }
            TokenKind::Not => {
                let token = self.advance().clone();
                let operand = self.parse_unary_expression()?;
                Ok(Expr::Unary(UnaryOp::Not, Box::new(operand), token))
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ()> {
        let mut expr = self.parse_primary_atom()?;
        while self.check(TokenKind::LBracket) {
            let token = self.advance().clone();
            let index = self.parse_expression()?;
            self.expect(TokenKind::RBracket)?;
            expr = Expr::Index(Box::new(expr), Box::new(index), token);
        }
        Ok(expr)
    }

    fn parse_primary_atom(&mut self) -> Result<Expr, ()> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Integer => {
                self.advance();
                let value: i64 = token.text().parse().map_err(|_| self.fail(&token, "integer"))?;
                Ok(Expr::Integer(value, token))
            }
            TokenKind::Float => {
                self.advance();
                let value: f64 = token.text().parse().map_err(|_| self.fail(&token, "float"))?;
                Ok(Expr::Float(value, token))
            }
            TokenKind::String => {
                self.advance();
                Ok(Expr::Str(token.text().into(), token))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true, token))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false, token))
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                if !self.check(TokenKind::RBracket) {
                    loop {
                        items.push(self.parse_expression()?);
                        if self.check(TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::Array(items, token))
            }
            TokenKind::Identifier if self.peek_kind(1) == Some(TokenKind::LParen) => {
                self.advance();
                self.advance(); // consume '('
                let mut args = Vec::new();
                if !self.check(TokenKind::RParen) {
                    loop {
                        args.push(self.parse_expression()?);
                        if self.check(TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Call(token.text().into(), args, token))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expr::Identifier(token.text().into(), token))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.fail_expected(&token, &["expression"])),
        }
    }

    // ---- token stream helpers ----

    fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    fn peek_kind(&self, ahead: usize) -> Option<TokenKind> {
        self.tokens.get(self.index + ahead).map(|t| t.kind)
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.index];
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn ignore_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token, ()> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.current().clone();
            Err(self.fail_expected(&token, &[describe(kind)]))
        }
    }

    fn fail(&mut self, token: &Token, expected: &str) -> () {
        self.fail_expected(token, &[expected])
    }

    fn fail_expected(&mut self, token: &Token, expected: &[&str]) -> () {
        let message = format!(
            "Expected {}, got {} instead in position {}",
            expected.join(", "),
            token.kind,
            token.offset
        );
        if !self.has_error {
            self.has_error = true;
            self.errors.push(ParseError { message, token: token.clone() });
        }
    }
}

fn describe(kind: TokenKind) -> &'static str {
    kind.literal_syntax().unwrap_or_else(|| match kind {
        TokenKind::Identifier => "identifier",
        TokenKind::Newline => "newline",
        TokenKind::Indent => "indented block",
        TokenKind::Dedent => "dedent",
        TokenKind::Eof => "end of input",
        _ => "token",
    })
}

pub fn parse(tokens: Vec<Token>) -> (Program, Option<ParseError>) {
    Parser::new(tokens).parse()
}

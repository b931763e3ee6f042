//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the diagnostic type, precedence levels, token helpers and the
//! main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser is a Pratt (precedence climbing) parser organised as:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: `let`, `return`, expression and block statements
//! - `expressions`: the precedence loop and the prefix/infix dispatch tables
//!
//! # Error recovery
//!
//! Parse functions return [`ParseResult`] and propagate failures with `?` up
//! to the nearest statement loop.  The statement loop records the
//! [`ParseError`], skips to the next statement boundary and keeps going, so a
//! single pass reports every independent mistake and
//! [`Parser::parse_program`] always returns a tree.

use crate::parser::ast::*;
use crate::parser::lexer::Lexer;
use crate::parser::token::{SourceLocation, Token, TokenKind};
use std::fmt;

/// A recorded, non-fatal parse diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }

    /// A specific token kind was required but something else was found
    pub(crate) fn unexpected(expected: TokenKind, found: &Token) -> Self {
        Self::new(format!("expected {}, found {}", expected, found), found.location)
    }

    pub(crate) fn no_prefix_parse_fn(token: &Token) -> Self {
        Self::new(
            format!("no prefix parse function for {} found", token.kind),
            token.location,
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// Binding power of operators, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // f(x)
}

impl Precedence {
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

/// Pratt parser over a [`Lexer`] with one token of lookahead
pub struct Parser {
    lexer: Lexer,
    pub(crate) current: Token,
    pub(crate) peek: Token,
    errors: Vec<ParseError>,
    /// `{` minus `}` seen so far, the current token included
    pub(crate) brace_depth: usize,
    /// Active `parse_expression` calls
    pub(crate) nesting: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        let brace_depth = usize::from(current.is(TokenKind::LBrace));
        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
            brace_depth,
            nesting: 0,
        }
    }

    /// Parse the whole token stream. Never fails; problems are available
    /// through [`Parser::errors`] afterwards.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::new();

        while !self.current_is(TokenKind::Eof) {
            match self.parse_statement() {
                Ok(stmt) => program.statements.push(stmt),
                Err(err) => {
                    self.record(err);
                    self.synchronize(0);
                }
            }
            self.next_token();
        }

        program
    }

    /// Diagnostic messages in the order they were discovered
    pub fn errors(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Diagnostics with their source locations
    pub fn diagnostics(&self) -> &[ParseError] {
        &self.errors
    }

    // ===== Helper methods =====

    pub(crate) fn record(&mut self, err: ParseError) {
        log::debug!("parse error at {}: {}", err.location, err.message);
        self.errors.push(err);
    }

    /// Skip the rest of a broken statement that sits `depth` braces deep: up
    /// to its `;`, or to just before the `}` closing its block or the end of
    /// input. Blocks opened past `depth` are skipped whole.
    pub(crate) fn synchronize(&mut self, depth: usize) {
        loop {
            if self.current_is(TokenKind::Eof) || self.peek_is(TokenKind::Eof) {
                return;
            }
            if self.brace_depth <= depth
                && (self.current_is(TokenKind::Semicolon) || self.peek_is(TokenKind::RBrace))
            {
                return;
            }
            self.next_token();
        }
    }

    pub(crate) fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);

        match self.current.kind {
            TokenKind::LBrace => self.brace_depth += 1,
            TokenKind::RBrace => self.brace_depth = self.brace_depth.saturating_sub(1),
            _ => {}
        }
    }

    pub(crate) fn current_is(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }

    /// Advance if the peek token has the given kind, otherwise fail without moving.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.peek_is(kind) {
            self.next_token();
            Ok(())
        } else {
            Err(ParseError::unexpected(kind, &self.peek))
        }
    }

    pub(crate) fn skip_semicolon(&mut self) {
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    pub(crate) fn current_precedence(&self) -> Precedence {
        Precedence::of(self.current.kind)
    }

    pub(crate) fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }
}

/// Parse `source` in one go, returning the tree and its diagnostics.
pub fn parse(source: &str) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    (program, parser.errors)
}

//! Statement parsing implementation
//!
//! ```text
//! statement  ::= let_stmt | return_stmt | expr_stmt
//! let_stmt   ::= "let" identifier "=" expression ";"?
//! return_stmt::= "return" expression ";"?
//! expr_stmt  ::= expression ";"?
//! block      ::= "{" statement* "}"
//! ```
//!
//! Semicolons terminate statements but are never required, so a REPL line
//! such as `1 + 2` is a complete program.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{ParseError, ParseResult, Parser, Precedence};
use crate::parser::token::TokenKind;

impl Parser {
    /// Parse a statement starting at the current token. On success the
    /// current token is the last token of the statement.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Statement> {
        log::trace!("statement at {}: {}", self.current.location, self.current);

        match self.current.kind {
            TokenKind::Let => self.parse_let_statement().map(Statement::Let),
            TokenKind::Return => self.parse_return_statement().map(Statement::Return),
            _ => self.parse_expression_statement().map(Statement::Expression),
        }
    }

    fn parse_let_statement(&mut self) -> ParseResult<LetStatement> {
        let token = self.current.clone();

        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier {
            token: self.current.clone(),
            name: self.current.literal.clone(),
        };

        self.expect_peek(TokenKind::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(LetStatement { token, name, value })
    }

    fn parse_return_statement(&mut self) -> ParseResult<ReturnStatement> {
        let token = self.current.clone();
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(ReturnStatement { token, value })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<ExpressionStatement> {
        let token = self.current.clone();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(ExpressionStatement { token, value })
    }

    /// Parse `{ ... }` with the current token on the opening brace. Broken
    /// statements inside the block are recorded and skipped; only a block
    /// left open at the end of input fails.
    pub(crate) fn parse_block_statement(&mut self) -> ParseResult<BlockStatement> {
        let token = self.current.clone();
        let depth = self.brace_depth;
        let mut statements = Vec::new();

        self.next_token();

        while !self.current_is(TokenKind::RBrace) {
            if self.current_is(TokenKind::Eof) {
                return Err(ParseError::unexpected(TokenKind::RBrace, &self.current));
            }

            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.record(err);
                    // the broken statement ran into this block's closing brace
                    if self.current_is(TokenKind::RBrace) && self.brace_depth < depth {
                        break;
                    }
                    self.synchronize(depth);
                }
            }
            self.next_token();
        }

        Ok(BlockStatement { token, statements })
    }
}

//! Expression parsing implementation
//!
//! Expressions are parsed with Pratt's precedence climbing.  Each token kind
//! may have a *prefix* parse function (the token starts an expression) and an
//! *infix* parse function (the token continues an expression that is already
//! on the left).  Both live in immutable [`FxHashMap`] dispatch tables built
//! once per process.
//!
//! # Precedence
//!
//! ```text
//! Lowest < Equals (== !=) < LessGreater (< >) < Sum (+ -)
//!        < Product (* /) < Prefix (-x !x) < Call (f(x))
//! ```
//!
//! The loop in [`Parser::parse_expression`] keeps folding infix operators into
//! the left operand while the next operator binds tighter than the caller's
//! precedence, which makes equal-precedence chains left-associative.
//!
//! Prefix operators, grouping and function bodies recurse through
//! `parse_expression`.  Past [`MAX_NESTING_DEPTH`] active calls the parser
//! reports a diagnostic instead of recursing, so hostile input can neither
//! exhaust the stack nor build a tree too deep to drop.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{ParseError, ParseResult, Parser, Precedence};
use crate::parser::token::TokenKind;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// Deepest allowed chain of nested expressions
pub const MAX_NESTING_DEPTH: usize = 128;

type PrefixParseFn = fn(&mut Parser) -> ParseResult<Expression>;
type InfixParseFn = fn(&mut Parser, Expression) -> ParseResult<Expression>;

struct ParseTables {
    prefix: FxHashMap<TokenKind, PrefixParseFn>,
    infix: FxHashMap<TokenKind, InfixParseFn>,
}

impl ParseTables {
    fn new() -> Self {
        let mut prefix: FxHashMap<TokenKind, PrefixParseFn> = FxHashMap::default();
        prefix.insert(TokenKind::Ident, Parser::parse_identifier);
        prefix.insert(TokenKind::Int, Parser::parse_integer_literal);
        prefix.insert(TokenKind::True, Parser::parse_boolean);
        prefix.insert(TokenKind::False, Parser::parse_boolean);
        prefix.insert(TokenKind::Bang, Parser::parse_prefix_expression);
        prefix.insert(TokenKind::Minus, Parser::parse_prefix_expression);
        prefix.insert(TokenKind::LParen, Parser::parse_grouped_expression);
        prefix.insert(TokenKind::If, Parser::parse_if_expression);
        prefix.insert(TokenKind::Function, Parser::parse_function_literal);

        let mut infix: FxHashMap<TokenKind, InfixParseFn> = FxHashMap::default();
        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Eq,
            TokenKind::NotEq,
        ] {
            infix.insert(kind, Parser::parse_infix_expression);
        }
        infix.insert(TokenKind::LParen, Parser::parse_call_expression);

        Self { prefix, infix }
    }
}

fn tables() -> &'static ParseTables {
    static TABLES: OnceLock<ParseTables> = OnceLock::new();
    TABLES.get_or_init(ParseTables::new)
}

impl Parser {
    /// Parse an expression whose operators all bind tighter than `precedence`.
    pub(crate) fn parse_expression(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(ParseError::new(
                format!("expression nested more than {} levels deep", MAX_NESTING_DEPTH),
                self.current.location,
            ));
        }

        self.nesting += 1;
        let result = self.parse_operators(precedence);
        self.nesting -= 1;
        result
    }

    fn parse_operators(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        let tables = tables();

        let prefix = tables
            .prefix
            .get(&self.current.kind)
            .copied()
            .ok_or_else(|| ParseError::no_prefix_parse_fn(&self.current))?;
        let mut left = prefix(self)?;

        while precedence < self.peek_precedence() {
            // every kind above Lowest has an infix entry; see test_precedence_matches_infix_table
            let Some(infix) = tables.infix.get(&self.peek.kind).copied() else {
                break;
            };

            self.next_token();
            left = infix(self, left)?;
        }

        Ok(left)
    }

    fn parse_identifier(&mut self) -> ParseResult<Expression> {
        Ok(Expression::Identifier(Identifier {
            token: self.current.clone(),
            name: self.current.literal.clone(),
        }))
    }

    fn parse_integer_literal(&mut self) -> ParseResult<Expression> {
        let token = self.current.clone();
        let value = token.literal.parse::<i64>().map_err(|_| {
            ParseError::new(
                format!("could not parse '{}' as integer", token.literal),
                token.location,
            )
        })?;

        Ok(Expression::Integer(IntegerLiteral { token, value }))
    }

    fn parse_boolean(&mut self) -> ParseResult<Expression> {
        Ok(Expression::Boolean(BooleanLiteral {
            token: self.current.clone(),
            value: self.current_is(TokenKind::True),
        }))
    }

    /// `!x` and `-x`
    fn parse_prefix_expression(&mut self) -> ParseResult<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::Prefix(PrefixExpression {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    /// Binary operators. The right operand is parsed at the operator's own
    /// precedence, so `a - b - c` groups as `(a - b) - c`.
    fn parse_infix_expression(&mut self, left: Expression) -> ParseResult<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();
        let precedence = self.current_precedence();

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Ok(Expression::Infix(InfixExpression {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    /// `( expr )` only changes grouping; no node is created for the parentheses.
    fn parse_grouped_expression(&mut self) -> ParseResult<Expression> {
        self.next_token();

        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;

        Ok(expr)
    }

    /// `if (cond) { ... } else { ... }`
    fn parse_if_expression(&mut self) -> ParseResult<Expression> {
        let token = self.current.clone();

        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;

        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(Expression::If(IfExpression {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    /// `fn(a, b) { ... }`
    fn parse_function_literal(&mut self) -> ParseResult<Expression> {
        let token = self.current.clone();

        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement()?;

        Ok(Expression::Function(FunctionLiteral {
            token,
            parameters,
            body,
        }))
    }

    /// Comma-separated identifiers, current token on `(`, ends on `)`
    fn parse_function_parameters(&mut self) -> ParseResult<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Ok(parameters);
        }

        loop {
            self.expect_peek(TokenKind::Ident)?;
            parameters.push(Identifier {
                token: self.current.clone(),
                name: self.current.literal.clone(),
            });

            if !self.peek_is(TokenKind::Comma) {
                break;
            }
            self.next_token();
        }

        self.expect_peek(TokenKind::RParen)?;
        Ok(parameters)
    }

    /// `callee(args)`, entered with the current token on `(`
    fn parse_call_expression(&mut self, callee: Expression) -> ParseResult<Expression> {
        let token = self.current.clone();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;

        Ok(Expression::Call(CallExpression {
            token,
            callee: Box::new(callee),
            arguments,
        }))
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> ParseResult<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.next_token();
            return Ok(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::{tables, MAX_NESTING_DEPTH};
    use crate::parser::ast::*;
    use crate::parser::parse::{parse, Precedence};
    use crate::parser::token::TokenKind;

    fn parse_single_expression(source: &str) -> Expression {
        let (mut program, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", source, errors);
        assert_eq!(program.statements.len(), 1, "expected one statement in {:?}", source);

        match program.statements.remove(0) {
            Statement::Expression(stmt) => stmt.value,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    fn assert_identifier(expr: &Expression, expected: &str) {
        match expr {
            Expression::Identifier(ident) => {
                assert_eq!(ident.name, expected);
                assert_eq!(ident.token_literal(), expected);
            }
            _ => panic!("Expected identifier {}, got {:?}", expected, expr),
        }
    }

    fn assert_integer(expr: &Expression, expected: i64) {
        match expr {
            Expression::Integer(int) => {
                assert_eq!(int.value, expected);
                assert_eq!(int.token_literal(), expected.to_string());
            }
            _ => panic!("Expected integer {}, got {:?}", expected, expr),
        }
    }

    #[test]
    fn test_identifier_expression() {
        assert_identifier(&parse_single_expression("foobar;"), "foobar");
    }

    #[test]
    fn test_integer_literal_expression() {
        assert_integer(&parse_single_expression("5;"), 5);
    }

    #[test]
    fn test_boolean_expression() {
        for (source, expected) in [("true;", true), ("false;", false)] {
            match parse_single_expression(source) {
                Expression::Boolean(b) => assert_eq!(b.value, expected),
                other => panic!("Expected boolean, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_prefix_expressions() {
        for (source, operator, value) in [("!5;", "!", 5), ("-15;", "-", 15)] {
            match parse_single_expression(source) {
                Expression::Prefix(prefix) => {
                    assert_eq!(prefix.operator, operator);
                    assert_integer(&prefix.right, value);
                }
                other => panic!("Expected prefix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_infix_expressions() {
        for operator in ["+", "-", "*", "/", ">", "<", "==", "!="] {
            let source = format!("5 {} 6;", operator);
            match parse_single_expression(&source) {
                Expression::Infix(infix) => {
                    assert_integer(&infix.left, 5);
                    assert_eq!(infix.operator, operator);
                    assert_integer(&infix.right, 6);
                }
                other => panic!("Expected infix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_if_expression() {
        let Expression::If(expr) = parse_single_expression("if (x < y) { x }") else {
            panic!("Expected if expression");
        };

        assert!(matches!(*expr.condition, Expression::Infix(_)));
        assert_eq!(expr.consequence.statements.len(), 1);
        assert!(expr.alternative.is_none());
    }

    #[test]
    fn test_if_else_expression() {
        let Expression::If(expr) = parse_single_expression("if (x < y) { x } else { y }") else {
            panic!("Expected if expression");
        };

        let alternative = expr.alternative.expect("alternative block");
        assert_eq!(alternative.statements.len(), 1);
        match &alternative.statements[0] {
            Statement::Expression(stmt) => assert_identifier(&stmt.value, "y"),
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_function_literal() {
        let Expression::Function(function) = parse_single_expression("fn(x, y) { x + y; }") else {
            panic!("Expected function literal");
        };

        assert_eq!(function.parameters.len(), 2);
        assert_eq!(function.parameters[0].name, "x");
        assert_eq!(function.parameters[1].name, "y");
        assert_eq!(function.body.statements.len(), 1);

        match &function.body.statements[0] {
            Statement::Expression(ExpressionStatement {
                value: Expression::Infix(infix),
                ..
            }) => {
                assert_identifier(&infix.left, "x");
                assert_eq!(infix.operator, "+");
                assert_identifier(&infix.right, "y");
            }
            other => panic!("Expected infix body, got {:?}", other),
        }
    }

    #[test]
    fn test_function_parameters() {
        let cases: [(&str, &[&str]); 3] = [
            ("fn() {};", &[]),
            ("fn(x) {};", &["x"]),
            ("fn(x, y, z) {};", &["x", "y", "z"]),
        ];

        for (source, expected) in cases {
            let Expression::Function(function) = parse_single_expression(source) else {
                panic!("Expected function literal for {}", source);
            };
            let names: Vec<&str> = function.parameters.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn test_call_expression() {
        let Expression::Call(call) = parse_single_expression("add(1, 2 * 3, 4 + 5);") else {
            panic!("Expected call expression");
        };

        assert_identifier(&call.callee, "add");
        assert_eq!(call.arguments.len(), 3);
        assert_integer(&call.arguments[0], 1);
        assert_eq!(call.arguments[1].render(), "(2 * 3)");
        assert_eq!(call.arguments[2].render(), "(4 + 5)");
    }

    #[test]
    fn test_call_without_arguments() {
        let Expression::Call(call) = parse_single_expression("f()") else {
            panic!("Expected call expression");
        };
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_no_prefix_parse_function() {
        let (_, errors) = parse("+ 5");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "no prefix parse function for '+' found");
    }

    #[test]
    fn test_illegal_token_is_reported_by_parser() {
        let (_, errors) = parse("let a = @;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "no prefix parse function for illegal character found");
    }

    #[test]
    fn test_integer_overflow() {
        let (_, errors) = parse("92233720368547758070");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "could not parse '92233720368547758070' as integer");
    }

    #[test]
    fn test_missing_closing_paren() {
        let (_, errors) = parse("(1 + 2; 3");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected ')', found ';'");
    }

    #[test]
    fn test_precedence_matches_infix_table() {
        let infix = &tables().infix;
        for kind in [
            TokenKind::Illegal,
            TokenKind::Eof,
            TokenKind::Ident,
            TokenKind::Int,
            TokenKind::Assign,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Bang,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Function,
            TokenKind::Let,
            TokenKind::True,
            TokenKind::False,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::Return,
        ] {
            let binds = Precedence::of(kind) > Precedence::Lowest;
            assert_eq!(binds, infix.contains_key(&kind), "{:?}", kind);
        }
    }

    #[test]
    fn test_deep_prefix_chain_is_rejected() {
        let source = format!("{}1", "-".repeat(200_000));
        let (program, errors) = parse(&source);

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            format!("expression nested more than {} levels deep", MAX_NESTING_DEPTH)
        );
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_deep_grouping_is_rejected() {
        let depth = 10_000;
        let source = format!("{}x{}; y", "(".repeat(depth), ")".repeat(depth));
        let (program, errors) = parse(&source);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location.column, MAX_NESTING_DEPTH + 1);
        assert_eq!(program.render(), "y");
    }

    #[test]
    fn test_nesting_below_limit_parses() {
        let depth = MAX_NESTING_DEPTH - 1;
        let source = format!("{}x", "!".repeat(depth));
        let (program, errors) = parse(&source);

        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_bad_parameter_list() {
        let (_, errors) = parse("fn(x, 1) { x }");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected identifier, found integer literal '1'");
    }
}

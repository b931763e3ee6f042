// AST (Abstract Syntax Tree) definitions for Monkey programs
//
// Every node keeps the token it was parsed from and renders back to canonical
// source through `Display`.  Prefix and infix expressions are always
// parenthesized, so the rendered text re-parses to a tree that renders the same.

use super::token::Token;
use std::fmt;

/// Behaviour shared by every AST node
pub trait Node: fmt::Display {
    /// Literal text of the token this node was built from
    fn token_literal(&self) -> &str;

    /// Canonical, fully parenthesized source text
    fn render(&self) -> String {
        self.to_string()
    }
}

/// Root of the tree: the top-level statements in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(|stmt| stmt.token_literal())
            .unwrap_or("")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.statements)
    }
}

/// Statement variants
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Block(BlockStatement),
}

impl Node for Statement {
    fn token_literal(&self) -> &str {
        match self {
            Statement::Let(stmt) => stmt.token_literal(),
            Statement::Return(stmt) => stmt.token_literal(),
            Statement::Expression(stmt) => stmt.token_literal(),
            Statement::Block(block) => block.token_literal(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(stmt) => write!(f, "{}", stmt),
            Statement::Return(stmt) => write!(f, "{}", stmt),
            Statement::Expression(stmt) => write!(f, "{}", stmt),
            Statement::Block(block) => write!(f, "{}", block),
        }
    }
}

/// `let <name> = <value>;`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

impl Node for LetStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for LetStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} = {};", self.token.literal, self.name, self.value)
    }
}

/// `return <value>;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expression,
}

impl Node for ReturnStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ReturnStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {};", self.token.literal, self.value)
    }
}

/// A bare expression used as a statement. The token is the expression's first token.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub token: Token,
    pub value: Expression,
}

impl Node for ExpressionStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ExpressionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// `{ <statements> }`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl Node for BlockStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }

        write!(f, "{{ ")?;
        write_statements(f, &self.statements)?;
        write!(f, " }}")
    }
}

/// Statements are separated by a space. An expression statement that is
/// followed by another statement gets a `;` so that `a; (b)` does not
/// re-parse as the call `a(b)`.
fn write_statements(f: &mut fmt::Formatter<'_>, statements: &[Statement]) -> fmt::Result {
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", stmt)?;
        if matches!(stmt, Statement::Expression(_)) && i + 1 < statements.len() {
            write!(f, ";")?;
        }
    }
    Ok(())
}

/// Expression variants
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Boolean(BooleanLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
}

impl Node for Expression {
    fn token_literal(&self) -> &str {
        match self {
            Expression::Identifier(expr) => expr.token_literal(),
            Expression::Integer(expr) => expr.token_literal(),
            Expression::Boolean(expr) => expr.token_literal(),
            Expression::Prefix(expr) => expr.token_literal(),
            Expression::Infix(expr) => expr.token_literal(),
            Expression::If(expr) => expr.token_literal(),
            Expression::Function(expr) => expr.token_literal(),
            Expression::Call(expr) => expr.token_literal(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(expr) => write!(f, "{}", expr),
            Expression::Integer(expr) => write!(f, "{}", expr),
            Expression::Boolean(expr) => write!(f, "{}", expr),
            Expression::Prefix(expr) => write!(f, "{}", expr),
            Expression::Infix(expr) => write!(f, "{}", expr),
            Expression::If(expr) => write!(f, "{}", expr),
            Expression::Function(expr) => write!(f, "{}", expr),
            Expression::Call(expr) => write!(f, "{}", expr),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

impl Node for Identifier {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

impl Node for IntegerLiteral {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for IntegerLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

impl Node for BooleanLiteral {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for BooleanLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// `(<operator><right>)`
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: String,
    pub right: Box<Expression>,
}

impl Node for PrefixExpression {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for PrefixExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{})", self.operator, self.right)
    }
}

/// `(<left> <operator> <right>)`
#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
}

impl Node for InfixExpression {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for InfixExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

impl Node for IfExpression {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for IfExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Prefix and infix conditions already carry their own parentheses
        match *self.condition {
            Expression::Prefix(_) | Expression::Infix(_) => write!(f, "if {}", self.condition)?,
            _ => write!(f, "if ({})", self.condition)?,
        }

        write!(f, " {}", self.consequence)?;

        if let Some(alternative) = &self.alternative {
            write!(f, " else {}", alternative)?;
        }

        Ok(())
    }
}

/// `fn(<parameters>) <body>`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

impl Node for FunctionLiteral {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.token.literal)?;
        write_comma_separated(f, &self.parameters)?;
        write!(f, ") {}", self.body)
    }
}

/// `<callee>(<arguments>)`. The token is the opening parenthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub token: Token,
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

impl Node for CallExpression {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for CallExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.callee)?;
        write_comma_separated(f, &self.arguments)?;
        write!(f, ")")
    }
}

fn write_comma_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::token::{SourceLocation, TokenKind};

    fn tok(kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal, SourceLocation::default())
    }

    fn ident(name: &str) -> Identifier {
        Identifier {
            token: tok(TokenKind::Ident, name),
            name: name.to_string(),
        }
    }

    fn ident_expr(name: &str) -> Expression {
        Expression::Identifier(ident(name))
    }

    #[test]
    fn test_let_statement_render() {
        let program = Program {
            statements: vec![Statement::Let(LetStatement {
                token: tok(TokenKind::Let, "let"),
                name: ident("myVar"),
                value: ident_expr("anotherVar"),
            })],
        };

        assert_eq!(program.render(), "let myVar = anotherVar;");
        assert_eq!(program.token_literal(), "let");
    }

    #[test]
    fn test_empty_program() {
        let program = Program::new();
        assert_eq!(program.render(), "");
        assert_eq!(program.token_literal(), "");
    }

    #[test]
    fn test_expression_statements_are_separated() {
        let stmt = |name: &str| {
            Statement::Expression(ExpressionStatement {
                token: tok(TokenKind::Ident, name),
                value: ident_expr(name),
            })
        };
        let program = Program {
            statements: vec![stmt("a"), stmt("b")],
        };

        assert_eq!(program.render(), "a; b");
    }

    #[test]
    fn test_block_render() {
        let empty = BlockStatement {
            token: tok(TokenKind::LBrace, "{"),
            statements: Vec::new(),
        };
        assert_eq!(Statement::Block(empty.clone()).render(), "{ }");

        let block = BlockStatement {
            token: tok(TokenKind::LBrace, "{"),
            statements: vec![Statement::Return(ReturnStatement {
                token: tok(TokenKind::Return, "return"),
                value: ident_expr("x"),
            })],
        };
        assert_eq!(block.render(), "{ return x; }");
        assert_eq!(block.token_literal(), "{");
    }

    #[test]
    fn test_if_condition_parenthesized_once() {
        let consequence = BlockStatement {
            token: tok(TokenKind::LBrace, "{"),
            statements: Vec::new(),
        };

        let plain = IfExpression {
            token: tok(TokenKind::If, "if"),
            condition: Box::new(ident_expr("x")),
            consequence: consequence.clone(),
            alternative: None,
        };
        assert_eq!(plain.render(), "if (x) { }");

        let negated = IfExpression {
            token: tok(TokenKind::If, "if"),
            condition: Box::new(Expression::Prefix(PrefixExpression {
                token: tok(TokenKind::Bang, "!"),
                operator: "!".to_string(),
                right: Box::new(ident_expr("x")),
            })),
            consequence: consequence.clone(),
            alternative: Some(consequence),
        };
        assert_eq!(negated.render(), "if (!x) { } else { }");
    }

    #[test]
    fn test_call_render() {
        let call = CallExpression {
            token: tok(TokenKind::LParen, "("),
            callee: Box::new(ident_expr("add")),
            arguments: vec![
                Expression::Integer(IntegerLiteral {
                    token: tok(TokenKind::Int, "1"),
                    value: 1,
                }),
                Expression::Boolean(BooleanLiteral {
                    token: tok(TokenKind::True, "true"),
                    value: true,
                }),
            ],
        };

        assert_eq!(call.render(), "add(1, true)");
        assert_eq!(Expression::Call(call).token_literal(), "(");
    }
}

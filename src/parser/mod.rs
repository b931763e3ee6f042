//! Monkey source code parser
//!
//! This module transforms Monkey source text into an Abstract Syntax Tree (AST):
//! - [`token`]: Token kinds and tokens
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), with `statements` and `expressions`
//!   extending the [`Parser`] with `impl` blocks
//! - [`ast`]: AST node definitions and canonical rendering
//!
//! # Language
//!
//! - Statements: `let`, `return`, expression statements, `{ ... }` blocks
//! - Expressions: identifiers, 64-bit integers, booleans, prefix `!`/`-`,
//!   infix `+ - * / < > == !=`, `if`/`else`, `fn` literals, calls
//!
//! # Parser Implementation
//!
//! Hand-written Pratt parser with per-token-kind prefix and infix dispatch
//! tables.  Errors never abort a parse: they are collected and the parser
//! resumes at the next statement.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
pub mod token;

pub use ast::{Node, Program};
pub use expressions::MAX_NESTING_DEPTH;
pub use lexer::Lexer;
pub use parse::{parse, ParseError, Parser};
pub use token::{Token, TokenKind};

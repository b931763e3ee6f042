//! # Introduction
//!
//! A front end for the Monkey language: a lexer that classifies source text
//! into tokens, a Pratt parser that builds an AST while collecting
//! diagnostics, and a small REPL that prints either the token stream or the
//! canonical, fully parenthesized program.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → render()
//! ```
//!
//! 1. [`parser`] tokenises the source and builds an AST.
//! 2. [`repl`] reads lines and prints tokens, the rendered program, or the
//!    parser's diagnostics.
//!
//! ```
//! use monkey::parser::{parse, Node};
//!
//! let (program, errors) = parse("a + b * c");
//! assert!(errors.is_empty());
//! assert_eq!(program.render(), "(a + (b * c))");
//! ```

pub mod parser;
pub mod repl;

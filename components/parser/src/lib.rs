//! Drake Parser Component
//!
//! Provides the lexer, the AST and the recursive descent parser for the
//! Drake language.
//!
//! # Overview
//!
//! - [`Lexer`] - Tokenizes Drake source code
//! - [`Token`] - Token types including identifiers, literals, keywords
//! - [`Parser`] - Recursive descent parser producing a [`Program`]
//! - [`Node`] - Abstract Syntax Tree node with its source position
//!
//! # Example
//!
//! ```
//! use drake_parser::{parse, BinaryOperator, NodeKind};
//!
//! let program = parse("total = 1 + 2 * 3").unwrap();
//! assert_eq!(program.body.len(), 1);
//!
//! let NodeKind::Assignment { value, .. } = &program.body[0].kind else {
//!     panic!("expected an assignment");
//! };
//! assert!(matches!(
//!     value.kind,
//!     NodeKind::BinaryOp { operator: BinaryOperator::Add, .. }
//! ));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod combinators;
pub mod error;
pub mod lexer;
pub mod parser;
mod precedence;
#[cfg(test)]
mod testing;

pub use ast::{
    AssignmentOperator, BinaryOperator, CatchClause, Declaration, EnumMember, KeywordArgument,
    KeywordParam, KeywordParamKind, Lambda, ListLiteral, Literal, Node, NodeKind, Pair,
    PositionalParam, Postfix, Program, Target, TargetModifier, TypeHint, UnaryOperator,
};
pub use combinators::ListOutcome;
pub use lexer::{
    tokenize, Keyword, Lexer, NumberBase, NumberLiteral, Punctuator, SpannedToken, Token,
};
pub use parser::Parser;

use core_types::DrakeResult;

/// Lex and parse `source` into a program
pub fn parse(source: &str) -> DrakeResult<Program> {
    let mut parser = Parser::new(source)?;
    Ok(parser.parse_program()?)
}

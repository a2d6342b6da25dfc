//! KubeSQL query parser.
//!
//! Turns a single `SELECT ... FROM ... WHERE ... ORDER BY ... LIMIT ...`
//! string into a serializable [`Query`]. `WHERE` bodies and field
//! expressions are TSL and are passed through as [`TslQuery`] text.
#![deny(missing_docs)]

mod ast;
mod token;

pub mod clauses;
pub mod extract;
pub mod parser;
pub mod util;

pub use ast::*;
pub use clauses::ClauseError;
pub use extract::{extract_clauses, Clause, Sections};
pub use parser::{parse, ParseError, Parser};
pub use token::{LexItem, Lexer, Span, Token};

//! Boolean query-string parsing.
//!
//! This crate turns a small query language into a [`Condition`] tree:
//!
//! - **Terms**: `rust`, matched against any field
//! - **Phrases**: `"error handling"`, one value with spaces kept
//! - **Fields**: `title:guide` scopes a value to a field
//! - **Operators**: `AND`, `OR`, `NOT` (case-insensitive), with adjacent
//!   terms joined by an implicit `OR`
//! - **Grouping**: `(a OR b) AND c`
//! - **Ranges**: `date:[2020 TO *}` with `[`/`]` inclusive, `{`/`}` exclusive
//!   and `*` for an open side
//! - **Escapes**: `test\ value`, `a\:b`, `\AND`
//!
//! Chains of one operator are right-leaning: `a b c` parses to
//! `Or(a, Or(b, c))`.
//!
//! # Example
//!
//! ```
//! use qs_query::{Condition, parse};
//!
//! let cond = parse("title:guide AND NOT draft").unwrap();
//! assert_eq!(
//!     cond,
//!     Condition::and(
//!         Condition::matching("title", "guide"),
//!         Condition::negate(Condition::term("draft")),
//!     )
//! );
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::Condition;
pub use error::{LexError, QueryError, SyntaxError};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{DEFAULT_MAX_DEPTH, ParseOptions, parse, parse_with};

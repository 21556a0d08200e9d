//! Tokenizer, grammar and AST for quickql filter expressions.
//!
//! The query language is meant for search and filter boxes:
//!
//! - **Comparisons**: `age > 20`, `name = "Bob"`, `title ~ rust`
//! - **Qualifiers**: `status:open` - GitHub-style shorthand for `status = open`
//! - **Bare values**: `urgent` - an existence or identity test
//! - **AND**: `a b` or `a AND b` - both must hold
//! - **OR**: `a OR b` - alternatives
//! - **NOT**: `NOT a` or `-a` - negation
//! - **Grouping**: `(a OR b) c` - precedence control
//! - **Paths**: `user.address.city:Paris` - nested fields
//!
//! Keywords are case-insensitive. Every parsed tree renders to a canonical
//! S-expression through [`Expr::canonical`].
//!
//! # Example
//!
//! ```
//! use quickql_query::parse;
//!
//! let expr = parse(r#"name = "Bob" and (age > 20 or age < 5)"#).unwrap();
//! assert_eq!(
//!     expr.canonical(),
//!     r#"(and (= name "Bob") (or (> age "20") (< age "5")))"#
//! );
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;
mod token;
mod trace;

pub use ast::{AndExpr, CompareOp, Comparison, Expr, Identifier, OrExpr, Primary, Value};
pub use error::{
    BAD_BANG, DANGLING_ESCAPE, DOUBLE_EQUALS, LexError, ParseError, UNTERMINATED_STRING,
};
pub use lexer::{Tokenizer, tokenize};
pub use parser::{MAX_DEPTH, QueryParser, TracedParse, parse, parse_with_trace};
pub use token::{Keyword, Location, Position, Token, TokenKind, debug_output, symbols};

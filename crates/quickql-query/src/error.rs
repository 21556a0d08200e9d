//! Error types for tokenizing and parsing queries.

use thiserror::Error;

use crate::token::Location;

/// Diagnostic for a `!` not followed by `=` or `~`.
pub const BAD_BANG: &str = "operator ! must be followed by = or ~";
/// Diagnostic for `==`.
pub const DOUBLE_EQUALS: &str = "double == not allowed";
/// Diagnostic for a string missing its closing quote.
pub const UNTERMINATED_STRING: &str = "unterminated string";
/// Diagnostic for a backslash at the end of the input.
pub const DANGLING_ESCAPE: &str = "no character after escape";

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct LexError {
    /// Where the offending token starts.
    pub location: Location,
    /// Fixed diagnostic describing the problem.
    pub message: String,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// Error returned when a query cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The tokenizer rejected the input.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The tokens do not match the grammar.
    #[error("{location}: expected {expected}, found {found}")]
    Syntax {
        /// Position of the offending token.
        location: Location,
        /// What the grammar would have accepted.
        expected: String,
        /// Description of the token that was there instead.
        found: String,
    },
}

impl ParseError {
    /// Creates a grammar error.
    pub fn syntax(
        location: Location,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            location,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Returns where the error occurred.
    pub fn location(&self) -> &Location {
        match self {
            Self::Lex(err) => &err.location,
            Self::Syntax { location, .. } => location,
        }
    }

    /// Returns the error message without its location prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Lex(err) => err.message.clone(),
            Self::Syntax {
                expected, found, ..
            } => format!("expected {expected}, found {found}"),
        }
    }

    /// Returns a suggestion for common mistakes.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Lex(err) => match err.message.as_str() {
                BAD_BANG => Some("use != for \"not equal\" or !~ for \"does not match\""),
                DOUBLE_EQUALS => Some("use a single = (or :) to compare a field"),
                UNTERMINATED_STRING => Some("add the matching closing quote"),
                DANGLING_ESCAPE => Some("a backslash must be followed by the character it escapes"),
                _ => None,
            },
            Self::Syntax {
                expected, found, ..
            } => {
                let keyword = found.starts_with("keyword");
                if expected.contains("')'") {
                    Some("add a closing parenthesis ) to match the opening one")
                } else if expected.ends_with("levels of nesting") {
                    Some("remove redundant parentheses or negations")
                } else if expected == "field name" {
                    Some("field paths are words joined by single dots, such as user.name")
                } else if keyword && expected == "expression" {
                    Some("AND and OR need an expression on both sides")
                } else if keyword && expected == "value" {
                    Some("quote a keyword to use it as a value, as in \"or\"")
                } else if found.starts_with("operator") {
                    Some("the left side of a comparison must be a plain field name such as user.name")
                } else if found == "')'" {
                    Some("remove the unmatched closing parenthesis")
                } else {
                    None
                }
            }
        }
    }
}

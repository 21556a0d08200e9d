//! Tokens, source positions and the token-kind table.
//!
//! The tokenizer emits a flat stream of [`Token`]s. Every token carries a
//! [`TokenKind`], its normalized text and the [`Position`] of its first
//! character. The kind table ([`TokenKind::ALL`], [`TokenKind::name`],
//! [`symbols`]) exists for diagnostics and debug dumps.

use std::fmt;

use serde::{Serialize, Serializer};

/// A line/column position in the query text. Both start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1.
    pub column: usize,
}

impl Position {
    /// The position of the first character of any input.
    pub const START: Self = Self { line: 1, column: 1 };

    /// Creates a position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns the position following `ch`.
    ///
    /// A newline moves to column 1 of the next line; a carriage return is
    /// consumed without moving the column.
    pub(crate) fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                line: self.line + 1,
                column: 1,
            },
            '\r' => self,
            _ => Self {
                line: self.line,
                column: self.column + 1,
            },
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A position plus the optional label of the input it belongs to.
///
/// Renders as `line:column`, or `filename:line:column` when a label is set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    /// Caller-supplied label for the input (not a real path).
    pub filename: Option<String>,
    /// Line and column inside the input.
    pub position: Position,
}

impl Location {
    /// Creates a location.
    pub fn new(filename: Option<&str>, position: Position) -> Self {
        Self {
            filename: filename.filter(|f| !f.is_empty()).map(str::to_string),
            position,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(name) => write!(f, "{name}:{}", self.position),
            None => write!(f, "{}", self.position),
        }
    }
}

/// The closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of the input. Always the last token of a stream.
    EndOfInput,
    /// Whitespace. Skipped by the tokenizer, kept for completeness of the table.
    Whitespace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// A quoted string; `text` holds the unescaped content without quotes.
    String,
    /// A name made only of ASCII letters, `_` and `.`.
    Identifier,
    /// Any other unquoted run of characters (numbers, mixed tokens).
    Value,
    /// A comparison operator, normalized (`:` arrives as `=`).
    Operator,
    /// `AND`, `OR` or `NOT` in any casing; `-` arrives as `NOT`.
    Keyword,
    /// A lexical error; `text` holds the diagnostic.
    Illegal,
}

impl TokenKind {
    /// Every token kind, in table order.
    pub const ALL: [Self; 10] = [
        Self::EndOfInput,
        Self::Whitespace,
        Self::LeftParen,
        Self::RightParen,
        Self::String,
        Self::Identifier,
        Self::Value,
        Self::Operator,
        Self::Keyword,
        Self::Illegal,
    ];

    /// Returns the symbolic name used in debug output.
    pub fn name(self) -> &'static str {
        match self {
            Self::EndOfInput => "EOF",
            Self::Whitespace => "WS",
            Self::LeftParen => "LPAREN",
            Self::RightParen => "RPAREN",
            Self::String => "STRING",
            Self::Identifier => "IDENT",
            Self::Value => "VALUE",
            Self::Operator => "OP",
            Self::Keyword => "KEYWORD",
            Self::Illegal => "ILLEGAL",
        }
    }

    /// Looks up a kind by its symbolic name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Returns the name/kind pairs of the token-kind table.
pub fn symbols() -> Vec<(&'static str, TokenKind)> {
    TokenKind::ALL
        .into_iter()
        .map(|kind| (kind.name(), kind))
        .collect()
}

/// Boolean connectives recognised by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `AND` / `and`
    And,
    /// `OR` / `or`
    Or,
    /// `NOT` / `not` / leading `-`
    Not,
}

impl Keyword {
    /// Matches `text` against the keywords, ignoring ASCII case.
    pub fn from_text(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if text.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else if text.eq_ignore_ascii_case("not") {
            Some(Self::Not)
        } else {
            None
        }
    }

    /// Returns the canonical uppercase spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

/// A single token of the query language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Normalized lexeme, or the diagnostic for [`TokenKind::Illegal`].
    pub text: String,
    /// Position of the first character.
    pub position: Position,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Returns the keyword this token stands for, if it is one.
    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword => Keyword::from_text(&self.text),
            _ => None,
        }
    }

    /// Returns true if this token is the given keyword.
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }

    /// Describes the token for "expected X, found Y" diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => "end of input".to_string(),
            TokenKind::Whitespace => "whitespace".to_string(),
            TokenKind::LeftParen => "'('".to_string(),
            TokenKind::RightParen => "')'".to_string(),
            TokenKind::String => format!("string {:?}", self.text),
            TokenKind::Identifier => format!("identifier '{}'", self.text),
            TokenKind::Value => format!("value '{}'", self.text),
            TokenKind::Operator => format!("operator '{}'", self.text),
            TokenKind::Keyword => format!("keyword '{}'", self.text),
            TokenKind::Illegal => format!("illegal token ({})", self.text),
        }
    }
}

/// Renders tokens as `Token{KIND, "text"}` lines for debug dumps.
pub fn debug_output(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| format!("Token{{{}, {:?}}}", token.kind.name(), token.text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_table_is_complete_and_invertible() {
        let table = symbols();
        assert_eq!(table.len(), TokenKind::ALL.len());
        for (name, kind) in table {
            assert_eq!(TokenKind::from_name(name), Some(kind));
            assert_eq!(kind.name(), name);
        }
    }

    #[test]
    fn unknown_kind_name() {
        assert_eq!(TokenKind::from_name("NUMBER"), None);
        assert_eq!(TokenKind::from_name("ident"), None);
    }

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(Keyword::from_text("and"), Some(Keyword::And));
        assert_eq!(Keyword::from_text("Or"), Some(Keyword::Or));
        assert_eq!(Keyword::from_text("nOT"), Some(Keyword::Not));
        assert_eq!(Keyword::from_text("andy"), None);
    }

    #[test]
    fn position_advances() {
        let pos = Position::START.advance('a');
        assert_eq!(pos, Position::new(1, 2));
        assert_eq!(pos.advance('\r'), pos);
        assert_eq!(pos.advance('\n'), Position::new(2, 1));
    }

    #[test]
    fn location_display() {
        let pos = Position::new(3, 7);
        assert_eq!(Location::new(None, pos).to_string(), "3:7");
        assert_eq!(Location::new(Some(""), pos).to_string(), "3:7");
        assert_eq!(Location::new(Some("query"), pos).to_string(), "query:3:7");
    }

    #[test]
    fn debug_output_format() {
        let tokens = vec![
            Token::new(TokenKind::Identifier, "hello", Position::new(1, 1)),
            Token::new(TokenKind::Operator, "=", Position::new(1, 6)),
            Token::new(TokenKind::String, "a \"b\"", Position::new(1, 7)),
            Token::new(TokenKind::EndOfInput, "", Position::new(1, 14)),
        ];
        assert_eq!(
            debug_output(&tokens),
            vec![
                r#"Token{IDENT, "hello"}"#,
                r#"Token{OP, "="}"#,
                r#"Token{STRING, "a \"b\""}"#,
                r#"Token{EOF, ""}"#,
            ]
        );
    }
}

//! Query lexer (tokenizer).
//!
//! Converts query text into a stream of tokens for the parser. Scanning is a
//! single left-to-right pass with one character of lookahead. Operators are
//! normalized on the way out: `:` becomes `=`, and a `-` that does not start
//! a negative number becomes the `NOT` keyword.

use std::{
    iter::{FusedIterator, Peekable},
    str::Chars,
};

use crate::{
    error::{BAD_BANG, DANGLING_ESCAPE, DOUBLE_EQUALS, LexError, UNTERMINATED_STRING},
    token::{Keyword, Location, Position, Token, TokenKind},
};

/// Lazily tokenizes one query string.
///
/// Yields tokens up to and including the first [`TokenKind::EndOfInput`] or
/// [`TokenKind::Illegal`] token, then stops. Build a new tokenizer to scan
/// again.
pub struct Tokenizer<'a> {
    /// Label echoed back in error locations.
    filename: Option<&'a str>,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Position of the next unread character.
    position: Position,
    /// Set once the terminal token has been produced.
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer for the given input.
    pub fn new(source: &'a str) -> Self {
        Self {
            filename: None,
            chars: source.chars().peekable(),
            position: Position::START,
            finished: false,
        }
    }

    /// Attaches a label that is reported in error locations.
    pub fn with_filename(mut self, filename: &'a str) -> Self {
        self.filename = Some(filename);
        self
    }

    /// Returns the label attached with [`Tokenizer::with_filename`].
    pub fn filename(&self) -> Option<&'a str> {
        self.filename
    }

    /// Scans the next token.
    fn scan(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let Some(ch) = self.bump() else {
            return Token::new(TokenKind::EndOfInput, "", start);
        };

        let (kind, text) = match ch {
            '(' => (TokenKind::LeftParen, "(".to_string()),
            ')' => (TokenKind::RightParen, ")".to_string()),
            '\'' | '"' => self.read_string(ch),
            '~' => (TokenKind::Operator, "~".to_string()),
            '!' => {
                if self.consume_if('=') {
                    (TokenKind::Operator, "!=".to_string())
                } else if self.consume_if('~') {
                    (TokenKind::Operator, "!~".to_string())
                } else {
                    (TokenKind::Illegal, BAD_BANG.to_string())
                }
            }
            // `key:value` is shorthand for `key = value`
            ':' => (TokenKind::Operator, "=".to_string()),
            '=' => {
                if self.consume_if('=') {
                    (TokenKind::Illegal, DOUBLE_EQUALS.to_string())
                } else {
                    (TokenKind::Operator, "=".to_string())
                }
            }
            '<' => {
                let op = if self.consume_if('=') { "<=" } else { "<" };
                (TokenKind::Operator, op.to_string())
            }
            '>' => {
                let op = if self.consume_if('=') { ">=" } else { ">" };
                (TokenKind::Operator, op.to_string())
            }
            '-' if self.peek().is_some_and(|next| next.is_ascii_digit()) => self.read_word(ch),
            '-' => (TokenKind::Keyword, Keyword::Not.as_str().to_string()),
            _ => self.read_word(ch),
        };

        Token::new(kind, text, start)
    }

    /// Reads an identifier, value or keyword starting with `first`.
    ///
    /// The result is an identifier only while every character is an ASCII
    /// letter, `_` or `.`. That is what lets `foo < -12` parse while
    /// `*foo < -12` is rejected: only identifiers can start a comparison.
    fn read_word(&mut self, first: char) -> (TokenKind, String) {
        // most words are short
        let mut text = String::with_capacity(32);
        text.push(first);
        let mut is_identifier = is_identifier_char(first);

        while let Some(ch) = self.peek() {
            if is_whitespace(ch) || is_operator(ch) {
                break;
            }
            is_identifier &= is_identifier_char(ch);
            text.push(ch);
            self.bump();
        }

        let kind = if !is_identifier {
            TokenKind::Value
        } else if Keyword::from_text(&text).is_some() {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        (kind, text)
    }

    /// Reads a string whose opening `quote` was already consumed.
    ///
    /// A backslash inserts the following character verbatim.
    fn read_string(&mut self, quote: char) -> (TokenKind, String) {
        let mut content = String::with_capacity(32);

        loop {
            match self.bump() {
                Some(ch) if ch == quote => return (TokenKind::String, content),
                Some('\\') => match self.bump() {
                    Some(escaped) => content.push(escaped),
                    None => return (TokenKind::Illegal, DANGLING_ESCAPE.to_string()),
                },
                Some(ch) => content.push(ch),
                None => return (TokenKind::Illegal, UNTERMINATED_STRING.to_string()),
            }
        }
    }

    /// Skips spaces, tabs and line breaks.
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.bump();
        }
    }

    /// Returns the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Consumes the next character if it equals `expected`.
    fn consume_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes and returns the next character, tracking its position.
    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position = self.position.advance(ch);
        Some(ch)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        let token = self.scan();
        if matches!(token.kind, TokenKind::EndOfInput | TokenKind::Illegal) {
            self.finished = true;
        }
        Some(token)
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Tokenizes a whole query, including the trailing end-of-input token.
///
/// The first illegal token aborts tokenization with a [`LexError`] at that
/// token's position.
pub fn tokenize(source: &str, filename: Option<&str>) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new(source);
    if let Some(name) = filename {
        tokenizer = tokenizer.with_filename(name);
    }

    let mut tokens = Vec::new();
    for token in tokenizer {
        if token.kind == TokenKind::Illegal {
            return Err(LexError::new(
                Location::new(filename, token.position),
                token.text,
            ));
        }
        tokens.push(token);
    }

    Ok(tokens)
}

/// Characters allowed in an identifier.
fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '.'
}

/// Whitespace separating tokens.
fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// Characters that end a word because they start another token.
fn is_operator(ch: char) -> bool {
    matches!(ch, '=' | '<' | '>' | '!' | ':' | '~' | '(' | ')')
}

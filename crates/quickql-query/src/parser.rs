//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent with two
//! tokens of lookahead.
//!
//! # Grammar
//!
//! ```text
//! expr       → or_expr
//! or_expr    → and_expr ("OR" and_expr)*
//! and_expr   → primary ("AND"? primary)*
//! primary    → "NOT" primary
//!            | "(" or_expr ")"
//!            | IDENT OP value
//!            | value
//! value      → STRING | VALUE | IDENT
//! ```
//!
//! Keywords match in any casing. A leading `-` arrives from the lexer as
//! `NOT`, and `:` arrives as `=`.
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. Negation: `NOT`, `-`
//! 3. AND (explicit keyword or juxtaposition)
//! 4. OR
//!
//! Groups and negations nest at most [`MAX_DEPTH`] levels deep.

use crate::{
    ast::{AndExpr, CompareOp, Comparison, Expr, Identifier, OrExpr, Primary, Value},
    error::ParseError,
    lexer::tokenize,
    token::{Keyword, Location, Token, TokenKind},
    trace::Trace,
};

/// Deepest allowed nesting of groups and negations.
pub const MAX_DEPTH: usize = 64;

/// Reusable, immutable parser configuration.
///
/// Holds no per-parse state, so one instance can serve any number of parses.
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
    /// Label reported in error locations.
    filename: Option<String>,
}

/// Outcome of [`QueryParser::parse_traced`].
#[derive(Debug)]
pub struct TracedParse {
    /// The parsed expression or the error.
    pub result: Result<Expr, ParseError>,
    /// One line per grammar decision, in order.
    pub trace: String,
}

impl QueryParser {
    /// Creates a parser with no filename label.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label reported in error locations.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Parses a query string.
    ///
    /// Empty and whitespace-only input yields an empty [`Expr`].
    pub fn parse(&self, text: &str) -> Result<Expr, ParseError> {
        self.run(text, None).0
    }

    /// Parses a query string and records the parser's decisions.
    pub fn parse_traced(&self, text: &str) -> TracedParse {
        let (result, trace) = self.run(text, Some(Trace::default()));
        TracedParse {
            result,
            trace: trace.map(Trace::finish).unwrap_or_default(),
        }
    }

    /// Tokenizes and parses `text`, threading the optional trace through.
    fn run(
        &self,
        text: &str,
        mut trace: Option<Trace>,
    ) -> (Result<Expr, ParseError>, Option<Trace>) {
        let filename = self.filename.as_deref();

        let tokens = match tokenize(text, filename) {
            Ok(tokens) => tokens,
            Err(err) => {
                if let Some(trace) = trace.as_mut() {
                    trace.note(format!("tokenize failed: {err}"));
                }
                return (Err(err.into()), trace);
            }
        };

        if let Some(trace) = trace.as_mut() {
            trace.note(format!("tokenized {} tokens", tokens.len()));
        }

        let mut parser = Parser::new(tokens, filename, trace);
        let result = parser.parse();
        (result, parser.trace)
    }
}

/// Parses a query string into an AST.
///
/// Returns an empty [`Expr`] for empty queries and a [`ParseError`] for
/// invalid ones. There is no partial result on error.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    QueryParser::new().parse(text)
}

/// Parses a query string, also returning a trace of the parser's decisions.
pub fn parse_with_trace(text: &str) -> TracedParse {
    QueryParser::new().parse_traced(text)
}

/// Recursive descent parser over one token stream.
struct Parser<'a> {
    /// Token stream; always ends with an end-of-input token.
    tokens: Vec<Token>,
    /// Index of the current token.
    position: usize,
    /// Label for error locations.
    filename: Option<&'a str>,
    /// Decision log, when tracing.
    trace: Option<Trace>,
    /// Number of enclosing groups and negations.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over a token stream produced by the lexer.
    fn new(tokens: Vec<Token>, filename: Option<&'a str>, trace: Option<Trace>) -> Self {
        Self {
            tokens,
            position: 0,
            filename,
            trace,
            depth: 0,
        }
    }

    /// Parses: expr → or_expr, requiring all input to be consumed.
    fn parse(&mut self) -> Result<Expr, ParseError> {
        if self.peek().kind == TokenKind::EndOfInput {
            self.note("empty query");
            return Ok(Expr::default());
        }

        self.rule("Expr", |p| {
            let root = p.parse_or_expr()?;
            if p.peek().kind != TokenKind::EndOfInput {
                return Err(p.unexpected("end of input"));
            }
            Ok(Expr::new(root))
        })
    }

    /// Parses: or_expr → and_expr ("OR" and_expr)*
    fn parse_or_expr(&mut self) -> Result<OrExpr, ParseError> {
        self.rule("OrExpr", |p| {
            let mut or = OrExpr::new(p.parse_and_expr()?);

            while p.peek().is_keyword(Keyword::Or) {
                p.note("OR");
                p.advance();
                or.push(p.parse_and_expr()?);
            }

            Ok(or)
        })
    }

    /// Parses: and_expr → primary ("AND"? primary)*
    fn parse_and_expr(&mut self) -> Result<AndExpr, ParseError> {
        self.rule("AndExpr", |p| {
            let mut and = AndExpr::new(p.parse_primary()?);

            loop {
                if p.peek().is_keyword(Keyword::And) {
                    p.note("explicit AND");
                    p.advance();
                } else if p.can_start_primary() {
                    p.note("implicit AND");
                } else {
                    break;
                }
                and.push(p.parse_primary()?);
            }

            Ok(and)
        })
    }

    /// Checks if the current token can start a primary expression.
    fn can_start_primary(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokenKind::LeftParen
            | TokenKind::String
            | TokenKind::Identifier
            | TokenKind::Value => true,
            TokenKind::Keyword => token.is_keyword(Keyword::Not),
            _ => false,
        }
    }

    /// Parses: primary → "NOT" primary | "(" or_expr ")" | IDENT OP value | value
    fn parse_primary(&mut self) -> Result<Primary, ParseError> {
        self.rule("Primary", |p| {
            let kind = p.peek().kind;
            match kind {
                TokenKind::Keyword if p.peek().is_keyword(Keyword::Not) => {
                    p.note("negation");
                    p.nested(|p| {
                        p.advance();
                        Ok(Primary::not(p.parse_primary()?))
                    })
                }
                TokenKind::LeftParen => {
                    p.note("group");
                    p.nested(|p| {
                        p.advance();
                        let inner = p.parse_or_expr()?;
                        p.expect_right_paren()?;
                        Ok(Primary::group(Expr::new(inner)))
                    })
                }
                TokenKind::Identifier if p.peek_second().kind == TokenKind::Operator => {
                    p.note("comparison");
                    p.parse_comparison().map(Primary::Comparison)
                }
                TokenKind::String | TokenKind::Value | TokenKind::Identifier => {
                    p.note("bare value");
                    let value = p.parse_value()?;
                    Ok(Primary::Bare { value })
                }
                _ => Err(p.unexpected("expression")),
            }
        })
    }

    /// Parses: IDENT OP value
    fn parse_comparison(&mut self) -> Result<Comparison, ParseError> {
        let Some(field) = Identifier::from_path(&self.peek().text) else {
            return Err(self.unexpected("field name"));
        };
        self.advance();

        let op_token = self.peek();
        let op = op_token
            .text
            .parse::<CompareOp>()
            .map_err(|_| self.unexpected("comparison operator"))?;
        self.advance();

        let value = self.parse_value()?;
        Ok(Comparison { field, op, value })
    }

    /// Parses: value → STRING | VALUE | IDENT
    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let token = self.peek();
        let value = match token.kind {
            TokenKind::String => Value::String(token.text.clone()),
            TokenKind::Value => Value::Scalar(token.text.clone()),
            // `a..b` is not a usable path, but it is still a value
            TokenKind::Identifier => match Identifier::from_path(&token.text) {
                Some(path) => Value::FieldRef(path),
                None => Value::Scalar(token.text.clone()),
            },
            _ => return Err(self.unexpected("value")),
        };
        self.advance();
        Ok(value)
    }

    /// Consumes the `)` closing a group.
    fn expect_right_paren(&mut self) -> Result<(), ParseError> {
        if self.peek().kind != TokenKind::RightParen {
            return Err(self.unexpected("')'"));
        }
        self.advance();
        Ok(())
    }

    /// Runs `parse` one nesting level deeper, failing past [`MAX_DEPTH`].
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.unexpected(&format!("at most {MAX_DEPTH} levels of nesting")));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Runs `parse` as the grammar rule `name`, tracing entry and exit.
    fn rule<T>(
        &mut self,
        name: &str,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if let Some(trace) = self.trace.as_mut() {
            trace.enter(name, &self.tokens[self.position]);
        }

        let result = parse(self);

        if let Some(trace) = self.trace.as_mut() {
            trace.exit(name, result.as_ref().err().map(ParseError::message));
        }
        result
    }

    /// Records a decision in the trace, if tracing.
    fn note(&mut self, message: &str) {
        if let Some(trace) = self.trace.as_mut() {
            trace.note(message);
        }
    }

    /// Builds an error for the current token.
    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::syntax(
            Location::new(self.filename, token.position),
            expected,
            token.describe(),
        )
    }

    /// Returns the current token.
    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    /// Returns the token after the current one, or end of input.
    fn peek_second(&self) -> &Token {
        self.tokens.get(self.position + 1).unwrap_or_else(|| self.peek())
    }

    /// Advances to the next token, never past end of input.
    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Position;

    fn canonical(input: &str) -> String {
        match parse(input) {
            Ok(expr) => expr.canonical(),
            Err(err) => panic!("failed to parse {input:?}: {err}"),
        }
    }

    #[test]
    fn empty_query() {
        assert_eq!(parse("").unwrap(), Expr::default());
        assert_eq!(parse("  \n\t").unwrap(), Expr::default());
    }

    #[test]
    fn golden_renderings() {
        let cases = [
            ("one two three", "(and (value one) (value two) (value three))"),
            ("Fran\u{e7}ois", "(value Fran\u{e7}ois)"),
            (
                "one \u{1F1E8}\u{1F1E6} three",
                "(and (value one) (value \u{1F1E8}\u{1F1E6}) (value three))",
            ),
            ("hello:world", r#"(= hello "world")"#),
            ("country=\u{1F1E8}\u{1F1E6}", "(= country \"\u{1F1E8}\u{1F1E6}\")"),
            ("hello", "(value hello)"),
            ("hello world", "(and (value hello) (value world))"),
            ("hello:null", r#"(= hello "null")"#),
            ("foo:*bar", r#"(= foo "*bar")"#),
            ("bar:*back", r#"(= bar "*back")"#),
            (
                "hello:world OR super:cool",
                r#"(or (= hello "world") (= super "cool"))"#,
            ),
            ("hello:world or cool", r#"(or (= hello "world") (value cool))"#),
            ("world OR super:cool", r#"(or (value world) (= super "cool"))"#),
            ("hello:66e839032fb119d31dc9c968", r#"(= hello "66e839032fb119d31dc9c968")"#),
            (r#"hello:"super cool""#, r#"(= hello "super cool")"#),
            ("hello:66", r#"(= hello "66")"#),
            ("hello:66.2", r#"(= hello "66.2")"#),
            ("hello = [world]", r#"(= hello "[world]")"#),
            ("foo>1 AND bar<2", r#"(and (> foo "1") (< bar "2"))"#),
            ("panic NOT ever", "(and (value panic) (NOT (value ever)))"),
            (
                "repo:has.commit.after(yesterday)",
                r#"(and (= repo "has.commit.after") (value yesterday))"#,
            ),
            (r#"name = "Bill""#, r#"(= name "Bill")"#),
            (r#"name eq "Bill""#, r#"(and (value name) (value eq) (value "Bill"))"#),
            ("-10", "(value -10)"),
            ("-hello:world", r#"(NOT (= hello "world"))"#),
            ("not not a", "(NOT (NOT (value a)))"),
            ("-(a b)", "(NOT (and (value a) (value b)))"),
            ("a.b.c:d", r#"(= a.b.c "d")"#),
        ];

        for (input, expected) in cases {
            assert_eq!(canonical(input), expected, "input: {input}");
        }
    }

    #[test]
    fn end_to_end_example() {
        let expected = r#"(and (= name "Bob") (or (> age "20") (< age "5")))"#;
        assert_eq!(canonical(r#"name = "Bob" and (age > 20 or age < 5)"#), expected);
        assert_eq!(canonical(r#"name = "Bob" and (age>20 or age<5)"#), expected);
    }

    #[test]
    fn mixed_groups() {
        assert_eq!(
            canonical("cat!=dog ( foo>1 AND bar<2 and cat=fish) OR ( baz<=3 AND qux>=4 )"),
            r#"(or (and (!= cat "dog") (and (> foo "1") (< bar "2") (= cat "fish"))) (and (<= baz "3") (>= qux "4")))"#
        );
    }

    #[test]
    fn every_operator() {
        for op in CompareOp::ALL {
            let spaced = canonical(&format!("hello {op} world"));
            let tight = canonical(&format!("hello{op}world"));
            assert_eq!(spaced, format!(r#"({op} hello "world")"#));
            assert_eq!(spaced, tight);
        }
    }

    #[test]
    fn comparison_structure() {
        let expr = parse("age >= 21").unwrap();
        let root = expr.root.as_ref().unwrap();
        assert_eq!(root.operands().len(), 1);
        let primaries = root.operands()[0].operands();
        assert_eq!(
            primaries,
            &[Primary::Comparison(Comparison {
                field: Identifier::from_path("age").unwrap(),
                op: CompareOp::Ge,
                value: Value::Scalar("21".into()),
            })]
        );
    }

    #[test]
    fn bare_tokens_form_one_and() {
        let expr = parse("one two three").unwrap();
        let root = expr.root.unwrap();
        assert_eq!(root.operands().len(), 1);
        let primaries = root.operands()[0].operands();
        assert_eq!(primaries.len(), 3);
        assert_eq!(
            primaries[2],
            Primary::Bare {
                value: Value::FieldRef(Identifier::from_path("three").unwrap())
            }
        );
    }

    #[test]
    fn groups_are_kept_in_the_tree() {
        let expr = parse("(a)").unwrap();
        let root = expr.root.unwrap();
        let primary = &root.operands()[0].operands()[0];
        assert!(matches!(primary, Primary::Group { .. }));
    }

    #[test]
    fn nesting_up_to_the_limit() {
        let query = format!("{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(canonical(&query), "(value a)");

        let query = format!("{}a", "-".repeat(MAX_DEPTH));
        assert!(parse(&query).is_ok());
    }

    #[test]
    fn deep_groups_are_rejected() {
        for depth in [MAX_DEPTH + 1, 500, 5000] {
            let query = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
            let err = parse(&query).unwrap_err();
            assert_eq!(err.location().position, Position::new(1, MAX_DEPTH + 1));
            assert_eq!(
                err.message(),
                format!("expected at most {MAX_DEPTH} levels of nesting, found '('")
            );
        }
    }

    #[test]
    fn deep_negations_are_rejected() {
        for depth in [MAX_DEPTH + 1, 1000] {
            let err = parse(&format!("{}a", "-".repeat(depth))).unwrap_err();
            assert_eq!(err.location().position, Position::new(1, MAX_DEPTH + 1));
            assert!(err.message().contains("levels of nesting"), "{err}");
        }

        let mixed = "not (".repeat(MAX_DEPTH) + "a" + &")".repeat(MAX_DEPTH);
        assert!(parse(&mixed).is_err());
    }

    #[test]
    fn field_paths_need_every_segment() {
        let cases = [
            ("a..b:1", "1:1: expected field name, found identifier 'a..b'"),
            (".:1", "1:1: expected field name, found identifier '.'"),
            ("a.:1", "1:1: expected field name, found identifier 'a.'"),
        ];
        for (input, expected) in cases {
            let err = parse(input).unwrap_err();
            assert_eq!(err.to_string(), expected, "input: {input}");
        }

        // empty segments survive only as plain values
        assert_eq!(canonical("x = a..b"), r#"(= x "a..b")"#);
        assert_eq!(canonical("."), "(value .)");
        let expr = parse("x = a..b").unwrap();
        let root = expr.root.unwrap();
        let Primary::Comparison(cmp) = &root.operands()[0].operands()[0] else {
            panic!("expected comparison");
        };
        assert_eq!(cmp.value, Value::Scalar("a..b".into()));
    }

    #[test]
    fn hints_follow_the_failure() {
        let leading = parse("OR a").unwrap_err();
        assert_eq!(leading.hint(), Some("AND and OR need an expression on both sides"));

        let trailing = parse("a AND").unwrap_err();
        assert_eq!(trailing.hint(), None);

        let keyword_value = parse("a = or").unwrap_err();
        assert!(keyword_value.hint().unwrap().contains("quote"));
    }

    #[test]
    fn equivalences() {
        let pairs = [
            ("a:b", "a=b"),
            ("a:b c:d", "a:b AND c:d"),
            ("a:b c:d", "a:b and c:d"),
            ("a or b", "a OR b"),
            ("not a", "-a"),
            ("NOT a", "Not a"),
            ("(a>1) OR (b<2)", "a>1 OR b<2"),
            ("hello>=3 OR world<=4.7", "(hello>=3) OR (world<=4.7)"),
        ];
        for (left, right) in pairs {
            assert_eq!(canonical(left), canonical(right), "{left} vs {right}");
        }
    }

    #[test]
    fn rendering_is_stable() {
        let input = "cat!=dog (foo>1 AND bar<2) OR -baz";
        assert_eq!(canonical(input), canonical(input));
    }

    #[test]
    fn lexical_errors_surface() {
        for input in ["foo!bar", "foo==bar", "\"foo", "'test\\"] {
            let err = parse(input).unwrap_err();
            assert!(matches!(err, ParseError::Lex(_)), "input: {input}");
        }
    }

    #[test]
    fn value_cannot_start_comparison() {
        assert_eq!(canonical("foo < -12"), r#"(< foo "-12")"#);

        let err = parse("*foo < -12").unwrap_err();
        assert_eq!(err.location().position, Position::new(1, 6));
        assert_eq!(err.message(), "expected end of input, found operator '<'");
        assert!(err.hint().is_some());
    }

    #[test]
    fn grammar_errors() {
        let cases = [
            ("(a", "1:3: expected ')', found end of input"),
            ("a)", "1:2: expected end of input, found ')'"),
            ("a OR", "1:5: expected expression, found end of input"),
            ("OR a", "1:1: expected expression, found keyword 'OR'"),
            ("a AND", "1:6: expected expression, found end of input"),
            ("()", "1:2: expected expression, found ')'"),
            ("a =", "1:4: expected value, found end of input"),
            ("= a", "1:1: expected expression, found operator '='"),
            ("a = or", "1:5: expected value, found keyword 'or'"),
            ("a = (b)", "1:5: expected value, found '('"),
            ("not", "1:4: expected expression, found end of input"),
        ];

        for (input, expected) in cases {
            let err = parse(input).unwrap_err();
            assert_eq!(err.to_string(), expected, "input: {input}");
        }
    }

    #[test]
    fn errors_use_filename() {
        let parser = QueryParser::new().with_filename("filter");
        let err = parser.parse("(a").unwrap_err();
        assert_eq!(err.to_string(), "filter:1:3: expected ')', found end of input");

        let err = parser.parse("a == b").unwrap_err();
        assert_eq!(err.to_string(), "filter:1:3: double == not allowed");
    }

    #[test]
    fn parser_is_reusable() {
        let parser = QueryParser::new();
        let first = parser.parse("a:b").unwrap();
        assert!(parser.parse("(").is_err());
        assert_eq!(parser.parse("a:b").unwrap(), first);
    }

    #[test]
    fn trace_records_decisions() {
        let traced = parse_with_trace("a:b c");
        assert_eq!(traced.result.unwrap().canonical(), r#"(and (= a "b") (value c))"#);
        assert!(traced.trace.contains("comparison"));
        assert!(traced.trace.contains("implicit AND"));
        assert!(traced.trace.contains("bare value"));
        assert!(traced.trace.contains("Expr ok"));
    }

    #[test]
    fn trace_on_failure() {
        let traced = parse_with_trace("a AND (b");
        assert!(traced.result.is_err());
        assert!(traced.trace.contains("explicit AND"));
        assert!(traced.trace.contains("Primary failed: expected ')', found end of input"));

        let traced = parse_with_trace("a!b");
        assert!(traced.result.is_err());
        assert!(traced.trace.contains("tokenize failed"));
    }

    #[test]
    fn trace_matches_plain_parse() {
        for input in ["", "a b", "x>1 OR (y<2 z)", "(", "a ! b"] {
            assert_eq!(parse_with_trace(input).result, parse(input), "input: {input}");
        }
    }

    #[test]
    fn empty_query_trace() {
        let traced = parse_with_trace("");
        assert!(traced.result.unwrap().is_empty());
        assert!(traced.trace.contains("empty query"));
    }
}

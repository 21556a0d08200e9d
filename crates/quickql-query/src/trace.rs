//! Human-readable record of the parser's decisions.
//!
//! Only used for diagnostics; parsing never reads it back.

use crate::token::Token;

/// Collects one indented line per grammar step.
#[derive(Debug, Default)]
pub struct Trace {
    /// Rendered lines.
    lines: Vec<String>,
    /// Current rule nesting depth.
    depth: usize,
}

impl Trace {
    /// Records entering `rule` with `token` as the current token.
    pub fn enter(&mut self, rule: &str, token: &Token) {
        self.push(format!(
            "{rule} @ {} {}",
            token.position,
            token.describe()
        ));
        self.depth += 1;
    }

    /// Records leaving `rule`, with the error message if it failed.
    pub fn exit(&mut self, rule: &str, error: Option<String>) {
        self.depth = self.depth.saturating_sub(1);
        match error {
            Some(message) => self.push(format!("{rule} failed: {message}")),
            None => self.push(format!("{rule} ok")),
        }
    }

    /// Records a decision inside the current rule.
    pub fn note(&mut self, message: impl AsRef<str>) {
        self.push(format!("- {}", message.as_ref()));
    }

    /// Returns the trace as newline-terminated text.
    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Appends a line at the current depth.
    fn push(&mut self, line: String) {
        self.lines.push(format!("{}{line}", "  ".repeat(self.depth)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Position, TokenKind};

    #[test]
    fn indents_by_depth() {
        let token = Token::new(TokenKind::Identifier, "a", Position::START);
        let mut trace = Trace::default();
        trace.enter("OrExpr", &token);
        trace.enter("Primary", &token);
        trace.note("bare value");
        trace.exit("Primary", None);
        trace.exit("OrExpr", Some("boom".into()));

        assert_eq!(
            trace.finish(),
            "OrExpr @ 1:1 identifier 'a'\n  Primary @ 1:1 identifier 'a'\n    - bare value\n  Primary ok\nOrExpr failed: boom\n"
        );
    }

    #[test]
    fn empty_trace_is_empty() {
        assert_eq!(Trace::default().finish(), "");
    }
}

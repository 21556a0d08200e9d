//! Terminal styling, diagnostics and JSON/table output for the CLI.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use quickql_query::{ParseError, Token};
use serde::Serialize;

/// ANSI color codes for terminal output.
mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow text (for hints and warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text (for errors).
    pub const RED: &str = "\x1b[31m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Applies ANSI styling when color output is enabled.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    /// Whether to emit escape codes at all.
    color: bool,
}

impl Style {
    /// Creates a style; `color = false` passes text through unchanged.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Wraps `text` in the given escape codes.
    fn paint(self, codes: &str, text: &str) -> String {
        if self.color {
            format!("{codes}{text}{}", colors::RESET)
        } else {
            text.to_string()
        }
    }

    /// Formats a header with bold cyan styling.
    pub fn header(self, text: &str) -> String {
        self.paint(&format!("{}{}", colors::BOLD, colors::CYAN), text)
    }

    /// Formats text as dimmed/less important.
    pub fn dim(self, text: &str) -> String {
        self.paint(colors::DIM, text)
    }

    /// Formats text as an error (red).
    pub fn error(self, text: &str) -> String {
        self.paint(colors::RED, text)
    }

    /// Formats text as a warning (yellow).
    pub fn warning(self, text: &str) -> String {
        self.paint(colors::YELLOW, text)
    }
}

/// Prints a parse error with the offending line, a caret and a hint.
pub fn report_parse_error(style: Style, query: &str, err: &ParseError) {
    eprintln!("{}: {err}", style.error("error"));

    let position = err.location().position;
    if let Some(line) = query.lines().nth(position.line.saturating_sub(1)) {
        eprintln!("  {line}");
        eprintln!(
            "  {}{}",
            " ".repeat(position.column.saturating_sub(1)),
            style.error("^")
        );
    }

    if let Some(hint) = err.hint() {
        eprintln!("{}: {hint}", style.warning("hint"));
    }
}

/// Prints a parser trace to stderr.
pub fn print_trace(style: Style, trace: &str) {
    eprintln!("{}", style.header("trace:"));
    for line in trace.lines() {
        eprintln!("  {}", style.dim(line));
    }
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Builds a table with one row per token.
pub fn token_table(tokens: &[Token]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Kind", "Text", "Position"]);

    for (index, token) in tokens.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index),
            Cell::new(token.kind.name()),
            Cell::new(format!("{:?}", token.text)),
            Cell::new(token.position.to_string()),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use quickql_query::tokenize;

    use super::*;

    #[test]
    fn plain_style_passes_text_through() {
        let style = Style::new(false);
        assert_eq!(style.header("h"), "h");
        assert_eq!(style.dim("d"), "d");
        assert_eq!(style.error("e"), "e");
    }

    #[test]
    fn color_style_wraps_text() {
        let style = Style::new(true);
        assert_eq!(style.error("e"), "\x1b[31me\x1b[0m");
        assert!(style.header("h").starts_with("\x1b[1m\x1b[36m"));
    }

    #[test]
    fn table_lists_every_token() {
        let tokens = tokenize("a:1", None).unwrap();
        let rendered = token_table(&tokens).to_string();
        assert!(rendered.contains("IDENT"));
        assert!(rendered.contains("OP"));
        assert!(rendered.contains("VALUE"));
        assert!(rendered.contains("EOF"));
        assert!(rendered.contains("1:4"));
    }
}

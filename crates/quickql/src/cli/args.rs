//! Clap argument definitions for the `qql` CLI.

use clap::{ArgAction, Args, Parser, Subcommand};
use quickql_config::OutputFormat;

/// Parse an output format from a string.
fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "qql")]
#[command(about = "Parse and inspect quickql filter expressions")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Supported `qql` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse queries and print their syntax trees
    Parse(ParseCommand),

    /// Print the token stream of a query
    Tokens(TokensCommand),

    /// Show configuration files and effective settings
    Config,
}

/// Shared flags controlling error diagnostics.
#[derive(Args, Debug, Clone, Default)]
pub struct DiagnosticsArgs {
    /// Label shown in front of error positions (overrides parse.filename)
    #[arg(long)]
    pub filename: Option<String>,

    /// Verbosity level (-v prints the parser trace on failure, -vv always)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Arguments for `qql parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Queries to parse (put `--` before queries starting with `-`)
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Output format: canonical, tree or json [default: canonical]
    #[arg(short = 'f', long, value_parser = parse_format)]
    pub format: Option<OutputFormat>,

    #[command(flatten)]
    /// Diagnostic flags.
    pub diagnostics: DiagnosticsArgs,
}

/// Arguments for `qql tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    /// Query to tokenize (put `--` before a query starting with `-`)
    pub query: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Label shown in front of error positions (overrides parse.filename)
    #[arg(long)]
    pub filename: Option<String>,
}

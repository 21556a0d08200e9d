//! Implementation of `qql parse`.

use std::process::ExitCode;

use quickql_config::OutputFormat;
use quickql_query::Expr;
use serde::Serialize;

use crate::cli::{
    args::ParseCommand,
    context::CommandContext,
    output::{print_json, print_trace, report_parse_error},
};

/// JSON document printed by `qql parse --format json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// One entry per query, in argument order.
    queries: Vec<JsonQuery<'a>>,
}

/// A single parsed query in JSON output.
#[derive(Serialize)]
struct JsonQuery<'a> {
    /// The query text as given.
    query: &'a str,
    /// Canonical S-expression rendering.
    canonical: String,
    /// The syntax tree.
    ast: Expr,
}

/// Parses every query and prints its rendering.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let style = ctx.style();
    let format = cmd.format.unwrap_or(ctx.config.output.format);
    let verbose = cmd.diagnostics.verbose;
    let parser = ctx.parser(cmd.diagnostics.filename.as_deref());

    let mut json = JsonOutput {
        queries: Vec::new(),
    };

    for query in &cmd.queries {
        let traced = parser.parse_traced(query);
        let expr = match traced.result {
            Ok(expr) => {
                if verbose >= 2 {
                    print_trace(style, &traced.trace);
                }
                expr
            }
            Err(e) => {
                report_parse_error(style, query, &e);
                if verbose >= 1 || ctx.config.parse.trace_on_error {
                    print_trace(style, &traced.trace);
                }
                return ExitCode::FAILURE;
            }
        };

        match format {
            OutputFormat::Canonical => println!("{}", expr.canonical()),
            OutputFormat::Tree => print!("{expr}"),
            OutputFormat::Json => json.queries.push(JsonQuery {
                query: query.as_str(),
                canonical: expr.canonical(),
                ast: expr,
            }),
        }
    }

    if format == OutputFormat::Json {
        return print_json(&json);
    }
    ExitCode::SUCCESS
}

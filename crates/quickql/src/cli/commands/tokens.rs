//! Implementation of `qql tokens`.

use std::process::ExitCode;

use quickql_query::{ParseError, tokenize};

use crate::cli::{
    args::TokensCommand,
    context::CommandContext,
    output::{print_json, report_parse_error, token_table},
};

/// Tokenizes a single query and prints the token stream.
pub fn run(ctx: &CommandContext, cmd: &TokensCommand) -> ExitCode {
    let filename = ctx.filename(cmd.filename.as_deref());
    let tokens = match tokenize(&cmd.query, filename) {
        Ok(tokens) => tokens,
        Err(e) => {
            report_parse_error(ctx.style(), &cmd.query, &ParseError::from(e));
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&tokens);
    }

    println!("{}", token_table(&tokens));
    ExitCode::SUCCESS
}

//! Command-line interface for quickql filter expressions.

mod cli;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{CommandContext, args::Cli, commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = match CommandContext::load() {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx)
}

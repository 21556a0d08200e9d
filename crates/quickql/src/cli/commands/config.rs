//! Implementation of `qql config`.

use std::process::ExitCode;

use quickql_config::is_global_config;

use crate::cli::context::CommandContext;

/// Shows the discovered config files and the effective settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let style = ctx.style();
    let config = &ctx.config;

    println!("{}", style.header("Files:"));
    if config.files.is_empty() {
        println!("  {}", style.dim("No configuration files found."));
    } else {
        for path in &config.files {
            if is_global_config(path) {
                println!("  {} {}", path.display(), style.dim("(global)"));
            } else {
                println!("  {}", path.display());
            }
        }
    }
    println!();

    let toml = match config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("{}: {e}", style.error("error"));
            return ExitCode::FAILURE;
        }
    };
    println!("{}", style.header("Settings:"));
    print!("{toml}");
    ExitCode::SUCCESS
}

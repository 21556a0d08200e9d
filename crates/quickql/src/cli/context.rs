//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use quickql_config::Config;
use quickql_query::QueryParser;

use crate::cli::output::Style;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the configuration that applies to the current directory.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { config })
    }

    /// Returns the output style selected by the configuration.
    pub fn style(&self) -> Style {
        Style::new(self.config.output.color)
    }

    /// Builds a parser labelled with `filename`, falling back to `parse.filename`.
    pub fn parser(&self, filename: Option<&str>) -> QueryParser {
        match self.filename(filename) {
            Some(name) => QueryParser::new().with_filename(name),
            None => QueryParser::new(),
        }
    }

    /// Resolves the error-location label: the flag wins over the config.
    pub fn filename<'a>(&'a self, flag: Option<&'a str>) -> Option<&'a str> {
        flag.or(self.config.parse.filename.as_deref())
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}

//! Configuration system for the `qql` command-line tool.
//!
//! qql uses TOML configuration files named `.quickql.toml`. Configuration is
//! resolved by walking up the directory tree from the current working
//! directory, collecting any `.quickql.toml` files found, then loading
//! `~/.quickql.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawOutputSettings, RawParseSettings, parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};

/// Fully merged configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Output settings.
    pub output: OutputSettings,
    /// Parse settings.
    pub parse: ParseSettings,
    /// Files the configuration was loaded from, highest precedence first.
    pub files: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Serializes the effective settings in `.quickql.toml` format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            output: self.output.clone(),
            parse: self.parse.clone(),
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// How `qql parse` renders a parsed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Canonical S-expression.
    #[default]
    Canonical,
    /// Indented node tree.
    Tree,
    /// JSON serialization of the AST.
    Json,
}

impl OutputFormat {
    /// Every format, for help text and error messages.
    pub const ALL: [Self; 3] = [Self::Canonical, Self::Tree, Self::Json];

    /// Returns the name used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::Tree => "tree",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown output format '{s}' (expected canonical, tree or json)"))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[output]` settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Rendering used by `qql parse`.
    pub format: OutputFormat,
    /// Whether to use ANSI colors.
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Canonical,
            color: true,
        }
    }
}

/// `[parse]` settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ParseSettings {
    /// Label echoed in error locations.
    pub filename: Option<String>,
    /// Print the parser trace when a query fails to parse.
    pub trace_on_error: bool,
}

/// Effective settings as written back out by `qql config`.
#[derive(Serialize)]
struct SerializableSettings {
    /// `[output]` section.
    output: OutputSettings,
    /// `[parse]` section.
    parse: ParseSettings,
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn format_names() {
        assert_eq!("tree".parse::<OutputFormat>(), Ok(OutputFormat::Tree));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
        for format in OutputFormat::ALL {
            assert_eq!(format.to_string().parse::<OutputFormat>(), Ok(format));
        }
    }

    #[test]
    fn load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[parse]\nfilename = \"box\"\ntrace_on_error = true\n").unwrap();

        let config = Config::load_from_files(&[path.clone()]).unwrap();
        assert_eq!(config.parse.filename.as_deref(), Some("box"));
        assert!(config.parse.trace_on_error);
        assert_eq!(config.files, vec![path]);
    }

    #[test]
    fn load_with_no_files() {
        let config = Config::load_from_files(&[]).unwrap();
        assert_eq!(config.output.format, OutputFormat::Canonical);
    }

    #[test]
    fn settings_to_toml_round_trips() {
        let mut config = Config::default();
        config.output.format = OutputFormat::Tree;
        config.parse.filename = Some("q".into());

        let toml = config.settings_to_toml().unwrap();
        assert!(toml.contains("[output]"));
        assert!(toml.contains("[parse]"));
        assert!(toml.contains("format = \"tree\""));
        assert!(toml.contains("filename = \"q\""));

        let raw = parse_config_str(&toml, Path::new("roundtrip.toml")).unwrap();
        assert_eq!(raw.output.unwrap().format.as_deref(), Some("tree"));
    }

    #[test]
    fn default_settings_omit_filename() {
        let toml = Config::default().settings_to_toml().unwrap();
        assert!(toml.contains("format = \"canonical\""));
        assert!(toml.contains("color = true"));
        assert!(!toml.contains("filename"));
    }
}

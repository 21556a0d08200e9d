//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`.

use std::path::PathBuf;

use crate::{
    Config, ConfigError, OutputFormat, OutputSettings, ParseSettings,
    parse::{RawConfig, RawOutputSettings, RawParseSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges configuration files into a single resolved `Config`.
///
/// Configs must be in precedence order: highest precedence first (closest to
/// the working directory), global config last. For every key the first file
/// that defines it wins.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let mut output = OutputSettings::default();
    let mut parse = ParseSettings::default();

    // Lowest precedence first so closer files overwrite
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.output {
            apply_raw_output(&mut output, raw, parsed)?;
        }
        if let Some(ref raw) = parsed.config.parse {
            apply_raw_parse(&mut parse, raw);
        }
    }

    Ok(Config {
        output,
        parse,
        files: configs.iter().map(|c| c.path.clone()).collect(),
    })
}

/// Applies raw output settings, validating the format name.
fn apply_raw_output(
    result: &mut OutputSettings,
    raw: &RawOutputSettings,
    parsed: &ParsedConfig,
) -> Result<(), ConfigError> {
    if let Some(ref name) = raw.format {
        result.format = name
            .parse::<OutputFormat>()
            .map_err(|message| ConfigError::InvalidValue {
                path: parsed.path.clone(),
                key: "output.format".into(),
                message,
            })?;
    }
    if let Some(v) = raw.color {
        result.color = v;
    }
    Ok(())
}

/// Applies raw parse settings.
fn apply_raw_parse(result: &mut ParseSettings, raw: &RawParseSettings) {
    if let Some(ref v) = raw.filename {
        result.filename = Some(v.clone());
    }
    if let Some(v) = raw.trace_on_error {
        result.trace_on_error = v;
    }
}

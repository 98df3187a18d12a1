//! Configuration system for qs.
//!
//! qs reads TOML files named `.qs.toml`. Configuration is resolved by walking up the directory
//! tree from the current working directory, collecting any `.qs.toml` files found, then loading
//! `~/.qs.toml` as the global config with lowest precedence. A file with `root = true` ends the
//! walk and suppresses the global file.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawLogSettings, RawOutputSettings, RawParserSettings, parse_config_file,
    parse_config_str,
};
use qs_query::{DEFAULT_MAX_DEPTH, ParseOptions};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::{ConfigWarning, LOG_LEVELS, OUTPUT_FORMATS};
use validate::validate_config;

/// Fully merged configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parser settings.
    pub parser: ParserSettings,
    /// Output settings.
    pub output: OutputSettings,
    /// Logging settings.
    pub log: LogSettings,
    /// Config files that contributed, highest precedence first.
    pub files: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.qs.toml` files.
    ///
    /// Returns the defaults if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from an explicit list of files, highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Parser options derived from the `[parser]` section.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::default().with_max_depth(self.parser.max_depth)
    }

    /// Serializes the effective settings in `.qs.toml` form.
    ///
    /// `root` and the source file list are omitted; they describe where the
    /// settings came from rather than the settings themselves.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            parser: &self.parser,
            output: &self.output,
            log: &self.log,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// `[parser]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Maximum nesting of groups and `NOT`s.
    pub max_depth: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// `[output]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Default rendering for `qs parse`: `tree`, `json` or `query`.
    pub format: String,
    /// Whether to emit ANSI colors.
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: String::from("tree"),
            color: true,
        }
    }
}

/// `[log]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter level used when neither `QS_LOG` nor `-v` is given.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: String::from("warn"),
        }
    }
}

/// Borrowed view of the settings sections for TOML output.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Parser settings.
    parser: &'a ParserSettings,
    /// Output settings.
    output: &'a OutputSettings,
    /// Logging settings.
    log: &'a LogSettings,
}

//! Configuration merging.
//!
//! Layers parsed `RawConfig` files into a single `Config`. Files arrive highest
//! precedence first; for each setting the first file that defines it wins.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::{
    Config, LogSettings, OutputSettings, ParserSettings,
    parse::{RawConfig, RawLogSettings, RawOutputSettings, RawParserSettings},
};

/// A parsed config file with its source path.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges configuration files into a single `Config`.
///
/// Files must be ordered highest precedence first. An empty slice yields the
/// defaults.
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut merged = Config::default();

    // Lowest precedence first, so closer files overwrite.
    for parsed in configs.iter().rev() {
        trace!(path = %parsed.path.display(), "merging config file");
        apply_raw_config(&mut merged, &parsed.config);
    }

    merged.files = configs.iter().map(|c| c.path.clone()).collect();

    debug!(files = merged.files.len(), "merged configuration");
    merged
}

/// Applies every section present in one raw file.
fn apply_raw_config(result: &mut Config, raw: &RawConfig) {
    if let Some(ref parser) = raw.parser {
        apply_parser(&mut result.parser, parser);
    }
    if let Some(ref output) = raw.output {
        apply_output(&mut result.output, output);
    }
    if let Some(ref log) = raw.log {
        apply_log(&mut result.log, log);
    }
}

/// Applies the `[parser]` section.
fn apply_parser(result: &mut ParserSettings, raw: &RawParserSettings) {
    if let Some(v) = raw.max_depth {
        result.max_depth = v;
    }
}

/// Applies the `[output]` section.
fn apply_output(result: &mut OutputSettings, raw: &RawOutputSettings) {
    if let Some(ref v) = raw.format {
        result.format.clone_from(v);
    }
    if let Some(v) = raw.color {
        result.color = v;
    }
}

/// Applies the `[log]` section.
fn apply_log(result: &mut LogSettings, raw: &RawLogSettings) {
    if let Some(ref v) = raw.level {
        result.level.clone_from(v);
    }
}

//! Configuration validation.
//!
//! Reports settings that load fine but will not behave as the user expects.

use std::fmt;

use crate::Config;

/// Log levels accepted in `[log] level`.
pub const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Output formats accepted in `[output] format`.
pub const OUTPUT_FORMATS: &[&str] = &["tree", "json", "query"];

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `max_depth = 0` rejects every group and every `NOT`.
    ZeroMaxDepth,
    /// The log level is not one of [`LOG_LEVELS`].
    UnknownLogLevel {
        /// The configured value.
        level: String,
    },
    /// The output format is not one of [`OUTPUT_FORMATS`].
    UnknownOutputFormat {
        /// The configured value.
        format: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMaxDepth => {
                write!(f, "parser max_depth is 0, so groups and NOT are rejected")
            }
            Self::UnknownLogLevel { level } => write!(
                f,
                "unknown log level '{level}' (expected one of: {})",
                LOG_LEVELS.join(", ")
            ),
            Self::UnknownOutputFormat { format } => write!(
                f,
                "unknown output format '{format}' (expected one of: {})",
                OUTPUT_FORMATS.join(", ")
            ),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.parser.max_depth == 0 {
        warnings.push(ConfigWarning::ZeroMaxDepth);
    }

    let level = config.log.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        warnings.push(ConfigWarning::UnknownLogLevel {
            level: config.log.level.clone(),
        });
    }

    if !OUTPUT_FORMATS.contains(&config.output.format.as_str()) {
        warnings.push(ConfigWarning::UnknownOutputFormat {
            format: config.output.format.clone(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_clean() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn zero_depth_warns() {
        let mut config = Config::default();
        config.parser.max_depth = 0;
        assert_eq!(validate_config(&config), vec![ConfigWarning::ZeroMaxDepth]);
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = Config::default();
        config.log.level = "DEBUG".into();
        assert!(validate_config(&config).is_empty());

        config.log.level = "loud".into();
        let warnings = validate_config(&config);
        assert_eq!(
            warnings,
            vec![ConfigWarning::UnknownLogLevel {
                level: "loud".into()
            }]
        );
        assert!(warnings[0].to_string().contains("'loud'"));
    }

    #[test]
    fn unknown_format_warns() {
        let mut config = Config::default();
        config.output.format = "yaml".into();
        let warnings = validate_config(&config);
        assert_eq!(
            warnings,
            vec![ConfigWarning::UnknownOutputFormat {
                format: "yaml".into()
            }]
        );
        assert!(warnings[0].to_string().contains("tree, json, query"));
    }
}

//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::ValueEnum;
use qs_config::Config;
use qs_highlight::Palette;
use qs_query::ParseOptions;
use tracing::{debug, warn};

use super::args::{Format, ParserArgs};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
    /// Colors for terminal output.
    pub palette: Palette,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load(no_color: bool) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        let palette = Palette::new(config.output.color && !no_color);
        Ok(Self {
            cwd,
            config,
            palette,
        })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used by `init`, which must work even when an existing config file is
    /// invalid.
    pub fn load_cwd_only(no_color: bool) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = Config::default();
        let palette = Palette::new(config.output.color && !no_color);
        Ok(Self {
            cwd,
            config,
            palette,
        })
    }

    /// Logs every configuration warning.
    ///
    /// Called once logging is installed, since the log level itself comes from
    /// the configuration.
    pub fn log_config_warnings(&self) {
        for warning in self.config.validate() {
            warn!("{warning}");
        }
    }

    /// Parser options from config with command-line overrides applied.
    pub fn parse_options(&self, args: &ParserArgs) -> ParseOptions {
        let options = self.config.parse_options();
        match args.max_depth {
            Some(max_depth) => options.with_max_depth(max_depth),
            None => options,
        }
    }

    /// Output format from the flag, else config, else tree.
    pub fn format(&self, flag: Option<Format>) -> Format {
        if let Some(format) = flag {
            return format;
        }
        Format::from_str(&self.config.output.format, true).unwrap_or_else(|_| {
            debug!(format = %self.config.output.format, "unknown configured format, using tree");
            Format::Tree
        })
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

#[cfg(test)]
mod tests {
    use super::*;

    fn context(config: Config) -> CommandContext {
        CommandContext {
            cwd: PathBuf::from("/"),
            config,
            palette: Palette::new(false),
        }
    }

    #[test]
    fn flag_overrides_configured_depth() {
        let mut config = Config::default();
        config.parser.max_depth = 10;
        let ctx = context(config);

        assert_eq!(ctx.parse_options(&ParserArgs::default()).max_depth, 10);
        let args = ParserArgs { max_depth: Some(2) };
        assert_eq!(ctx.parse_options(&args).max_depth, 2);
    }

    #[test]
    fn format_precedence() {
        let mut config = Config::default();
        config.output.format = "json".into();
        let ctx = context(config);

        assert_eq!(ctx.format(None), Format::Json);
        assert_eq!(ctx.format(Some(Format::Query)), Format::Query);
    }

    #[test]
    fn unknown_configured_format_falls_back_to_tree() {
        let mut config = Config::default();
        config.output.format = "yaml".into();
        assert_eq!(context(config).format(None), Format::Tree);
    }
}

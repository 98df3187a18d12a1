//! Logging setup for the `qs` binary.
//!
//! Diagnostics go to stderr so stdout carries only command output.

use std::{env, io};

use qs_config::LOG_LEVELS;
use tracing::subscriber;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit filter directive.
pub const LOG_ENV: &str = "QS_LOG";

/// Fallback when the configured level is unknown.
const FALLBACK_LEVEL: &str = "warn";

/// Picks the filter directive: `QS_LOG`, else the `-v` count, else the
/// configured level.
fn select_directive(env_value: Option<&str>, verbose: u8, configured: &str) -> String {
    if let Some(directive) = env_value
        && EnvFilter::try_new(directive).is_ok()
    {
        return directive.to_string();
    }

    let configured = configured.to_ascii_lowercase();
    match verbose {
        0 if LOG_LEVELS.contains(&configured.as_str()) => configured,
        0 => FALLBACK_LEVEL.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Installs the global subscriber.
///
/// A second call is a no-op; the first subscriber stays installed.
pub fn init_logging(verbose: u8, configured: &str, ansi: bool) {
    let env_value = env::var(LOG_ENV).ok();
    let filter = EnvFilter::new(select_directive(env_value.as_deref(), verbose, configured));

    let fmt_subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .without_time()
        .finish();

    subscriber::set_global_default(fmt_subscriber).ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_by_default() {
        assert_eq!(select_directive(None, 0, "info"), "info");
        assert_eq!(select_directive(None, 0, "ERROR"), "error");
    }

    #[test]
    fn verbosity_overrides_config() {
        assert_eq!(select_directive(None, 1, "error"), "debug");
        assert_eq!(select_directive(None, 3, "error"), "trace");
    }

    #[test]
    fn env_overrides_everything() {
        let directive = select_directive(Some("qs_query=trace"), 2, "warn");
        assert_eq!(directive, "qs_query=trace");
    }

    #[test]
    fn invalid_levels_fall_back() {
        assert_eq!(select_directive(Some("qs=notalevel"), 0, "chatty"), "warn");
    }

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(0, "warn", false);
        init_logging(2, "trace", false);
    }
}

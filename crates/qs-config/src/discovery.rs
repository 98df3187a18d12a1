//! Configuration file discovery.
//!
//! Walks from a starting directory towards the filesystem root looking for
//! `.qs.toml` files, then falls back to the global `~/.qs.toml`.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".qs.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Paths come back in precedence order, closest to `cwd` first. The walk stops
/// at the first file that sets `root = true`; when no such file exists the
/// global config is appended last.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    let mut found_root = false;

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let is_root = is_root_config(&candidate);
        debug!(path = %candidate.display(), is_root, "found config file");
        configs.push(candidate);
        if is_root {
            found_root = true;
            break;
        }
    }

    if !found_root
        && let Some(global) = global_config_path()
        && global.is_file()
        && !configs.contains(&global)
    {
        debug!(path = %global.display(), "using global config file");
        configs.push(global);
    }

    configs
}

/// Returns the path to the global configuration file (`~/.qs.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

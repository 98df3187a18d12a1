//! Integration tests for qs-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> merge.

// Integration tests live outside cfg(test).
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use qs_config::{CONFIG_FILENAME, Config, ConfigError, ConfigWarning, is_global_config};

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes a `.qs.toml` inside `rel_dir` and returns its path.
    fn write_config(&self, rel_dir: &str, content: &str) -> PathBuf {
        let path = self.create_dir(rel_dir).join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }
}

/// Root config so the user's `~/.qs.toml` never leaks into a test.
const ISOLATED: &str = "root = true\n";

#[test]
fn test_load_no_config_returns_default() {
    let env = TestEnv::new();
    let config = Config::load(env.path()).unwrap();

    assert!(config.files.iter().all(|p| is_global_config(p)));
    if config.files.is_empty() {
        assert_eq!(config.parser.max_depth, 64);
        assert_eq!(config.output.format, "tree");
    }
}

#[test]
fn test_load_single_config() {
    let env = TestEnv::new();
    let path = env.write_config(
        "",
        r#"
root = true

[parser]
max_depth = 12

[output]
format = "json"
color = false

[log]
level = "debug"
"#,
    );

    let config = Config::load(env.path()).unwrap();

    assert_eq!(config.files, vec![path]);
    assert_eq!(config.parser.max_depth, 12);
    assert_eq!(config.output.format, "json");
    assert!(!config.output.color);
    assert_eq!(config.log.level, "debug");
    assert!(config.validate().is_empty());
}

#[test]
fn test_load_nested_configs_merging() {
    let env = TestEnv::new();
    env.write_config(
        "",
        &format!("{ISOLATED}[parser]\nmax_depth = 32\n[output]\nformat = \"query\"\n"),
    );
    let inner = env.write_config("project", "[parser]\nmax_depth = 4\n");
    let cwd = env.create_dir("project/src");

    let config = Config::load(&cwd).unwrap();

    assert_eq!(config.files.len(), 2);
    assert_eq!(config.files[0], inner);
    assert_eq!(config.parser.max_depth, 4);
    assert_eq!(config.output.format, "query");
    assert!(config.output.color);
}

#[test]
fn test_root_config_hides_parents() {
    let env = TestEnv::new();
    env.write_config("", "[parser]\nmax_depth = 2\n");
    env.write_config("project", ISOLATED);
    let cwd = env.create_dir("project/deep");

    let config = Config::load(&cwd).unwrap();

    assert_eq!(config.files.len(), 1);
    assert_eq!(config.parser.max_depth, 64);
}

#[test]
fn test_invalid_toml_reports_path() {
    let env = TestEnv::new();
    let path = env.write_config("", "root = true\n[parser\n");

    let err = Config::load(env.path()).unwrap_err();

    assert!(matches!(err, ConfigError::ParseToml { .. }));
    assert!(err.to_string().contains(&path.display().to_string()));
}

#[test]
fn test_unknown_section_is_error() {
    let env = TestEnv::new();
    env.write_config("", "root = true\n[index]\nstemmer = \"english\"\n");

    assert!(Config::load(env.path()).is_err());
}

#[test]
fn test_load_from_files_missing_file() {
    let env = TestEnv::new();
    let missing = env.path().join("missing.toml");

    let err = Config::load_from_files(&[missing]).unwrap_err();

    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn test_validation_warnings_from_files() {
    let env = TestEnv::new();
    env.write_config(
        "",
        "root = true\n[parser]\nmax_depth = 0\n[log]\nlevel = \"chatty\"\n",
    );

    let config = Config::load(env.path()).unwrap();
    let warnings = config.validate();

    assert!(warnings.contains(&ConfigWarning::ZeroMaxDepth));
    assert!(warnings.contains(&ConfigWarning::UnknownLogLevel {
        level: "chatty".into()
    }));
}

#[test]
fn test_parse_options_from_config() {
    let env = TestEnv::new();
    env.write_config("", "root = true\n[parser]\nmax_depth = 1\n");

    let config = Config::load(env.path()).unwrap();
    let options = config.parse_options();

    assert!(qs_query::parse_with("(a)", &options).is_ok());
    assert!(qs_query::parse_with("((a))", &options).is_err());
}

#[test]
fn test_effective_settings_round_trip() {
    let env = TestEnv::new();
    env.write_config("", "root = true\n[output]\ncolor = false\n");

    let config = Config::load(env.path()).unwrap();
    let toml = config.settings_to_toml().unwrap();

    let reloaded_path = env.write_config("again", &format!("{ISOLATED}{toml}"));
    let reloaded = Config::load_from_files(&[reloaded_path]).unwrap();

    assert_eq!(reloaded.parser, config.parser);
    assert_eq!(reloaded.output, config.output);
    assert_eq!(reloaded.log, config.log);
}

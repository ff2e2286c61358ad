// Settings for the provider test suite.
//
// Tests read these to decide how verbose the tracing output is and where the
// recorded response fixtures live. Values come from a YAML file or from the
// environment; anything left unset falls back to the `Default` impls.

use std::path::Path;
use thiserror::Error;

pub mod types;

// Re-export all configuration types
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found. Tried paths: {paths}")]
    FileNotFound { paths: String },

    #[error("Failed to read configuration file: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[from]
        source: serde_yaml::Error,
    },
}

/// Main configuration loading interface
impl TestSuiteConfig {
    /// Load configuration from YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: TestSuiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        // Try different config locations in order
        let config_paths = ["config/test.yaml", "test.yaml", "config/default.yaml"];

        for path in &config_paths {
            if Path::new(path).exists() {
                return Self::load_from_file(path);
            }
        }

        Err(ConfigError::FileNotFound {
            paths: config_paths.join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;

    /// Run `f` with the process working directory set to `dir`
    fn in_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        let result = f();
        std::env::set_current_dir(previous).unwrap();
        result
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.yaml");
        std::fs::write(
            &path,
            "logging:\n  level: debug\n  format: compact\n  modules:\n    providers: trace\nfixtures:\n  dir: fixtures/recorded\n",
        )
        .unwrap();

        let config = TestSuiteConfig::load_from_file(&path).unwrap();

        assert_eq!(config.logging.filter_directive(), "debug,providers=trace");
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.fixtures.dir, PathBuf::from("fixtures/recorded"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.yaml");
        std::fs::write(&path, "fixtures:\n  dir: elsewhere\n").unwrap();

        let config = TestSuiteConfig::load_from_file(&path).unwrap();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.filter_directive(), "info,providers=debug");
        assert_eq!(config.fixtures.dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.yaml");
        std::fs::write(&path, "logging: [unclosed").unwrap();

        let err = TestSuiteConfig::load_from_file(&path).unwrap_err();

        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = TestSuiteConfig::load_from_file("/nonexistent/test.yaml").unwrap_err();

        assert!(matches!(err, ConfigError::IoError { .. }));
    }

    #[test]
    #[serial]
    fn test_load_finds_config_in_default_location() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("config")).unwrap();
        std::fs::write(
            dir.path().join("config/test.yaml"),
            "logging:\n  level: warn\nfixtures:\n  dir: recorded\n",
        )
        .unwrap();

        let config = in_dir(dir.path(), TestSuiteConfig::load).unwrap();

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.fixtures.dir, PathBuf::from("recorded"));
    }

    #[test]
    #[serial]
    fn test_load_without_config_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = in_dir(dir.path(), TestSuiteConfig::load).unwrap_err();

        match err {
            ConfigError::FileNotFound { paths } => {
                assert_eq!(paths, "config/test.yaml, test.yaml, config/default.yaml")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

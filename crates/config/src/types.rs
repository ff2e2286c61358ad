use serde::Deserialize;
use std::{collections::HashMap, env, path::PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TestSuiteConfig {
    pub logging: LoggingConfig,
    pub fixtures: FixturesConfig,
}

impl TestSuiteConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            logging: LoggingConfig::from_env()?,
            fixtures: FixturesConfig::from_env()?,
        })
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "LOG_FORMAT must be one of pretty, compact, json (got {other})"
            )),
        }
    }
}

/// Logging Configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub modules: HashMap<String, String>,
}

impl LoggingConfig {
    /// Load from environment variables, on top of the `Default` levels
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        // Module-specific log levels
        if let Ok(level) = env::var("LOG_MODULE_PROVIDERS") {
            config.modules.insert("providers".to_string(), level);
        }
        if let Ok(level) = env::var("LOG_MODULE_CONFIG") {
            config.modules.insert("config".to_string(), level);
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            config.format = format.parse()?;
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.level = level;
        }

        Ok(config)
    }

    /// Filter directive for `tracing_subscriber::EnvFilter`, e.g. `info,providers=debug`
    pub fn filter_directive(&self) -> String {
        let mut modules: Vec<_> = self.modules.iter().collect();
        modules.sort();

        let mut filter = self.level.clone();
        for (module, level) in modules {
            filter.push_str(&format!(",{module}={level}"));
        }
        filter
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut modules = HashMap::new();
        modules.insert("providers".to_string(), "debug".to_string());

        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            modules,
        }
    }
}

/// Where recorded provider responses are stored
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
    pub dir: PathBuf,
}

impl FixturesConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, String> {
        let dir = env::var("FIXTURES_DIR").unwrap_or_else(|_| "tests/fixtures".to_string());
        if dir.trim().is_empty() {
            return Err("FIXTURES_DIR must not be empty".to_string());
        }
        Ok(Self {
            dir: PathBuf::from(dir),
        })
    }
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("tests/fixtures"),
        }
    }
}

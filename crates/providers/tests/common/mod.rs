use std::path::PathBuf;

use config::{FixturesConfig, LogFormat, LoggingConfig};

/// Install a test-writer tracing subscriber once per test binary
///
/// Reads an optional `.env` first, so `LOG_LEVEL`, `LOG_FORMAT` and `LOG_MODULE_*` can be set there.
pub fn init_tracing() {
    let _ = dotenvy::dotenv();
    let logging = LoggingConfig::from_env().unwrap_or_default();
    let filter = logging.filter_directive();

    let _ = match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .compact()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .pretty()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init(),
    };
}

/// Fixtures shipped with this crate's tests
pub fn fixtures_config() -> FixturesConfig {
    FixturesConfig {
        dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"),
    }
}

//! Response chains stored as JSON fixture files
//!
//! A fixture is a JSON array of [`ProviderResponse`] objects tagged by `type`,
//! kept at `<fixtures dir>/<name>.json`.

use std::path::{Path, PathBuf};

use config::FixturesConfig;
use thiserror::Error;

use crate::ProviderResponse;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Fixture not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read fixture {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse fixture: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

/// Location of the fixture called `name`
pub fn fixture_path(config: &FixturesConfig, name: &str) -> PathBuf {
    config.dir.join(format!("{name}.json"))
}

/// Load the response chain stored in the fixture called `name`
pub fn load_response_chain(
    config: &FixturesConfig,
    name: &str,
) -> Result<Vec<ProviderResponse>, FixtureError> {
    let path = fixture_path(config, name);
    let responses = read_response_chain(&path)?;
    tracing::debug!(
        fixture = %path.display(),
        responses = responses.len(),
        "Loaded response chain"
    );
    Ok(responses)
}

fn read_response_chain(path: &Path) -> Result<Vec<ProviderResponse>, FixtureError> {
    if !path.exists() {
        return Err(FixtureError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

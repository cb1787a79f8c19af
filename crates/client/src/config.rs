//! Client configuration

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Persistable client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the portal API
    pub base_url: Url,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Override for the session/data directory; platform default when None
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:8000").expect("static url"),
            timeout_secs: 30,
            data_dir: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ClientError::Configuration(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content).map_err(|e| {
            ClientError::Configuration(format!(
                "failed to write {}: {e}",
                path.as_ref().display()
            ))
        })
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

//! Endpoint and transport settings.
//!
//! The crate never reads files or the environment itself; the embedding
//! application hands over YAML text or builds a `SyncConfig` directly.

use std::time::Duration;

use serde::Deserialize;

use crate::error::SyncError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncConfig {
    /// Full upsert URL, e.g. `https://ws.example.com/res/upsert`.
    pub endpoint: String,

    /// Global request timeout. `None` leaves the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl SyncConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: None,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SyncError> {
        let config: SyncConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(SyncError::InvalidConfig("endpoint is empty".to_string()));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(SyncError::InvalidConfig(format!(
                "endpoint {endpoint} is not an http(s) URL"
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(SyncError::InvalidConfig("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

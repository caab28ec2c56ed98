//! Client configuration.
//!
//! Read from a JSON file when one is given; every field falls back to its
//! default, so `{}` is a valid config.

use anyhow::{Context, Result};
use recommender::BackendSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Recommendations returned when the caller doesn't ask for a count
pub const DEFAULT_MAX_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Dataset file with one `Title::v1,v2,...` line per movie
    pub dataset: PathBuf,
    pub default_max_count: usize,
    /// Chunk size and channel capacity for every backend
    pub backend: BackendSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/movies.txt"),
            default_max_count: DEFAULT_MAX_COUNT,
            backend: BackendSettings::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no backend can run with
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.default_max_count > 0, "default_max_count must be positive");
        anyhow::ensure!(self.backend.chunk_size > 0, "backend.chunk_size must be positive");
        anyhow::ensure!(
            self.backend.channel_capacity > 0,
            "backend.channel_capacity must be positive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = ClientConfig::from_json("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ClientConfig::from_json(
            r#"{"default_max_count": 3, "backend": {"channel_capacity": 8}}"#,
        )
        .unwrap();
        assert_eq!(config.default_max_count, 3);
        assert_eq!(config.backend.channel_capacity, 8);
        assert_eq!(config.backend.chunk_size, BackendSettings::default().chunk_size);
        assert_eq!(config.dataset, PathBuf::from("data/movies.txt"));
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(ClientConfig::from_json(r#"{"default_max_count": 0}"#).is_err());
        assert!(ClientConfig::from_json(r#"{"backend": {"chunk_size": 0}}"#).is_err());
        assert!(ClientConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}

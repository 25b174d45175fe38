//! JSON configuration loaded when a pipeline instance is created.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_queue_capacity() -> usize {
    64
}

fn default_station_fusion() -> bool {
    true
}

/// Pipeline configuration.
///
/// All fields have defaults so an empty JSON object (`{}`) is a valid
/// config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Capacity of the bounded input queue. A full queue rejects further
    /// frames with `QueueFull` rather than blocking the caller.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Hand the most recent station detection to the detector together with
    /// the next frame. When disabled, station inputs are accepted but
    /// ignored.
    #[serde(default = "default_station_fusion")]
    pub station_fusion: bool,
    /// Optional name for log lines when several pipelines run in one
    /// process.
    #[serde(default)]
    pub instance_name: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            station_fusion: default_station_fusion(),
            instance_name: None,
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.queue_capacity, 64);
        assert!(cfg.station_fusion);
        assert!(cfg.instance_name.is_none());
    }

    #[test]
    fn disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        let cfg = PipelineConfig {
            queue_capacity: 8,
            station_fusion: false,
            instance_name: Some("dock-cam".to_string()),
        };
        cfg.write_json(&path).unwrap();

        let loaded = PipelineConfig::load_json(&path).unwrap();
        assert_eq!(loaded.queue_capacity, 8);
        assert!(!loaded.station_fusion);
        assert_eq!(loaded.instance_name.as_deref(), Some("dock-cam"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PipelineConfig::load_json("/nonexistent/pipeline.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

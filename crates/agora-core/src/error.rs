//! Error types for the agora analysis engine.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for engine operations.
#[derive(Debug, Error)]
pub enum AgoraError {
    /// Configuration is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("Failed to read configuration {}: {source}", .path.display())]
    ConfigIo {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`EngineConfig`](crate::EngineConfig).
    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Council error passthrough.
    #[error("Council error: {0}")]
    Council(#[from] agora_council::CouncilError),

    /// Drift error passthrough.
    #[error("Drift error: {0}")]
    Drift(#[from] agora_drift::DriftError),

    /// Radar error passthrough.
    #[error("Radar error: {0}")]
    Radar(#[from] agora_radar::RadarError),

    /// Feed error passthrough.
    #[error("Feed error: {0}")]
    Feed(#[from] agora_feed::FeedError),
}

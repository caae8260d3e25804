use std::path::PathBuf;
use thiserror::Error;

/// Failure a player reports for a play request after the fact.
///
/// The controller never acts on these; they are logged and dropped.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlayError {
    /// The host refused to start playback (e.g. autoplay policy)
    #[error("play request not allowed: {0}")]
    NotAllowed(String),
}

/// Errors while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid fps {fps} in {path}: must be a positive number")]
    InvalidFps { path: PathBuf, fps: f64 },
}

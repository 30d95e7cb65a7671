//! Error types shared across GazeMap crates.

use std::path::PathBuf;

/// Top-level error type for GazeMap operations.
///
/// The accumulation engine itself never fails; these variants cover
/// session lifecycle misuse, configuration, and persistence.
#[derive(Debug, thiserror::Error)]
pub enum GazemapError {
    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Sample model error: {message}")]
    Model { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using GazemapError.
pub type GazemapResult<T> = Result<T, GazemapError>;

impl GazemapError {
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

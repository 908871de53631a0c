//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An explicitly requested config file does not exist.
    #[error("config file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// The config file could not be parsed.
    #[error("failed to parse config {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Logging could not be initialized.
    #[error("failed to initialize logging: {0}")]
    Logging(String),

    /// A capability was rejected or a check was denied.
    #[error(transparent)]
    Capability(#[from] moncap::Error),

    /// Output could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<moncap::ParseError> for Error {
    fn from(e: moncap::ParseError) -> Self {
        Self::Capability(e.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error types for template resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving a launcher template.
#[derive(Debug, Error)]
pub enum PreambleError {
    /// Custom launcher script not found.
    #[error("launcher script not found: {path}")]
    MissingFile { path: PathBuf },

    /// Custom launcher script could not be read.
    #[error("failed to read launcher script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for template operations.
pub type Result<T> = std::result::Result<T, PreambleError>;

impl PreambleError {
    /// Classify a read failure for `path`.
    pub fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingFile { path }
        } else {
            Self::Io { path, source }
        }
    }
}

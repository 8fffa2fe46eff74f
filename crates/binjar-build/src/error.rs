//! Error types for the build pipeline.

use std::fmt;
use std::path::PathBuf;

use binjar_preamble::PreambleError;
use binjar_zip::ZipError;
use thiserror::Error;

/// Errors that can occur while building a self-executing archive.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No entry point configured. Raised before any file is touched.
    #[error("no entry point configured, refusing to build")]
    MissingEntryPoint,

    /// Config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed.
    #[error("invalid config file {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// Template resolution failed.
    #[error(transparent)]
    Preamble(#[from] PreambleError),

    /// Prefixing or verification failed.
    #[error(transparent)]
    Archive(#[from] ZipError),

    /// Filesystem error while publishing or installing.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    /// Create an Io error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Coarse classification used for reporting and exit codes.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingEntryPoint | Self::ConfigRead { .. } | Self::InvalidConfig { .. } => {
                ErrorKind::Config
            }
            Self::Preamble(PreambleError::MissingFile { .. }) => ErrorKind::MissingFile,
            Self::Preamble(PreambleError::Io { .. }) | Self::Io { .. } => ErrorKind::Io,
            Self::Archive(err) => ErrorKind::from_zip(err),
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }
}

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    MissingFile,
    MalformedArchive,
    OffsetMismatch,
    Io,
}

impl ErrorKind {
    /// Classify an archive error.
    #[must_use]
    pub fn from_zip(err: &ZipError) -> Self {
        match err {
            ZipError::FileNotFound { .. } => Self::MissingFile,
            ZipError::MalformedArchive { .. } | ZipError::OffsetOverflow { .. } => {
                Self::MalformedArchive
            }
            ZipError::OffsetMismatch { .. } => Self::OffsetMismatch,
            ZipError::Io(_) => Self::Io,
        }
    }

    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Io => 1,
            Self::Config => 2,
            Self::MissingFile => 3,
            Self::MalformedArchive => 4,
            Self::OffsetMismatch => 5,
        }
    }

    /// Short label printed in front of the error message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Io => "I/O error",
            Self::Config => "configuration error",
            Self::MissingFile => "missing file",
            Self::MalformedArchive => "malformed archive",
            Self::OffsetMismatch => "offset mismatch",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

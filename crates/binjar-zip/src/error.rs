//! Error types for archive prefixing and verification.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Record whose recorded position was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLocation {
    /// Start of the central directory as recorded in the end records.
    CentralDirectory,
    /// Zip64 end of central directory record, as recorded in its locator.
    Zip64EndRecord,
    /// A central directory entry.
    Entry {
        /// Position of the entry in the central directory.
        index: usize,
        /// Entry name (lossy UTF-8).
        name: String,
    },
}

impl RecordLocation {
    /// Location for the entry at `index`.
    pub fn entry(index: usize, name: impl Into<String>) -> Self {
        Self::Entry {
            index,
            name: name.into(),
        }
    }

    /// Entry index, if this location names an entry.
    pub fn entry_index(&self) -> Option<usize> {
        match self {
            Self::Entry { index, .. } => Some(*index),
            Self::CentralDirectory | Self::Zip64EndRecord => None,
        }
    }
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CentralDirectory => write!(f, "central directory"),
            Self::Zip64EndRecord => write!(f, "zip64 end of central directory"),
            Self::Entry { index, name } => write!(f, "entry {index} ({name})"),
        }
    }
}

/// Errors that can occur when prefixing or verifying an archive.
#[derive(Debug, Error)]
pub enum ZipError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The index record is missing or the archive contradicts itself.
    #[error("malformed archive: {message}")]
    MalformedArchive { message: String },

    /// A recorded position does not resolve to the record it should.
    #[error("offset mismatch in {location} at position {position}: expected {expected}, found {found}")]
    OffsetMismatch {
        location: RecordLocation,
        position: u64,
        expected: String,
        found: String,
    },

    /// A shifted offset no longer fits its 32-bit field and has no zip64 companion.
    #[error("shifted offset for {location} does not fit in a 32-bit field")]
    OffsetOverflow { location: RecordLocation },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ZipError>;

impl ZipError {
    /// Create a MalformedArchive error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedArchive {
            message: message.into(),
        }
    }

    /// Create an OffsetMismatch error.
    pub fn mismatch(
        location: RecordLocation,
        position: u64,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::OffsetMismatch {
            location,
            position,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Reinterpret a positional mismatch as a malformed input archive.
    ///
    /// An input handed to the prefixer must already be self-consistent, so
    /// anything the verifier would call a mismatch is a bad input there.
    pub(crate) fn into_malformed(self) -> Self {
        if matches!(self, Self::OffsetMismatch { .. }) {
            Self::malformed(self.to_string())
        } else {
            self
        }
    }
}

//! Checking that an archive's recorded offsets match its byte layout.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::layout::ArchiveLayout;
use crate::prefix::read_archive;

/// Summary of a successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyReport {
    /// Number of central directory entries.
    pub entries: usize,
    /// Recorded start of the central directory.
    pub central_dir_offset: u64,
    pub central_dir_size: u64,
    /// Lowest referenced position. Equals the prefix length of a prefixed file.
    pub archive_start: u64,
    /// Whether zip64 end records are present.
    pub zip64: bool,
}

/// Read the archive the way a conforming reader does and cross-check it.
///
/// The end records are located from the tail and the recorded central
/// directory start must point at a central directory header. Every entry's
/// recorded local header offset must land on a local header for the same
/// name, and no entry may run past the central directory start.
///
/// Positional problems are reported as
/// [`ZipError::OffsetMismatch`](crate::ZipError::OffsetMismatch) naming the
/// record. A missing end record is
/// [`ZipError::MalformedArchive`](crate::ZipError::MalformedArchive).
pub fn verify(data: &[u8]) -> Result<VerifyReport> {
    let layout = ArchiveLayout::read(data)?;
    let report = VerifyReport {
        entries: layout.entries.len(),
        central_dir_offset: layout.trailer.central_dir_offset,
        central_dir_size: layout.trailer.central_dir_size,
        archive_start: layout.archive_start(),
        zip64: layout.trailer.zip64.is_some(),
    };
    debug!(?report, "verified archive");
    Ok(report)
}

/// Read `path` and [`verify`] it.
pub fn verify_file(path: &Path) -> Result<VerifyReport> {
    let data = read_archive(path)?;
    verify(&data)
}

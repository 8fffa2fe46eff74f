//! Prepending bytes to an archive and shifting its offsets.

use std::path::Path;

use tracing::debug;

use crate::error::{Result, ZipError};
use crate::layout::ArchiveLayout;

/// Prepend `preamble` to `archive` and shift every recorded offset by its
/// length.
///
/// Entry data and all non-offset header fields are copied unchanged. The input
/// must be a self-consistent archive; any inconsistency is reported as
/// [`ZipError::MalformedArchive`] and nothing is produced.
pub fn prefix(archive: &[u8], preamble: &[u8]) -> Result<Vec<u8>> {
    let layout = ArchiveLayout::parse(archive)?;
    let shift = preamble.len() as u64;

    let mut out = Vec::with_capacity(preamble.len() + archive.len());
    out.extend_from_slice(preamble);
    out.extend_from_slice(archive);
    layout.rewrite_offsets(&mut out[preamble.len()..], |offset| {
        offset.checked_add(shift)
    })?;

    debug!(
        entries = layout.entries.len(),
        shift,
        zip64 = layout.trailer.zip64.is_some(),
        "prefixed archive"
    );
    Ok(out)
}

/// Drop the first `len` bytes of a prefixed archive and shift every recorded
/// offset back.
///
/// Fails with [`ZipError::MalformedArchive`] when any offset points into the
/// bytes being dropped.
pub fn strip_prefix(prefixed: &[u8], len: usize) -> Result<Vec<u8>> {
    let layout = ArchiveLayout::parse(prefixed)?;
    let shift = len as u64;
    let start = layout.archive_start();
    if start < shift {
        return Err(ZipError::malformed(format!(
            "archive starts at position {start}, inside the {len}-byte prefix"
        )));
    }

    let mut out = prefixed.to_vec();
    layout.rewrite_offsets(&mut out, |offset| offset.checked_sub(shift))?;
    out.drain(..len);

    debug!(entries = layout.entries.len(), shift, "stripped prefix");
    Ok(out)
}

/// Read a whole archive file.
pub fn read_archive(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ZipError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ZipError::Io(err)
        }
    })
}

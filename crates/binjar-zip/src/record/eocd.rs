//! End of central directory record.
//!
//! # Structure
//!
//! | Offset | Length | Field                  |
//! |--------|--------|------------------------|
//! | 0      | 4      | signature `PK\x05\x06` |
//! | 4      | 2      | this disk number       |
//! | 6      | 2      | central directory disk |
//! | 8      | 2      | entries on this disk   |
//! | 10     | 2      | entries in total       |
//! | 12     | 4      | central directory size |
//! | 16     | 4      | central directory offset |
//! | 20     | 2      | comment length         |
//! | 22     | n      | comment                |

use super::{SENTINEL_U16, SENTINEL_U32, read_u16, read_u32};

/// End of central directory signature.
pub const EOCD_SIGNATURE: [u8; 4] = *b"PK\x05\x06";

/// Fixed length of the record, without comment.
pub const EOCD_LEN: usize = 22;

const MAX_COMMENT_LEN: usize = u16::MAX as usize;

/// Parsed end of central directory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub central_dir_disk: u16,
    pub entries_on_disk: u16,
    pub entries_total: u16,
    pub central_dir_size: u32,
    pub central_dir_offset: u32,
    pub comment_len: u16,
}

impl EndOfCentralDirectory {
    /// Position of `central_dir_offset` relative to the record start.
    pub const OFFSET_FIELD: usize = 16;

    /// Parse the record starting at `pos` (at the signature).
    pub fn parse(data: &[u8], pos: usize) -> Option<Self> {
        Some(Self {
            disk_number: read_u16(data, pos + 4)?,
            central_dir_disk: read_u16(data, pos + 6)?,
            entries_on_disk: read_u16(data, pos + 8)?,
            entries_total: read_u16(data, pos + 10)?,
            central_dir_size: read_u32(data, pos + 12)?,
            central_dir_offset: read_u32(data, pos + 16)?,
            comment_len: read_u16(data, pos + 20)?,
        })
    }

    /// True when any field defers to the zip64 record.
    pub fn defers_to_zip64(&self) -> bool {
        self.entries_total == SENTINEL_U16
            || self.entries_on_disk == SENTINEL_U16
            || self.central_dir_size == SENTINEL_U32
            || self.central_dir_offset == SENTINEL_U32
    }
}

/// Locate the end record by scanning backwards from the tail.
///
/// A candidate only counts when its comment ends exactly at the end of the
/// input, so signature bytes inside a comment are never picked up.
pub fn find_eocd(data: &[u8]) -> Option<usize> {
    let last = data.len().checked_sub(EOCD_LEN)?;
    let first = data.len().saturating_sub(EOCD_LEN + MAX_COMMENT_LEN);
    (first..=last).rev().find(|&pos| {
        data[pos..pos + 4] == EOCD_SIGNATURE
            && read_u16(data, pos + 20)
                .is_some_and(|comment| pos + EOCD_LEN + usize::from(comment) == data.len())
    })
}

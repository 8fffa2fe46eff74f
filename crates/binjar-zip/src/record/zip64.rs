//! Zip64 records: end of central directory record, its locator, and the
//! extended information extra field.

use super::{SENTINEL_U32, read_u16, read_u32, read_u64};

/// Zip64 end of central directory record signature.
pub const ZIP64_EOCD_SIGNATURE: [u8; 4] = *b"PK\x06\x06";

/// Zip64 end of central directory locator signature.
pub const ZIP64_LOCATOR_SIGNATURE: [u8; 4] = *b"PK\x06\x07";

/// Fixed length of the zip64 end record, without the extensible data sector.
pub const ZIP64_EOCD_LEN: usize = 56;

/// Length of the locator. It sits directly before the end record.
pub const ZIP64_LOCATOR_LEN: usize = 20;

/// Header id of the zip64 extended information extra field.
pub const ZIP64_EXTRA_ID: u16 = 0x0001;

/// Zip64 end of central directory locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zip64Locator {
    pub record_disk: u32,
    /// Absolute position of the zip64 end record.
    pub record_offset: u64,
    pub total_disks: u32,
}

impl Zip64Locator {
    /// Position of `record_offset` relative to the locator start.
    pub const OFFSET_FIELD: usize = 8;

    pub fn parse(data: &[u8], pos: usize) -> Option<Self> {
        Some(Self {
            record_disk: read_u32(data, pos + 4)?,
            record_offset: read_u64(data, pos + 8)?,
            total_disks: read_u32(data, pos + 16)?,
        })
    }
}

/// Zip64 end of central directory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zip64EndOfCentralDirectory {
    /// Size of the remaining record, excluding the leading 12 bytes.
    pub record_size: u64,
    pub disk_number: u32,
    pub central_dir_disk: u32,
    pub entries_on_disk: u64,
    pub entries_total: u64,
    pub central_dir_size: u64,
    pub central_dir_offset: u64,
}

impl Zip64EndOfCentralDirectory {
    /// Position of `central_dir_offset` relative to the record start.
    pub const OFFSET_FIELD: usize = 48;

    pub fn parse(data: &[u8], pos: usize) -> Option<Self> {
        Some(Self {
            record_size: read_u64(data, pos + 4)?,
            disk_number: read_u32(data, pos + 16)?,
            central_dir_disk: read_u32(data, pos + 20)?,
            entries_on_disk: read_u64(data, pos + 24)?,
            entries_total: read_u64(data, pos + 32)?,
            central_dir_size: read_u64(data, pos + 40)?,
            central_dir_offset: read_u64(data, pos + 48)?,
        })
    }

    /// Total bytes the record occupies, including signature and size field.
    pub fn total_len(&self) -> Option<u64> {
        self.record_size.checked_add(12)
    }
}

/// A 64-bit value found in the zip64 extra field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zip64Slot {
    /// Position of the value within the extra field bytes.
    pub position: usize,
    pub value: u64,
}

/// Values carried by a zip64 extended information extra field.
///
/// Fields appear in a fixed order (uncompressed size, compressed size, local
/// header offset) and each is present only when the matching 32-bit field of
/// the central header holds the sentinel. Some writers emit all three fields
/// regardless; a block long enough to hold all of them while the 32-bit
/// offset is not a sentinel is read that way, and the offset slot then shadows
/// the 32-bit field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Zip64Extra {
    pub uncompressed_size: Option<Zip64Slot>,
    pub compressed_size: Option<Zip64Slot>,
    pub local_header_offset: Option<Zip64Slot>,
}

impl Zip64Extra {
    /// Read the zip64 block from `extra` given the central header's 32-bit
    /// uncompressed size, compressed size and local header offset.
    ///
    /// Returns `None` when the extra field carries no zip64 block.
    pub fn parse(extra: &[u8], uncompressed: u32, compressed: u32, offset: u32) -> Option<Self> {
        let (start, len) = find_block(extra, ZIP64_EXTRA_ID)?;
        let slot = |index: usize| -> Option<Zip64Slot> {
            let rel = index * 8;
            if rel + 8 > len {
                return None;
            }
            Some(Zip64Slot {
                position: start + rel,
                value: read_u64(extra, start + rel)?,
            })
        };

        if offset != SENTINEL_U32 && len >= 24 {
            return Some(Self {
                uncompressed_size: slot(0),
                compressed_size: slot(1),
                local_header_offset: slot(2),
            });
        }

        let mut next = 0;
        let mut take = |present: bool| {
            if !present {
                return None;
            }
            let found = slot(next);
            next += 1;
            found
        };
        Some(Self {
            uncompressed_size: take(uncompressed == SENTINEL_U32),
            compressed_size: take(compressed == SENTINEL_U32),
            local_header_offset: take(offset == SENTINEL_U32),
        })
    }
}

/// Find the data of the extra block with header `id`.
///
/// Returns the start of the block data and its length, clamped to `extra`.
fn find_block(extra: &[u8], id: u16) -> Option<(usize, usize)> {
    let mut pos = 0;
    while pos + 4 <= extra.len() {
        let block_id = read_u16(extra, pos)?;
        let size = usize::from(read_u16(extra, pos + 2)?);
        let start = pos + 4;
        if block_id == id {
            return Some((start, size.min(extra.len() - start)));
        }
        pos = start + size;
    }
    None
}

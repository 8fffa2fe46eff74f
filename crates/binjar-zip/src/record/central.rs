//! Central directory file header.

use std::ops::Range;

use super::{read_u16, read_u32};

/// Central directory file header signature.
pub const CENTRAL_HEADER_SIGNATURE: [u8; 4] = *b"PK\x01\x02";

/// Fixed length of a central directory header.
pub const CENTRAL_HEADER_LEN: usize = 46;

/// Parsed central directory header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralDirectoryHeader {
    pub flags: u16,
    pub compression_method: u16,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_len: u16,
    pub extra_len: u16,
    pub comment_len: u16,
    pub disk_number_start: u16,
    pub local_header_offset: u32,
}

impl CentralDirectoryHeader {
    /// Position of `local_header_offset` relative to the header start.
    pub const LOCAL_OFFSET_FIELD: usize = 42;

    pub fn parse(data: &[u8], pos: usize) -> Option<Self> {
        Some(Self {
            flags: read_u16(data, pos + 8)?,
            compression_method: read_u16(data, pos + 10)?,
            compressed_size: read_u32(data, pos + 20)?,
            uncompressed_size: read_u32(data, pos + 24)?,
            file_name_len: read_u16(data, pos + 28)?,
            extra_len: read_u16(data, pos + 30)?,
            comment_len: read_u16(data, pos + 32)?,
            disk_number_start: read_u16(data, pos + 34)?,
            local_header_offset: read_u32(data, pos + 42)?,
        })
    }

    /// Bytes occupied by the header including name, extra and comment.
    pub fn total_len(&self) -> usize {
        CENTRAL_HEADER_LEN
            + usize::from(self.file_name_len)
            + usize::from(self.extra_len)
            + usize::from(self.comment_len)
    }

    /// File name range for a header starting at `pos`.
    pub fn name_range(&self, pos: usize) -> Range<usize> {
        let start = pos + CENTRAL_HEADER_LEN;
        start..start + usize::from(self.file_name_len)
    }

    /// Extra field range for a header starting at `pos`.
    pub fn extra_range(&self, pos: usize) -> Range<usize> {
        let start = self.name_range(pos).end;
        start..start + usize::from(self.extra_len)
    }
}

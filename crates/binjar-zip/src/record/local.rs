//! Local file header. Only read, to confirm that recorded offsets land on
//! the entry they name.

use super::{read_u16, read_u32};

/// Local file header signature.
pub const LOCAL_HEADER_SIGNATURE: [u8; 4] = *b"PK\x03\x04";

/// Fixed length of a local file header.
pub const LOCAL_HEADER_LEN: usize = 30;

/// Parsed local file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFileHeader {
    pub flags: u16,
    pub compression_method: u16,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_len: u16,
    pub extra_len: u16,
}

impl LocalFileHeader {
    pub fn parse(data: &[u8], pos: usize) -> Option<Self> {
        Some(Self {
            flags: read_u16(data, pos + 6)?,
            compression_method: read_u16(data, pos + 8)?,
            compressed_size: read_u32(data, pos + 18)?,
            uncompressed_size: read_u32(data, pos + 22)?,
            file_name_len: read_u16(data, pos + 26)?,
            extra_len: read_u16(data, pos + 28)?,
        })
    }

    /// Bytes from the signature to the start of the entry data.
    pub fn header_len(&self) -> usize {
        LOCAL_HEADER_LEN + usize::from(self.file_name_len) + usize::from(self.extra_len)
    }

    /// Raw file name bytes for a header starting at `pos`.
    pub fn name<'a>(&self, data: &'a [u8], pos: usize) -> Option<&'a [u8]> {
        let start = pos + LOCAL_HEADER_LEN;
        data.get(start..start + usize::from(self.file_name_len))
    }
}

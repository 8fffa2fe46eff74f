//! Zip record parsing and field patching.
//!
//! This module handles the records that carry absolute offsets:
//! - End of central directory (the index record at the tail)
//! - Zip64 end of central directory record and its locator
//! - Central directory headers (one per entry)
//! - Local file headers (only read, never patched)
//!
//! All integers are little-endian. Readers return `None` when the requested
//! bytes run past the end of the input.

pub mod central;
pub mod eocd;
pub mod local;
pub mod zip64;

pub use central::{CENTRAL_HEADER_LEN, CENTRAL_HEADER_SIGNATURE, CentralDirectoryHeader};
pub use eocd::{EOCD_LEN, EOCD_SIGNATURE, EndOfCentralDirectory, find_eocd};
pub use local::{LOCAL_HEADER_LEN, LOCAL_HEADER_SIGNATURE, LocalFileHeader};
pub use zip64::{
    ZIP64_EOCD_LEN, ZIP64_EOCD_SIGNATURE, ZIP64_EXTRA_ID, ZIP64_LOCATOR_LEN,
    ZIP64_LOCATOR_SIGNATURE, Zip64EndOfCentralDirectory, Zip64Extra, Zip64Locator,
};

/// Value stored in a 32-bit field whose real value lives in a zip64 record.
pub const SENTINEL_U32: u32 = 0xFFFF_FFFF;

/// Value stored in a 16-bit field whose real value lives in a zip64 record.
pub const SENTINEL_U16: u16 = 0xFFFF;

/// Read `N` bytes at `pos`.
pub(crate) fn read_array<const N: usize>(data: &[u8], pos: usize) -> Option<[u8; N]> {
    let end = pos.checked_add(N)?;
    data.get(pos..end)?.try_into().ok()
}

pub(crate) fn read_u16(data: &[u8], pos: usize) -> Option<u16> {
    read_array::<2>(data, pos).map(u16::from_le_bytes)
}

pub(crate) fn read_u32(data: &[u8], pos: usize) -> Option<u32> {
    read_array::<4>(data, pos).map(u32::from_le_bytes)
}

pub(crate) fn read_u64(data: &[u8], pos: usize) -> Option<u64> {
    read_array::<8>(data, pos).map(u64::from_le_bytes)
}

/// Overwrite a 32-bit field. `pos` must come from a parsed record.
pub(crate) fn write_u32(data: &mut [u8], pos: usize, value: u32) {
    data[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
}

/// Overwrite a 64-bit field. `pos` must come from a parsed record.
pub(crate) fn write_u64(data: &mut [u8], pos: usize, value: u64) {
    data[pos..pos + 8].copy_from_slice(&value.to_le_bytes());
}

/// True when the four bytes at `pos` equal `signature`.
pub(crate) fn has_signature(data: &[u8], pos: usize, signature: [u8; 4]) -> bool {
    read_array::<4>(data, pos) == Some(signature)
}

/// Describe the four bytes at `pos` for error messages.
pub(crate) fn describe_signature_at(data: &[u8], pos: u64) -> String {
    usize::try_from(pos)
        .ok()
        .and_then(|pos| read_array::<4>(data, pos))
        .map_or_else(|| "end of input".to_string(), describe_signature)
}

pub(crate) fn describe_signature(bytes: [u8; 4]) -> String {
    format!("signature {bytes:02x?}")
}

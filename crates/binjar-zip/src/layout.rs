//! Archive layout: where every absolute offset lives and what it points at.
//!
//! Reading happens in three steps, each stricter than the last:
//!
//! 1. [`read_trailer`] finds the end records from the tail.
//! 2. [`read_entries`] walks the central directory the trailer points at.
//! 3. [`check_entries`] follows each entry to its local header.
//!
//! The prefixer and the verifier share these steps. The verifier reports the
//! positional errors as they are; the prefixer reads them as a malformed input.

use tracing::debug;

use crate::error::{RecordLocation, Result, ZipError};
use crate::record::{
    CENTRAL_HEADER_LEN, CENTRAL_HEADER_SIGNATURE, CentralDirectoryHeader, EndOfCentralDirectory,
    LOCAL_HEADER_SIGNATURE, LocalFileHeader, SENTINEL_U16, SENTINEL_U32, ZIP64_EOCD_LEN,
    ZIP64_EOCD_SIGNATURE, ZIP64_LOCATOR_LEN, ZIP64_LOCATOR_SIGNATURE, Zip64EndOfCentralDirectory,
    Zip64Extra, Zip64Locator, describe_signature_at, find_eocd, has_signature, write_u32,
    write_u64,
};

/// Width of an offset field on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    U32,
    U64,
}

/// One absolute offset stored in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetField {
    /// Position of the field itself.
    pub position: usize,
    pub width: FieldWidth,
    /// Value currently stored.
    pub value: u64,
    /// A 32-bit field whose real value may also live in a 64-bit field.
    pub has_companion: bool,
    pub location: RecordLocation,
}

/// Zip64 end records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zip64Trailer {
    pub locator_position: usize,
    pub locator: Zip64Locator,
    pub record_position: usize,
    pub record: Zip64EndOfCentralDirectory,
}

/// End records, with zip64 values already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    pub eocd_position: usize,
    pub eocd: EndOfCentralDirectory,
    pub zip64: Option<Zip64Trailer>,
    /// Recorded start of the central directory.
    pub central_dir_offset: u64,
    pub central_dir_size: u64,
    pub entry_count: u64,
}

impl Trailer {
    /// Position right after the central directory: the first end record.
    pub fn index_end(&self) -> usize {
        self.zip64
            .map_or(self.eocd_position, |zip64| zip64.record_position)
    }
}

/// One central directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLayout {
    pub index: usize,
    /// File name (lossy UTF-8).
    pub name: String,
    /// Position of the central directory header.
    pub central_position: usize,
    pub header: CentralDirectoryHeader,
    /// Local header offset, from the zip64 extra field when deferred.
    pub local_header_offset: u64,
    /// Compressed size, from the zip64 extra field when deferred.
    pub compressed_size: u64,
    /// Position and value of the zip64 local header offset, if present.
    pub zip64_offset: Option<(usize, u64)>,
}

impl EntryLayout {
    pub fn location(&self) -> RecordLocation {
        RecordLocation::entry(self.index, self.name.clone())
    }
}

/// Parsed archive layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    pub trailer: Trailer,
    pub entries: Vec<EntryLayout>,
}

impl ArchiveLayout {
    /// Parse and check an archive that is about to be rewritten.
    ///
    /// Every inconsistency is reported as [`ZipError::MalformedArchive`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::read(data).map_err(ZipError::into_malformed)
    }

    /// Parse and check, keeping positional errors as
    /// [`ZipError::OffsetMismatch`].
    pub fn read(data: &[u8]) -> Result<Self> {
        let trailer = read_trailer(data)?;
        let entries = read_entries(data, &trailer)?;
        check_entries(data, &trailer, &entries)?;
        Ok(Self { trailer, entries })
    }

    /// Lowest position referenced by any offset.
    ///
    /// For an archive with a prefix this is the prefix length.
    pub fn archive_start(&self) -> u64 {
        let mut start = self.trailer.central_dir_offset;
        if let Some(zip64) = &self.trailer.zip64 {
            start = start.min(zip64.locator.record_offset);
        }
        self.entries
            .iter()
            .map(|entry| entry.local_header_offset)
            .fold(start, u64::min)
    }

    /// Every absolute offset field, in file order.
    pub fn offset_fields(&self) -> Vec<OffsetField> {
        let mut fields = Vec::with_capacity(self.entries.len() * 2 + 3);
        for entry in &self.entries {
            fields.push(OffsetField {
                position: entry.central_position + CentralDirectoryHeader::LOCAL_OFFSET_FIELD,
                width: FieldWidth::U32,
                value: u64::from(entry.header.local_header_offset),
                has_companion: entry.zip64_offset.is_some(),
                location: entry.location(),
            });
            if let Some((position, value)) = entry.zip64_offset {
                fields.push(OffsetField {
                    position,
                    width: FieldWidth::U64,
                    value,
                    has_companion: false,
                    location: entry.location(),
                });
            }
        }

        let trailer = &self.trailer;
        if let Some(zip64) = &trailer.zip64 {
            fields.push(OffsetField {
                position: zip64.record_position + Zip64EndOfCentralDirectory::OFFSET_FIELD,
                width: FieldWidth::U64,
                value: zip64.record.central_dir_offset,
                has_companion: false,
                location: RecordLocation::CentralDirectory,
            });
            fields.push(OffsetField {
                position: zip64.locator_position + Zip64Locator::OFFSET_FIELD,
                width: FieldWidth::U64,
                value: zip64.locator.record_offset,
                has_companion: false,
                location: RecordLocation::Zip64EndRecord,
            });
        }
        fields.push(OffsetField {
            position: trailer.eocd_position + EndOfCentralDirectory::OFFSET_FIELD,
            width: FieldWidth::U32,
            value: u64::from(trailer.eocd.central_dir_offset),
            has_companion: trailer.zip64.is_some(),
            location: RecordLocation::CentralDirectory,
        });
        fields
    }

    /// Rewrite every offset field in `buf` with `shift` applied.
    ///
    /// `buf` must hold the parsed archive at the positions it was parsed at.
    /// 32-bit fields holding the sentinel are left alone. A 32-bit field whose
    /// shifted value no longer fits becomes the sentinel when a 64-bit
    /// companion carries the value, and is an error otherwise.
    pub fn rewrite_offsets(&self, buf: &mut [u8], shift: impl Fn(u64) -> Option<u64>) -> Result<()> {
        for field in self.offset_fields() {
            if field.width == FieldWidth::U32 && field.value == u64::from(SENTINEL_U32) {
                continue;
            }
            let shifted = shift(field.value).ok_or_else(|| {
                ZipError::malformed(format!(
                    "offset {} of {} cannot be shifted",
                    field.value, field.location
                ))
            })?;
            match field.width {
                FieldWidth::U64 => write_u64(buf, field.position, shifted),
                FieldWidth::U32 => match u32::try_from(shifted) {
                    Ok(value) if value != SENTINEL_U32 => write_u32(buf, field.position, value),
                    _ if field.has_companion => write_u32(buf, field.position, SENTINEL_U32),
                    _ => {
                        return Err(ZipError::OffsetOverflow {
                            location: field.location,
                        });
                    }
                },
            }
            debug!(
                location = %field.location,
                position = field.position,
                from = field.value,
                to = shifted,
                "shifted offset"
            );
        }
        Ok(())
    }
}

/// Locate and read the end records.
pub fn read_trailer(data: &[u8]) -> Result<Trailer> {
    let eocd_position = find_eocd(data)
        .ok_or_else(|| ZipError::malformed("end of central directory record not found"))?;
    let eocd = EndOfCentralDirectory::parse(data, eocd_position)
        .ok_or_else(|| ZipError::malformed("end of central directory record is truncated"))?;

    let single_disk = |disk: u16| disk == 0 || disk == SENTINEL_U16;
    if !single_disk(eocd.disk_number) || !single_disk(eocd.central_dir_disk) {
        return Err(ZipError::malformed("multi-disk archives are not supported"));
    }

    let zip64 = read_zip64(data, eocd_position)?;
    let Some(zip64) = zip64 else {
        if eocd.central_dir_offset == SENTINEL_U32 {
            return Err(ZipError::mismatch(
                RecordLocation::CentralDirectory,
                u64::from(SENTINEL_U32),
                "zip64 central directory offset",
                "no zip64 locator",
            ));
        }
        if eocd.defers_to_zip64() {
            return Err(ZipError::malformed(
                "end of central directory defers to a zip64 record but no locator is present",
            ));
        }
        return Ok(Trailer {
            eocd_position,
            eocd,
            zip64: None,
            central_dir_offset: u64::from(eocd.central_dir_offset),
            central_dir_size: u64::from(eocd.central_dir_size),
            entry_count: u64::from(eocd.entries_total),
        });
    };

    let record = zip64.record;
    if eocd.central_dir_offset != SENTINEL_U32
        && u64::from(eocd.central_dir_offset) != record.central_dir_offset
    {
        return Err(ZipError::mismatch(
            RecordLocation::CentralDirectory,
            u64::from(eocd.central_dir_offset),
            format!("zip64 central directory offset {}", record.central_dir_offset),
            format!("32-bit central directory offset {}", eocd.central_dir_offset),
        ));
    }

    Ok(Trailer {
        eocd_position,
        eocd,
        zip64: Some(zip64),
        central_dir_offset: record.central_dir_offset,
        central_dir_size: record.central_dir_size,
        entry_count: record.entries_total,
    })
}

fn read_zip64(data: &[u8], eocd_position: usize) -> Result<Option<Zip64Trailer>> {
    let Some(locator_position) = eocd_position.checked_sub(ZIP64_LOCATOR_LEN) else {
        return Ok(None);
    };
    if !has_signature(data, locator_position, ZIP64_LOCATOR_SIGNATURE) {
        return Ok(None);
    }
    let locator = Zip64Locator::parse(data, locator_position)
        .ok_or_else(|| ZipError::malformed("zip64 locator is truncated"))?;
    if locator.record_disk != 0 || locator.total_disks > 1 {
        return Err(ZipError::malformed("multi-disk archives are not supported"));
    }

    let recorded = locator.record_offset;
    let expected = format!("zip64 end record ending at position {locator_position}");
    let record = usize::try_from(recorded)
        .ok()
        .filter(|&pos| has_signature(data, pos, ZIP64_EOCD_SIGNATURE))
        .and_then(|pos| Some((pos, Zip64EndOfCentralDirectory::parse(data, pos)?)));
    let Some((record_position, record)) = record else {
        return Err(ZipError::mismatch(
            RecordLocation::Zip64EndRecord,
            recorded,
            expected,
            describe_signature_at(data, recorded),
        ));
    };

    let end = record
        .total_len()
        .filter(|&len| len >= ZIP64_EOCD_LEN as u64)
        .and_then(|len| recorded.checked_add(len));
    if end != Some(locator_position as u64) {
        return Err(ZipError::mismatch(
            RecordLocation::Zip64EndRecord,
            recorded,
            expected,
            format!("zip64 end record of {} bytes", record.record_size),
        ));
    }
    if record.disk_number != 0 || record.central_dir_disk != 0 {
        return Err(ZipError::malformed("multi-disk archives are not supported"));
    }

    Ok(Some(Zip64Trailer {
        locator_position,
        locator,
        record_position,
        record,
    }))
}

/// Walk the central directory the trailer points at.
pub fn read_entries(data: &[u8], trailer: &Trailer) -> Result<Vec<EntryLayout>> {
    let index_end = trailer.index_end();
    let actual_start = usize::try_from(trailer.central_dir_size)
        .ok()
        .and_then(|size| index_end.checked_sub(size))
        .ok_or_else(|| {
            ZipError::malformed(format!(
                "central directory size {} exceeds the space before the end records",
                trailer.central_dir_size
            ))
        })?;

    let recorded = trailer.central_dir_offset;
    if trailer.entry_count > 0 {
        let lands = usize::try_from(recorded)
            .is_ok_and(|pos| has_signature(data, pos, CENTRAL_HEADER_SIGNATURE));
        if !lands {
            return Err(ZipError::mismatch(
                RecordLocation::CentralDirectory,
                recorded,
                "central directory header signature",
                describe_signature_at(data, recorded),
            ));
        }
    }
    if recorded != actual_start as u64 {
        return Err(ZipError::mismatch(
            RecordLocation::CentralDirectory,
            recorded,
            format!("central directory starting at position {actual_start}"),
            format!("central directory recorded at position {recorded}"),
        ));
    }

    let count = usize::try_from(trailer.entry_count)
        .map_err(|_| ZipError::malformed("entry count does not fit in memory"))?;
    let mut entries = Vec::with_capacity(count.min((index_end - actual_start) / CENTRAL_HEADER_LEN));
    let mut cursor = actual_start;
    for index in 0..count {
        let header = has_signature(data, cursor, CENTRAL_HEADER_SIGNATURE)
            .then(|| CentralDirectoryHeader::parse(data, cursor))
            .flatten()
            .filter(|header| cursor + header.total_len() <= index_end)
            .ok_or_else(|| {
                ZipError::malformed(format!(
                    "central directory entry {index} at position {cursor} leaves the declared extent"
                ))
            })?;
        entries.push(resolve_entry(data, index, cursor, header)?);
        cursor += header.total_len();
    }
    if cursor != index_end {
        return Err(ZipError::malformed(format!(
            "central directory declares {count} entries in {} bytes but they end at position {cursor}, not {index_end}",
            trailer.central_dir_size
        )));
    }
    Ok(entries)
}

fn resolve_entry(
    data: &[u8],
    index: usize,
    position: usize,
    header: CentralDirectoryHeader,
) -> Result<EntryLayout> {
    let name = String::from_utf8_lossy(&data[header.name_range(position)]).into_owned();
    let extra_range = header.extra_range(position);
    let extra = Zip64Extra::parse(
        &data[extra_range.clone()],
        header.uncompressed_size,
        header.compressed_size,
        header.local_header_offset,
    )
    .unwrap_or_default();
    let location = || RecordLocation::entry(index, name.clone());

    let zip64_offset = extra
        .local_header_offset
        .map(|slot| (extra_range.start + slot.position, slot.value));
    let local_header_offset = match (header.local_header_offset, zip64_offset) {
        (SENTINEL_U32, Some((_, value))) => value,
        (SENTINEL_U32, None) => {
            return Err(ZipError::mismatch(
                location(),
                u64::from(SENTINEL_U32),
                "zip64 local header offset",
                "no zip64 extra field",
            ));
        }
        (offset, Some((_, value))) if u64::from(offset) != value => {
            return Err(ZipError::mismatch(
                location(),
                u64::from(offset),
                format!("zip64 local header offset {value}"),
                format!("32-bit local header offset {offset}"),
            ));
        }
        (offset, _) => u64::from(offset),
    };

    let compressed_size = match (header.compressed_size, extra.compressed_size) {
        (SENTINEL_U32, Some(slot)) => slot.value,
        (SENTINEL_U32, None) => {
            return Err(ZipError::malformed(format!(
                "{} defers its compressed size to a missing zip64 field",
                location()
            )));
        }
        (size, _) => u64::from(size),
    };

    Ok(EntryLayout {
        index,
        name,
        central_position: position,
        header,
        local_header_offset,
        compressed_size,
        zip64_offset,
    })
}

/// Follow every entry to its local header.
///
/// Each recorded offset must land on a local header for the same name, and
/// the entry data must end at or before the start of the central directory.
pub fn check_entries(data: &[u8], trailer: &Trailer, entries: &[EntryLayout]) -> Result<()> {
    let index_start = trailer.central_dir_offset;
    for entry in entries {
        let offset = entry.local_header_offset;
        let local = usize::try_from(offset).ok().and_then(|pos| {
            has_signature(data, pos, LOCAL_HEADER_SIGNATURE)
                .then(|| LocalFileHeader::parse(data, pos).map(|header| (pos, header)))
                .flatten()
        });
        let Some((pos, local)) = local else {
            return Err(ZipError::mismatch(
                entry.location(),
                offset,
                "local file header signature",
                describe_signature_at(data, offset),
            ));
        };

        let central_name = &data[entry.header.name_range(entry.central_position)];
        let local_name = local.name(data, pos);
        if local_name != Some(central_name) {
            return Err(ZipError::mismatch(
                entry.location(),
                offset,
                format!("local file header for {}", entry.name),
                format!(
                    "local file header for {}",
                    local_name.map_or_else(
                        || "a truncated name".to_string(),
                        |name| String::from_utf8_lossy(name).into_owned()
                    )
                ),
            ));
        }

        let end = offset
            .checked_add(local.header_len() as u64)
            .and_then(|end| end.checked_add(entry.compressed_size));
        if end.is_none_or(|end| end > index_start) {
            return Err(ZipError::mismatch(
                entry.location(),
                offset,
                format!("entry data ending at or before position {index_start}"),
                end.map_or_else(
                    || "entry data past the addressable range".to_string(),
                    |end| format!("entry data ending at position {end}"),
                ),
            ));
        }
    }
    Ok(())
}

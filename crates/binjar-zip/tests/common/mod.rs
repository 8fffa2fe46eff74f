//! Deterministic zip builder for offset tests.
//!
//! Entries are stored uncompressed with fixed timestamps and a zero CRC, so
//! every byte position is known up front.

#![allow(dead_code)]

/// How the builder uses zip64 structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zip64Mode {
    /// Plain 32-bit archive.
    None,
    /// Every 32-bit offset holds the sentinel and the real values live in
    /// zip64 extra fields and zip64 end records.
    Sentinels,
    /// 32-bit offsets hold real values and each entry also carries a full
    /// zip64 extra field whose offset differs from the 32-bit one by `skew`.
    AllFields { skew: u64 },
}

/// A built archive with the positions the tests care about.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub bytes: Vec<u8>,
    pub local_offsets: Vec<u64>,
    pub central_positions: Vec<usize>,
    /// Position of each entry's 64-bit local header offset, if any.
    pub zip64_offset_positions: Vec<Option<usize>>,
    pub central_dir_offset: u64,
    pub eocd_position: usize,
}

fn u16le(v: u16) -> [u8; 2] {
    v.to_le_bytes()
}

fn u32le(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}

fn u64le(v: u64) -> [u8; 8] {
    v.to_le_bytes()
}

pub fn build_zip(entries: &[(&str, Vec<u8>)], mode: Zip64Mode) -> Fixture {
    let mut out = Vec::new();
    let mut cd = Vec::new();
    let mut local_offsets = Vec::with_capacity(entries.len());
    let mut cd_relative = Vec::with_capacity(entries.len());
    let mut zip64_relative = Vec::with_capacity(entries.len());

    for (name, data) in entries {
        let name = name.as_bytes();
        let local_off = out.len() as u64;
        local_offsets.push(local_off);

        out.extend_from_slice(b"PK\x03\x04");
        out.extend_from_slice(&u16le(20));
        out.extend_from_slice(&u16le(0));
        out.extend_from_slice(&u16le(0));
        out.extend_from_slice(&u16le(0));
        out.extend_from_slice(&u16le(0x21));
        out.extend_from_slice(&u32le(0));
        out.extend_from_slice(&u32le(data.len() as u32));
        out.extend_from_slice(&u32le(data.len() as u32));
        out.extend_from_slice(&u16le(name.len() as u16));
        out.extend_from_slice(&u16le(0));
        out.extend_from_slice(name);
        out.extend_from_slice(data);

        let (offset32, extra): (u32, Vec<u64>) = match mode {
            Zip64Mode::None => (local_off as u32, Vec::new()),
            Zip64Mode::Sentinels => (u32::MAX, vec![local_off]),
            Zip64Mode::AllFields { skew } => (
                local_off as u32,
                vec![data.len() as u64, data.len() as u64, local_off + skew],
            ),
        };
        let extra_len = if extra.is_empty() { 0 } else { 4 + extra.len() * 8 };

        cd_relative.push(cd.len());
        cd.extend_from_slice(b"PK\x01\x02");
        cd.extend_from_slice(&u16le(45));
        cd.extend_from_slice(&u16le(45));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u16le(0x21));
        cd.extend_from_slice(&u32le(0));
        cd.extend_from_slice(&u32le(data.len() as u32));
        cd.extend_from_slice(&u32le(data.len() as u32));
        cd.extend_from_slice(&u16le(name.len() as u16));
        cd.extend_from_slice(&u16le(extra_len as u16));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u32le(0));
        cd.extend_from_slice(&u32le(offset32));
        cd.extend_from_slice(name);
        if extra.is_empty() {
            zip64_relative.push(None);
        } else {
            cd.extend_from_slice(&u16le(0x0001));
            cd.extend_from_slice(&u16le((extra.len() * 8) as u16));
            let slot = cd.len() + (extra.len() - 1) * 8;
            zip64_relative.push(Some(slot));
            for value in extra {
                cd.extend_from_slice(&u64le(value));
            }
        }
    }

    let cd_start = out.len();
    out.extend_from_slice(&cd);
    let cd_size = cd.len() as u64;
    let count = entries.len() as u64;

    let zip64_trailer = mode == Zip64Mode::Sentinels;
    if zip64_trailer {
        let record_pos = out.len() as u64;
        out.extend_from_slice(b"PK\x06\x06");
        out.extend_from_slice(&u64le(44));
        out.extend_from_slice(&u16le(45));
        out.extend_from_slice(&u16le(45));
        out.extend_from_slice(&u32le(0));
        out.extend_from_slice(&u32le(0));
        out.extend_from_slice(&u64le(count));
        out.extend_from_slice(&u64le(count));
        out.extend_from_slice(&u64le(cd_size));
        out.extend_from_slice(&u64le(cd_start as u64));

        out.extend_from_slice(b"PK\x06\x07");
        out.extend_from_slice(&u32le(0));
        out.extend_from_slice(&u64le(record_pos));
        out.extend_from_slice(&u32le(1));
    }

    let eocd_position = out.len();
    out.extend_from_slice(b"PK\x05\x06");
    out.extend_from_slice(&u16le(0));
    out.extend_from_slice(&u16le(0));
    if zip64_trailer {
        out.extend_from_slice(&u16le(u16::MAX));
        out.extend_from_slice(&u16le(u16::MAX));
        out.extend_from_slice(&u32le(u32::MAX));
        out.extend_from_slice(&u32le(u32::MAX));
    } else {
        out.extend_from_slice(&u16le(count as u16));
        out.extend_from_slice(&u16le(count as u16));
        out.extend_from_slice(&u32le(cd_size as u32));
        out.extend_from_slice(&u32le(cd_start as u32));
    }
    out.extend_from_slice(&u16le(0));

    Fixture {
        bytes: out,
        local_offsets,
        central_positions: cd_relative.iter().map(|rel| cd_start + rel).collect(),
        zip64_offset_positions: zip64_relative
            .iter()
            .map(|rel| rel.map(|rel| cd_start + rel))
            .collect(),
        central_dir_offset: cd_start as u64,
        eocd_position,
    }
}

/// Three stored entries whose central directory starts at byte 1000.
pub fn three_entries(mode: Zip64Mode) -> Fixture {
    build_zip(
        &[
            ("a.txt", vec![b'a'; 300]),
            ("b.txt", vec![b'b'; 300]),
            ("c.txt", vec![b'c'; 295]),
        ],
        mode,
    )
}

pub fn read_u32(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes(data[pos..pos + 4].try_into().unwrap())
}

pub fn read_u64(data: &[u8], pos: usize) -> u64 {
    u64::from_le_bytes(data[pos..pos + 8].try_into().unwrap())
}

/// An 87-byte launcher preamble.
pub fn preamble_87() -> Vec<u8> {
    let mut text = b":;exec java -jar \"$0\" \"$@\"\n@echo off\r\njava -jar \"%~f0\" %*\r\ngoto :eof\r\n".to_vec();
    text.resize(87, b'#');
    text
}

//! Zip offset repair for self-executing archives.
//!
//! A zip archive is read from its tail: the end of central directory record
//! says where the central directory starts, and each central directory header
//! says where its entry's local header starts. Any bytes placed in front of
//! the archive are invisible to a reader as long as those offsets are shifted
//! by the number of bytes added.
//!
//! # Features
//!
//! - Prepend arbitrary bytes and shift every absolute offset ([`prefix`])
//! - Undo a prefix ([`strip_prefix`])
//! - Cross-check recorded offsets against the byte layout ([`verify`])
//! - Zip64 end records and extra fields, including sentinel handling
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use binjar_zip::{prefix, read_archive, verify};
//!
//! let archive = read_archive(Path::new("app-standalone.jar")).unwrap();
//! let preamble = b":;exec java -jar \"$0\" \"$@\"\n";
//! let prefixed = prefix(&archive, preamble).unwrap();
//!
//! let report = verify(&prefixed).unwrap();
//! assert_eq!(report.archive_start, preamble.len() as u64);
//! ```

mod error;
pub mod layout;
mod prefix;
pub mod record;
mod verify;

pub use error::{RecordLocation, Result, ZipError};

pub use layout::{ArchiveLayout, EntryLayout, FieldWidth, OffsetField, Trailer, Zip64Trailer};

pub use prefix::{prefix, read_archive, strip_prefix};

pub use verify::{VerifyReport, verify, verify_file};

//! Offset-shift properties.
//!
//! - Every prefixed archive verifies, with its archive start at the prefix length
//! - Every new local header offset lands on a local header signature
//! - Stripping the prefix reproduces the input byte for byte

mod common;

use binjar_zip::{ArchiveLayout, prefix, strip_prefix, verify};
use common::{Zip64Mode, build_zip};
use proptest::prelude::*;

fn archive_strategy() -> impl Strategy<Value = (Vec<(String, Vec<u8>)>, Zip64Mode)> {
    let entries = prop::collection::vec(
        ("[a-z]{1,12}(/[a-z]{1,8})?", prop::collection::vec(any::<u8>(), 0..256)),
        0..8,
    );
    let mode = prop_oneof![
        Just(Zip64Mode::None),
        Just(Zip64Mode::Sentinels),
        Just(Zip64Mode::AllFields { skew: 0 }),
    ];
    (entries, mode)
}

fn build(entries: &[(String, Vec<u8>)], mode: Zip64Mode) -> Vec<u8> {
    let borrowed: Vec<(&str, Vec<u8>)> = entries
        .iter()
        .map(|(name, data)| (name.as_str(), data.clone()))
        .collect();
    build_zip(&borrowed, mode).bytes
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: a prefixed archive verifies and starts right after the prefix.
    #[test]
    fn prop_prefix_verifies(
        (entries, mode) in archive_strategy(),
        preamble in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let archive = build(&entries, mode);
        let out = prefix(&archive, &preamble).unwrap();

        let report = verify(&out).unwrap();
        prop_assert_eq!(report.entries, entries.len());
        prop_assert_eq!(report.archive_start, preamble.len() as u64);

        let layout = ArchiveLayout::read(&out).unwrap();
        for entry in &layout.entries {
            let pos = entry.local_header_offset as usize;
            prop_assert_eq!(&out[pos..pos + 4], b"PK\x03\x04");
        }
    }

    /// Property: stripping the prefix restores the original archive.
    #[test]
    fn prop_strip_prefix_is_inverse(
        (entries, mode) in archive_strategy(),
        preamble in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let archive = build(&entries, mode);
        let out = prefix(&archive, &preamble).unwrap();
        let stripped = strip_prefix(&out, preamble.len()).unwrap();
        prop_assert_eq!(stripped, archive);
    }
}

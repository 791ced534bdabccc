// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for scanner batch and row body decoding

#![no_main]

use hbase_rest_codec::{CellSet, Row};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary gateway bodies must decode or fail cleanly
    if let Ok(set) = CellSet::from_slice(data) {
        for wire in &set.rows {
            if let Ok(row) = Row::from_wire(wire, true) {
                // Anything that decoded must re-encode to the same row
                let again = Row::from_wire(&row.to_wire(), true);
                assert_eq!(again.ok(), Some(row));
            }
        }
    }
});

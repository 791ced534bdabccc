// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Cross-batch row stitching.
//!
//! The gateway pages scanner results by cell count, so a wide row can be split
//! over several fetches. [`RowStitcher`] holds back the last row of every batch
//! until the next batch shows whether it continues.
//!
//! Invariants:
//! - at most one row is pending at any time;
//! - a row is released only once a different key (or end of stream) is seen;
//! - every fragment of a key is released exactly once, merged into one row.

use hbase_rest_codec::Row;

/// One-slot lookahead buffer that reassembles rows split across batches.
#[derive(Debug, Default)]
pub struct RowStitcher {
    pending: Option<Row>,
}

impl RowStitcher {
    /// An empty stitcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one batch in key order and return the rows now known complete.
    ///
    /// The batch's last row is retained as pending. An empty batch changes
    /// nothing.
    pub fn push_batch(&mut self, batch: Vec<Row>) -> Vec<Row> {
        let mut complete = Vec::with_capacity(batch.len());
        let last = batch.len().saturating_sub(1);

        for (index, mut row) in batch.into_iter().enumerate() {
            if let Some(pending) = self.pending.take() {
                if pending.key == row.key {
                    row.absorb(pending);
                } else {
                    complete.push(pending);
                }
            }

            if index == last {
                self.pending = Some(row);
            } else {
                complete.push(row);
            }
        }

        complete
    }

    /// Release the pending row at end of stream.
    pub fn finish(&mut self) -> Option<Row> {
        self.pending.take()
    }

    /// Key of the row currently held back, if any.
    pub fn pending_key(&self) -> Option<&[u8]> {
        self.pending.as_ref().map(|row| row.key.as_slice())
    }
}

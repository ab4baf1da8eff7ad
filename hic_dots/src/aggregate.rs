// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Concatenation, overlap deduplication, and global filtering of per-tile
//! pixel tables.

use std::collections::HashSet;

use crate::pixel::PixelRecord;

/// Global filters applied after deduplication.
#[derive(Clone, Copy, Debug)]
pub struct AggregateFilters {
    pub diag_min: Option<usize>,
    pub diag_max: Option<usize>,
    pub nnans_cap: Option<f64>,
}

impl Default for AggregateFilters {
    fn default() -> Self {
        AggregateFilters { diag_min: None, diag_max: None, nnans_cap: None }
    }
}

/// Accumulates per-tile pixel tables into one deduplicated, filtered,
/// sorted table. Tiles may arrive in any order; overlapping tiles may
/// repeat a `(bin1_id, bin2_id)` pair, which is resolved "first wins" (the
/// occurrence first appended to the aggregator survives).
#[derive(Default)]
pub struct Aggregator {
    seen: HashSet<(usize, usize)>,
    rows: Vec<PixelRecord>,
    /// Count of tiles whose every pixel was masked out (§7,
    /// `NumericalDegenerate`): a warning counter, not an error.
    pub degenerate_tiles: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one tile's rows, keeping the first occurrence of any
    /// repeated `(bin1_id, bin2_id)` pair.
    pub fn push_tile(&mut self, rows: Vec<PixelRecord>, degenerate: bool) {
        if degenerate {
            self.degenerate_tiles += 1;
        }
        for row in rows {
            if self.seen.insert((row.bin1_id, row.bin2_id)) {
                self.rows.push(row);
            }
        }
    }

    /// Consumes the aggregator, applying `filters` and returning the rows
    /// stable-sorted by `(bin1_id, bin2_id)`.
    pub fn finish(mut self, filters: AggregateFilters) -> Vec<PixelRecord> {
        self.rows.retain(|row| {
            let diag = row.bin2_id - row.bin1_id;
            if let Some(lo) = filters.diag_min {
                if diag < lo {
                    return false;
                }
            }
            if let Some(hi) = filters.diag_max {
                if diag > hi {
                    return false;
                }
            }
            if let Some(cap) = filters.nnans_cap {
                if row.la_exp.iter().any(|(_, nnans)| *nnans > cap) {
                    return false;
                }
            }
            true
        });
        self.rows.sort_by_key(|row| (row.bin1_id, row.bin2_id));
        self.rows
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(bin1: usize, bin2: usize, nnans: f64) -> PixelRecord {
        PixelRecord { bin1_id: bin1, bin2_id: bin2, obs_raw: 0.0, exp_raw: 1.0, la_exp: vec![(1.0, nnans)] }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut agg = Aggregator::new();
        agg.push_tile(vec![row(1, 2, 0.0)], false);
        agg.push_tile(vec![PixelRecord { obs_raw: 99.0, ..row(1, 2, 0.0) }], false);
        let rows = agg.finish(AggregateFilters::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].obs_raw, 0.0);
    }

    #[test]
    fn sorted_by_bin_pair() {
        let mut agg = Aggregator::new();
        agg.push_tile(vec![row(5, 6, 0.0), row(1, 2, 0.0)], false);
        let rows = agg.finish(AggregateFilters::default());
        assert_eq!(rows.iter().map(|r| (r.bin1_id, r.bin2_id)).collect::<Vec<_>>(), vec![(1, 2), (5, 6)]);
    }

    #[test]
    fn diag_band_filter() {
        let mut agg = Aggregator::new();
        agg.push_tile(vec![row(0, 1, 0.0), row(0, 5, 0.0)], false);
        let rows = agg.finish(AggregateFilters { diag_min: Some(2), diag_max: Some(10), nnans_cap: None });
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bin2_id, 5);
    }

    #[test]
    fn nnans_cap_filter() {
        let mut agg = Aggregator::new();
        agg.push_tile(vec![row(0, 1, 10.0), row(0, 2, 1.0)], false);
        let rows = agg.finish(AggregateFilters { diag_min: None, diag_max: None, nnans_cap: Some(5.0) });
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bin2_id, 2);
    }

    #[test]
    fn degenerate_tiles_are_counted() {
        let mut agg = Aggregator::new();
        agg.push_tile(vec![], true);
        agg.push_tile(vec![row(0, 1, 0.0)], false);
        assert_eq!(agg.degenerate_tiles, 1);
    }
}

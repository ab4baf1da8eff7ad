// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Dense diagonal/block expected reductions.
//!
//! Not the production expected estimator: a non-chunked, single-fetched-
//! region helper used only to back the `compute-expected` CLI and as an
//! independent reference the `ContactStore`-backed computation can be
//! checked against in tests.

use crate::tile::Tile;

/// One diagonal's balanced-sum reduction: `balanced.avg = balanced.sum /
/// n_valid`, `NaN` when a diagonal is masked (`diag < ignore_diags`) or has
/// no valid entries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagStat {
    pub diag: usize,
    pub balanced_sum: f64,
    pub n_valid: usize,
    pub balanced_avg: f64,
}

/// Per-diagonal means of a symmetric `n x n` balanced matrix, for
/// `diag = 0..n`. Diagonals below `ignore_diags` are reported with zero
/// weight (as `compute-expected --drop-diags` does).
pub fn diag_mean(matrix: &Tile, ignore_diags: usize) -> Vec<DiagStat> {
    let (rows, cols) = matrix.size();
    assert_eq!(rows, cols, "diag_mean requires a square matrix");
    let n = rows;
    (0..n)
        .map(|d| {
            if d < ignore_diags {
                return DiagStat { diag: d, balanced_sum: 0.0, n_valid: 0, balanced_avg: f64::NAN };
            }
            let mut sum = 0.0;
            let mut count = 0usize;
            for i in 0..(n - d) {
                let v = matrix.get(i, i + d);
                if !v.is_nan() {
                    sum += v;
                    count += 1;
                }
            }
            let avg = if count > 0 { sum / count as f64 } else { f64::NAN };
            DiagStat { diag: d, balanced_sum: sum, n_valid: count, balanced_avg: avg }
        })
        .collect()
}

/// As [`diag_mean`], for an `m x n` off-diagonal (trans-style) block:
/// diagonal index `d = col - row` ranges over `-(m-1)..n`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AsymDiagStat {
    pub diag: isize,
    pub balanced_sum: f64,
    pub n_valid: usize,
    pub balanced_avg: f64,
}

pub fn diag_mean_asymmetric(matrix: &Tile, ignore_diags: usize) -> Vec<AsymDiagStat> {
    let (rows, cols) = matrix.size();
    let min_d = -(rows as isize) + 1;
    let max_d = cols as isize - 1;
    (min_d..=max_d)
        .map(|d| {
            if d.unsigned_abs() < ignore_diags {
                return AsymDiagStat { diag: d, balanced_sum: 0.0, n_valid: 0, balanced_avg: f64::NAN };
            }
            let mut sum = 0.0;
            let mut count = 0usize;
            let row_start = (-d).max(0) as usize;
            let row_end = rows.min((cols as isize - d).max(0) as usize);
            for i in row_start..row_end {
                let j = (i as isize + d) as usize;
                let v = matrix.get(i, j);
                if !v.is_nan() {
                    sum += v;
                    count += 1;
                }
            }
            let avg = if count > 0 { sum / count as f64 } else { f64::NAN };
            AsymDiagStat { diag: d, balanced_sum: sum, n_valid: count, balanced_avg: avg }
        })
        .collect()
}

/// Whole-block mean over a (trans-contact) dense region, ignoring `NaN`.
pub fn block_mean(matrix: &Tile) -> (f64, usize, f64) {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in matrix.as_slice() {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }
    let avg = if count > 0 { sum / count as f64 } else { f64::NAN };
    (sum, count, avg)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn diag_mean_matches_manual_sum() {
        let matrix = Tile::from_vec(3, 3, vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0]).unwrap();
        let stats = diag_mean(&matrix, 0);
        assert_eq!(stats[0].balanced_sum, 3.0); // main diagonal: 1+1+1
        assert_eq!(stats[1].n_valid, 2); // offset 1: two entries
    }

    #[test]
    fn ignore_diags_zeroes_out_masked_diagonals() {
        let matrix = Tile::from_vec(3, 3, vec![1.0; 9]).unwrap();
        let stats = diag_mean(&matrix, 2);
        assert!(stats[0].balanced_avg.is_nan());
        assert!(stats[1].balanced_avg.is_nan());
        assert!(!stats[2].balanced_avg.is_nan());
    }

    #[test]
    fn nan_entries_are_excluded_from_the_average() {
        let matrix = Tile::from_vec(2, 2, vec![1.0, f64::NAN, f64::NAN, 1.0]).unwrap();
        let stats = diag_mean(&matrix, 0);
        assert_eq!(stats[0].n_valid, 1);
        assert_eq!(stats[0].balanced_avg, 1.0);
    }

    #[test]
    fn block_mean_ignores_nan() {
        let matrix = Tile::from_vec(2, 2, vec![2.0, f64::NAN, 4.0, 6.0]).unwrap();
        let (sum, n, avg) = block_mean(&matrix);
        assert_eq!(sum, 12.0);
        assert_eq!(n, 3);
        assert_eq!(avg, 4.0);
    }

    #[test]
    fn asymmetric_diag_covers_full_offset_range() {
        let matrix = Tile::from_vec(2, 3, vec![1.0; 6]).unwrap();
        let stats = diag_mean_asymmetric(&matrix, 0);
        // m=2, n=3: d ranges from -1 to 2 inclusive => 4 entries.
        assert_eq!(stats.len(), 4);
    }
}

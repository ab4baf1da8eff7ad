// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Peak/TAD/flame snippet extraction: simple matrix-slicing arithmetic
//! around a set of structural anchor positions ("stalls"), kept separate
//! from the dot-calling pipeline — these carry no FDR/cluster semantics of
//! their own.

use crate::error::{Error, Result};
use crate::tile::Tile;

fn clamp_window(center: usize, half_width: usize, len: usize) -> (usize, usize) {
    let lo = center.saturating_sub(half_width);
    let hi = (center + half_width + 1).min(len);
    (lo, hi)
}

/// Fetches `stalls[index]`, raising `ShapeMismatch` instead of panicking
/// when `index` is out of range (§11.1: "raise an error if index is out of
/// range").
fn stall_at(stalls: &[usize], index: usize) -> Result<usize> {
    stalls.get(index).copied().ok_or_else(|| {
        Error::ShapeMismatch(format!("stall index {index} out of range for {} stalls", stalls.len()))
    })
}

/// A square window of half-width `size` centred on `(stalls[i], stalls[j])`.
pub fn peak_snippet(matrix: &Tile, stalls: &[usize], i: usize, j: usize, size: usize) -> Result<Tile> {
    let (rows, cols) = matrix.size();
    let (row_lo, row_hi) = clamp_window(stall_at(stalls, i)?, size, rows);
    let (col_lo, col_hi) = clamp_window(stall_at(stalls, j)?, size, cols);
    Ok(matrix.as_rect().rect((row_lo, col_lo), (row_hi - row_lo, col_hi - col_lo))?.to_tile())
}

/// The TAD block `stalls[index]..=stalls[index+1]` on both axes. This is a
/// **closed** interval by design — one row and one column beyond the usual
/// half-open slicing convention — preserved from the original
/// implementation rather than "fixed".
pub fn tad_snippet(matrix: &Tile, stalls: &[usize], index: usize) -> Result<Tile> {
    let lo = stall_at(stalls, index)?;
    let hi_inclusive = stall_at(stalls, index + 1)?;
    let width = hi_inclusive
        .checked_sub(lo)
        .and_then(|w| w.checked_add(1))
        .ok_or_else(|| Error::ShapeMismatch(format!("stalls[{index}]={lo} must not exceed stalls[{}]={hi_inclusive}", index + 1)))?;
    Ok(matrix.as_rect().rect((lo, lo), (width, width))?.to_tile())
}

/// In-TAD and out-TAD masks alongside the closed-interval TAD block itself.
pub struct TadWithAdjacent {
    pub tad: Tile,
    /// Boolean mask (1.0/0.0) over `tad`: positions at least `diag_offset`
    /// off the local diagonal and within `max_distance` of it.
    pub in_tad_mask: Tile,
    /// A same-shape block shifted `delta` past the TAD boundary, used as
    /// an out-of-TAD comparison region.
    pub out_tad: Tile,
}

/// As [`tad_snippet`], additionally returning an in-TAD proximity mask and
/// a same-shape out-of-TAD comparison block offset by `delta`.
pub fn tad_snippet_with_adjacent(
    matrix: &Tile,
    stalls: &[usize],
    index: usize,
    delta: usize,
    diag_offset: usize,
    max_distance: usize,
) -> Result<TadWithAdjacent> {
    let tad = tad_snippet(matrix, stalls, index)?;
    let (n, _) = tad.size();
    let mut in_tad_mask = Tile::new(n, n);
    for r in 0..n {
        for c in 0..n {
            let d = r.abs_diff(c);
            if d >= diag_offset && d <= max_distance {
                in_tad_mask.set(r, c, 1.0);
            }
        }
    }

    let lo = stall_at(stalls, index)?;
    let (rows, cols) = matrix.size();
    let out_lo = (lo + delta).min(rows.saturating_sub(n));
    let out_col_lo = out_lo.min(cols.saturating_sub(n));
    let out_tad = matrix.as_rect().rect((out_lo, out_col_lo), (n, n))?.to_tile();

    Ok(TadWithAdjacent { tad, in_tad_mask, out_tad })
}

/// A vertical strip of `width` columns centred on `stalls[i]`, extending
/// `edge_length` rows below `stalls[i]`.
pub fn flame_snippet_vertical(matrix: &Tile, stalls: &[usize], i: usize, width: usize, edge_length: usize) -> Result<Tile> {
    let (rows, cols) = matrix.size();
    let stall = stall_at(stalls, i)?;
    let (col_lo, col_hi) = clamp_window(stall, width / 2, cols);
    let row_lo = stall;
    let row_hi = (row_lo + edge_length).min(rows);
    Ok(matrix.as_rect().rect((row_lo, col_lo), (row_hi - row_lo, col_hi - col_lo))?.to_tile())
}

/// A horizontal strip of `width` rows centred on `stalls[i]`, extending
/// `edge_length` columns past `stalls[i]`.
pub fn flame_snippet_horizontal(matrix: &Tile, stalls: &[usize], i: usize, width: usize, edge_length: usize) -> Result<Tile> {
    let (rows, cols) = matrix.size();
    let stall = stall_at(stalls, i)?;
    let (row_lo, row_hi) = clamp_window(stall, width / 2, rows);
    let col_lo = stall;
    let col_hi = (col_lo + edge_length).min(cols);
    Ok(matrix.as_rect().rect((row_lo, col_lo), (row_hi - row_lo, col_hi - col_lo))?.to_tile())
}

#[cfg(test)]
mod test {
    use super::*;

    fn ramp(n: usize) -> Tile {
        let data: Vec<f64> = (0..n * n).map(|x| x as f64).collect();
        Tile::from_vec(n, n, data).unwrap()
    }

    #[test]
    fn peak_snippet_is_centred_square() {
        let matrix = ramp(20);
        let snippet = peak_snippet(&matrix, &[10], 0, 0, 2).unwrap();
        assert_eq!(snippet.size(), (5, 5));
    }

    #[test]
    fn tad_snippet_is_closed_interval() {
        let matrix = ramp(20);
        let stalls = vec![2, 6];
        let snippet = tad_snippet(&matrix, &stalls, 0).unwrap();
        // stalls[1] - stalls[0] + 1 = 5, not 4 (half-open would give 4).
        assert_eq!(snippet.size(), (5, 5));
    }

    #[test]
    fn flame_snippets_extend_away_from_stall() {
        let matrix = ramp(30);
        let stalls = vec![10];
        let v = flame_snippet_vertical(&matrix, &stalls, 0, 3, 5).unwrap();
        let h = flame_snippet_horizontal(&matrix, &stalls, 0, 3, 5).unwrap();
        assert_eq!(v.size(), (5, 3));
        assert_eq!(h.size(), (3, 5));
    }

    #[test]
    fn out_of_range_index_is_an_error_not_a_panic() {
        let matrix = ramp(20);
        let stalls = vec![2, 6];
        assert!(matches!(peak_snippet(&matrix, &stalls, 0, 5, 2), Err(Error::ShapeMismatch(_))));
        assert!(matches!(tad_snippet(&matrix, &stalls, 1), Err(Error::ShapeMismatch(_))));
        assert!(matches!(
            tad_snippet_with_adjacent(&matrix, &stalls, 1, 1, 0, 10),
            Err(Error::ShapeMismatch(_))
        ));
        assert!(matches!(flame_snippet_vertical(&matrix, &stalls, 5, 3, 5), Err(Error::ShapeMismatch(_))));
        assert!(matches!(flame_snippet_horizontal(&matrix, &stalls, 5, 3, 5), Err(Error::ShapeMismatch(_))));
    }
}

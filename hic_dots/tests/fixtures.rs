// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use hic_dots::cluster::Clusterer;
use hic_dots::engine::TileProcessor;
use hic_dots::fdr::benjamini_hochberg;
use hic_dots::tile::Tile;
use hic_dots::tile_stream::{diagonal_band, square_tiling};
use hic_dots::weights::Weights;
use hic_kernels::standard::box_kernel;
use hic_test_utils::assert_almost_eq;

/// S1: identity-ish kernel on an 8x8 all-ones tile.
#[test]
fn s1_uniform_tile_yields_constant_la_exp() {
    let n = 8;
    let o_raw = Tile::from_vec(n, n, vec![1.0; n * n]).unwrap();
    let e_bal = Tile::from_vec(n, n, vec![1.0; n * n]).unwrap();
    let weights = Weights::Symmetric(vec![1.0; n]);
    let kernel = box_kernel(3);
    let kernels = vec![("box3".to_string(), kernel)];

    let out = TileProcessor::process((0, 0), &o_raw, &e_bal, &weights, &kernels).unwrap();

    assert!(out.rows.iter().all(|r| r.bin1_id < r.bin2_id));
    for row in &out.rows {
        let (value, _) = row.la_exp[0];
        assert_almost_eq!(value, 1.0, 1e-12);
    }
    // interior pixels (row, col both in 1..n-1) see the full 3x3 footprint,
    // so nothing is masked.
    let interior_has_zero_nnans = out
        .rows
        .iter()
        .any(|r| r.bin1_id > 0 && r.bin1_id < n - 1 && r.bin2_id > 0 && r.bin2_id < n - 1 && r.la_exp[0].1 == 0.0);
    assert!(interior_has_zero_nnans);
    // boundary pixels lose at least one neighbour off the tile edge.
    let boundary_has_masked = out.rows.iter().any(|r| (r.bin1_id == 0 || r.bin2_id == n - 1) && r.la_exp[0].1 > 0.0);
    assert!(boundary_has_masked);
}

/// S2: Benjamini-Hochberg rejection on a literal p-value vector.
#[test]
fn s2_bh_rejection_matches_literal_fixture() {
    let p = vec![0.001, 0.008, 0.04, 0.5];
    let result = benjamini_hochberg(&p, 0.1);
    assert_eq!(result.reject, vec![true, true, true, false]);
    assert_almost_eq!(result.p_max_reject.unwrap(), 0.04, 1e-12);
    assert_almost_eq!(result.p_min_accept.unwrap(), 0.5, 1e-12);
}

/// S3: diagonal-band tiling windows.
#[test]
fn s3_diagonal_tiling_matches_literal_windows() {
    let windows: Vec<_> = diagonal_band(0, 100, 5, 20).collect();
    let pairs: Vec<(usize, usize)> = windows.iter().map(|w| (w.row_start, w.row_stop)).collect();
    assert_eq!(pairs, vec![(0, 45), (15, 65), (35, 85), (55, 100)]);

    // every cell with |i-j| <= 20 falls inside at least one window.
    for i in 0..100usize {
        for j in i.saturating_sub(20)..=(i + 20).min(99) {
            let covered = windows.iter().any(|w| w.row_start <= i.min(j) && i.max(j) < w.row_stop);
            assert!(covered, "({i}, {j}) not covered by any diagonal window");
        }
    }
}

/// S4: non-square trailing square-tiling windows.
#[test]
fn s4_square_tiling_non_square_matches_literal_windows() {
    let windows: Vec<_> = square_tiling(0, 10, 4, 1, false).collect();
    let mut axis_pairs: Vec<(usize, usize)> =
        windows.iter().map(|w| (w.row_start, w.row_stop)).collect();
    axis_pairs.sort();
    axis_pairs.dedup();
    assert_eq!(axis_pairs, vec![(0, 5), (3, 9), (7, 10)]);
}

/// S5: single-link clustering of a literal pixel set.
#[test]
fn s5_clustering_matches_literal_fixture() {
    let clusterer = Clusterer::new(3.0);
    let points = vec![(10, 20), (11, 21), (50, 60)];
    let out = clusterer.cluster(&points);

    assert_eq!(out[0].c_label, out[1].c_label);
    assert_ne!(out[0].c_label, out[2].c_label);
    assert_eq!(out[0].c_size, 2);
    assert_eq!(out[2].c_size, 1);
    assert_almost_eq!(out[0].cbin1_id, 10.5, 1e-12);
    assert_almost_eq!(out[0].cbin2_id, 20.5, 1e-12);
    assert_almost_eq!(out[2].cbin1_id, 50.0, 1e-12);
    assert_almost_eq!(out[2].cbin2_id, 60.0, 1e-12);
}

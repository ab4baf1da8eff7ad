// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! A TSV/JSON-backed [`ContactStore`] for tests and the CLI demo.
//!
//! This is explicitly not a `.cool`/HDF5 reader (§1 Non-goals, §10.4): it
//! loads a small dense fixture from disk so `hic_cli` can exercise the full
//! pipeline end to end without a real cooler-like backend.

use std::ops::Range;
use std::path::Path;

use serde::Deserialize;

use hic_dots::error::{Error, Result};
use hic_dots::matrix::ContactStore;
use hic_dots::tile::Tile;
use hic_dots::weights::Weights;

/// On-disk shape of a fixture: a dense `n_bins x n_bins` raw observed
/// matrix, a per-bin balancing weight vector, and a per-diagonal-offset
/// raw expected profile (§6, "global expected profile").
#[derive(Deserialize)]
struct FixtureData {
    n_bins: usize,
    weights: Vec<f64>,
    /// `expected_diag[d]` is the raw expected value at diagonal offset `d`,
    /// for `d = 0..n_bins`.
    expected_diag: Vec<f64>,
    /// Row-major `n_bins x n_bins` raw observed counts.
    observed: Vec<f64>,
}

/// A dense, whole-chromosome fixture loaded from a JSON file, implementing
/// [`ContactStore`] by slicing its own in-memory matrix and deriving
/// `E_bal` from the stored per-diagonal expected profile and balancing
/// weights (`E_bal = E_raw * w_i * w_j`, matching the engine's own
/// rescaling invariant).
pub struct FixtureContactStore {
    n_bins: usize,
    weights: Vec<f64>,
    expected_diag: Vec<f64>,
    observed: Tile,
}

impl FixtureContactStore {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let data: FixtureData = serde_json::from_str(&text).map_err(|e| Error::FetchFailure(Box::new(e)))?;
        if data.weights.len() != data.n_bins {
            return Err(Error::ShapeMismatch(format!(
                "fixture weights length {} does not match n_bins {}",
                data.weights.len(),
                data.n_bins
            )));
        }
        if data.expected_diag.len() != data.n_bins {
            return Err(Error::ShapeMismatch(format!(
                "fixture expected_diag length {} does not match n_bins {}",
                data.expected_diag.len(),
                data.n_bins
            )));
        }
        let observed = Tile::from_vec(data.n_bins, data.n_bins, data.observed)?;
        Ok(Self {
            n_bins: data.n_bins,
            weights: data.weights,
            expected_diag: data.expected_diag,
            observed,
        })
    }

    fn expected_raw_at(&self, i: usize, j: usize) -> f64 {
        let d = i.abs_diff(j).min(self.n_bins.saturating_sub(1));
        self.expected_diag[d]
    }
}

impl ContactStore for FixtureContactStore {
    fn fetch_balanced(&self, row_range: Range<usize>, col_range: Range<usize>) -> Result<(Tile, Tile, Weights)> {
        let rows = row_range.len();
        let cols = col_range.len();
        let mut o_raw = Tile::new(rows, cols);
        let mut e_bal = Tile::new(rows, cols);
        for (ri, i) in row_range.clone().enumerate() {
            let wi = self.weights[i];
            for (ci, j) in col_range.clone().enumerate() {
                o_raw.set(ri, ci, self.observed.get(i, j));
                let wj = self.weights[j];
                e_bal.set(ri, ci, self.expected_raw_at(i, j) * wi * wj);
            }
        }
        let w_i: Vec<f64> = row_range.map(|i| self.weights[i]).collect();
        let w_j: Vec<f64> = col_range.map(|j| self.weights[j]).collect();
        Ok((o_raw, e_bal, Weights::Asymmetric(w_i, w_j)))
    }

    fn len(&self) -> usize {
        self.n_bins
    }
}

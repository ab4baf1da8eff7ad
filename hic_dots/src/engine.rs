// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Per-tile orchestration: rescaling, convolution against every named
//! kernel, masking, and emission of a sparse pixel table.

use hic_kernels::Kernel;

use crate::convolution::locally_adjusted_expected;
use crate::error::{Error, Result};
use crate::pixel::PixelRecord;
use crate::tile::Tile;
use crate::weights::Weights;

/// Output of one [`TileProcessor::process`] call.
pub struct TileOutput {
    pub rows: Vec<PixelRecord>,
    /// Set when every pixel of the tile was masked out — a structural
    /// outcome reported to the caller as a warning count, not an error.
    pub degenerate: bool,
}

pub struct TileProcessor;

impl TileProcessor {
    /// Processes one tile. `origin` is the tile's absolute `(row, col)`
    /// offset into the chromosome matrix; `kernels` is the ordered list of
    /// named kernels to convolve against.
    pub fn process(
        origin: (usize, usize),
        o_raw: &Tile,
        e_bal: &Tile,
        weights: &Weights,
        kernels: &[(String, Kernel)],
    ) -> Result<TileOutput> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("tile_processor", origin = ?origin).entered();

        if kernels.is_empty() {
            return Err(Error::InvalidKernels("kernel list must not be empty".to_string()));
        }
        let (rows, cols) = o_raw.size();
        if e_bal.size() != (rows, cols) {
            return Err(Error::ShapeMismatch(format!(
                "observed tile {:?} and expected tile {:?} differ in shape",
                o_raw.size(),
                e_bal.size()
            )));
        }
        let (w_i, w_j) = weights.axis_vectors(rows, cols)?;

        let mut o_bal = Tile::new(rows, cols);
        let mut e_raw = Tile::new(rows, cols);
        let mut nan_mask = Tile::new(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let w = w_i[i] * w_j[j];
                let ob = o_raw.get(i, j) * w;
                let er = e_bal.get(i, j) / w;
                let is_nan = ob.is_nan() || e_bal.get(i, j).is_nan();
                o_bal.set(i, j, if is_nan { 0.0 } else { ob });
                e_raw.set(i, j, er);
                nan_mask.set(i, j, if is_nan { 1.0 } else { 0.0 });
            }
        }
        let mut e_bal_masked = e_bal.clone();
        for i in 0..rows {
            for j in 0..cols {
                if nan_mask.get(i, j) != 0.0 {
                    e_bal_masked.set(i, j, 0.0);
                }
            }
        }

        let mut per_kernel = Vec::with_capacity(kernels.len());
        for (_name, kernel) in kernels {
            let la = locally_adjusted_expected(&o_bal, &e_bal_masked, &e_raw, &nan_mask, kernel)?;
            per_kernel.push(la);
        }

        let mut out_rows = Vec::new();
        for i in 0..rows {
            for j in 0..cols {
                let bin1_id = origin.0 + i;
                let bin2_id = origin.1 + j;
                if bin1_id >= bin2_id {
                    continue;
                }
                let la_exp: Vec<(f64, f64)> = per_kernel.iter().map(|la| (la.la_exp.get(i, j), la.nnans.get(i, j))).collect();
                if la_exp.iter().any(|(v, _)| !v.is_finite()) {
                    continue;
                }
                out_rows.push(PixelRecord {
                    bin1_id,
                    bin2_id,
                    obs_raw: o_raw.get(i, j),
                    exp_raw: e_raw.get(i, j),
                    la_exp,
                });
            }
        }

        let degenerate = rows > 0 && cols > 0 && nan_mask.as_slice().iter().all(|&v| v != 0.0);
        Ok(TileOutput { rows: out_rows, degenerate })
    }
}

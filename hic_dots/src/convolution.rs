// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Per-tile convolution: the numerical core of the locally-adjusted
//! expected computation.

use hic_kernels::{convolve2d, Kernel};

use crate::error::{Error, Result};
use crate::tile::Tile;

/// Result of convolving one tile with one kernel: the locally-adjusted
/// expected tile and the count of masked positions within the kernel's
/// footprint at each output pixel.
pub struct LocallyAdjusted {
    pub la_exp: Tile,
    pub nnans: Tile,
}

/// Runs steps 1-4 of the adjusted-expected algorithm for a single kernel.
///
/// Preconditions: `balanced_obs`, `balanced_exp`, `raw_exp`, and `nan_mask`
/// all share a shape, and `balanced_obs`/`balanced_exp` have already been
/// zeroed wherever `nan_mask` is true.
pub fn locally_adjusted_expected(
    balanced_obs: &Tile,
    balanced_exp: &Tile,
    raw_exp: &Tile,
    nan_mask: &Tile,
    kernel: &Kernel,
) -> Result<LocallyAdjusted> {
    let (rows, cols) = balanced_obs.size();
    if balanced_exp.size() != (rows, cols) || raw_exp.size() != (rows, cols) || nan_mask.size() != (rows, cols) {
        return Err(Error::ShapeMismatch(
            "observed, expected, and NaN-mask tiles must share a shape".to_string(),
        ));
    }
    if kernel.width() > rows || kernel.width() > cols {
        return Err(Error::InvalidKernels(format!(
            "kernel width {} exceeds tile shape {}x{}",
            kernel.width(),
            rows,
            cols
        )));
    }

    let ko = convolve2d(balanced_obs.as_slice(), rows, cols, kernel, 0.0);
    let ke = convolve2d(balanced_exp.as_slice(), rows, cols, kernel, 0.0);
    let footprint = kernel.footprint();
    let nn = convolve2d(nan_mask.as_slice(), rows, cols, &footprint, 1.0);

    let er = raw_exp.as_slice();
    let la_exp: Vec<f64> = er
        .iter()
        .zip(ko.iter().zip(ke.iter()))
        .map(|(&e, (&o, &k))| e * (o / k))
        .collect();

    Ok(LocallyAdjusted {
        la_exp: Tile::from_vec(rows, cols, la_exp)?,
        nnans: Tile::from_vec(rows, cols, nn)?,
    })
}

// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Balancing-weight dispatch.
//!
//! The original Python implementation accepted either a single per-bin
//! weight vector (diagonal-origin tiles, same axis on both sides) or a pair
//! of vectors (off-diagonal tiles). `Weights` lifts that dynamic dispatch to
//! a tagged enum resolved once at the tile boundary.

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Weights {
    Symmetric(Vec<f64>),
    Asymmetric(Vec<f64>, Vec<f64>),
}

impl Weights {
    /// Splits into `(w_i, w_j)` for a tile of the given `(rows, cols)`
    /// shape, validating vector lengths against the tile axes.
    pub fn axis_vectors(&self, rows: usize, cols: usize) -> Result<(&[f64], &[f64])> {
        match self {
            Weights::Symmetric(w) => {
                if w.len() != rows || w.len() != cols {
                    return Err(Error::InvalidWeights);
                }
                Ok((w, w))
            }
            Weights::Asymmetric(wi, wj) => {
                if wi.len() != rows || wj.len() != cols {
                    return Err(Error::InvalidWeights);
                }
                Ok((wi, wj))
            }
        }
    }
}

// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The `MatrixFetcher` external contract (§6): a seam for whatever backend
//! actually owns the contact matrix and its balancing weights. This crate
//! never reads a `.cool` file itself; [`ContactStore`] is the trait a real
//! backend would implement.

use crate::error::Result;
use crate::tile::Tile;
use crate::weights::Weights;

/// A source of balanced contact data over arbitrary bin-index windows.
///
/// Implementations own whatever persistent storage backs the matrix
/// (memory, a file, a remote store); `fetch_balanced` is the only method
/// the engine calls.
pub trait ContactStore {
    /// Returns `(O_raw, E_bal, weights)` for the window
    /// `row_range x col_range`. `O_raw` and `E_bal` are dense tiles of
    /// shape `(row_range.len(), col_range.len())`.
    fn fetch_balanced(
        &self,
        row_range: std::ops::Range<usize>,
        col_range: std::ops::Range<usize>,
    ) -> Result<(Tile, Tile, Weights)>;

    /// Total number of bins along either axis of the chromosome this store
    /// serves.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

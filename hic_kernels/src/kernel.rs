// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::error::{Error, Result};

/// A small odd-sided dense kernel with a centred origin, as consumed by
/// [`crate::convolve2d`].
///
/// Storage is row-major grid indices `0..width`; `radius()` is the offset
/// from the centre to an edge. Position `(radius, radius)` is the kernel's
/// centre.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    width: usize,
    weights: Vec<f64>,
}

impl Kernel {
    pub fn new(width: usize, weights: Vec<f64>) -> Result<Self> {
        if width == 0 || width % 2 == 0 {
            return Err(Error::InvalidWidth(width));
        }
        if weights.len() != width * width {
            return Err(Error::ShapeMismatch {
                got: weights.len(),
                expected: width * width,
            });
        }
        Ok(Self { width, weights })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn radius(&self) -> usize {
        self.width / 2
    }

    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[row * self.width + col]
    }

    /// The kernel's non-zero footprint, as a 0/1 kernel of the same shape.
    /// Convolving this against a NaN indicator counts masked neighbours
    /// within the kernel's support.
    pub fn footprint(&self) -> Kernel {
        let weights = self
            .weights
            .iter()
            .map(|&w| if w != 0.0 { 1.0 } else { 0.0 })
            .collect();
        Kernel {
            width: self.width,
            weights,
        }
    }

    pub fn footprint_size(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }
}

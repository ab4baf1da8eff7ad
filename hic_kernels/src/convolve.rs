// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::kernel::Kernel;

/// Dense, flipped (true-convolution) 2-D convolution of a row-major `rows x
/// cols` buffer with `kernel`, reading `boundary_fill` for any tap that
/// falls outside the buffer.
///
/// Boundary handling is an explicit parameter rather than a library default:
/// callers pass `0.0` for data matrices and `1.0` for the NaN indicator, so
/// that out-of-frame positions count as masked.
pub fn convolve2d(data: &[f64], rows: usize, cols: usize, kernel: &Kernel, boundary_fill: f64) -> Vec<f64> {
    debug_assert_eq!(data.len(), rows * cols);
    let r = kernel.radius() as isize;
    let width = kernel.width();
    let mut out = vec![0.0f64; rows * cols];
    for i in 0..rows as isize {
        for j in 0..cols as isize {
            let mut acc = 0.0;
            for a in 0..width {
                let si = i + r - a as isize;
                let (row_in_bounds, row_base) = if si >= 0 && si < rows as isize {
                    (true, si as usize * cols)
                } else {
                    (false, 0)
                };
                for b in 0..width {
                    let w = kernel.weight(a, b);
                    if w == 0.0 {
                        continue;
                    }
                    let sj = j + r - b as isize;
                    let v = if row_in_bounds && sj >= 0 && sj < cols as isize {
                        data[row_base + sj as usize]
                    } else {
                        boundary_fill
                    };
                    acc += w * v;
                }
            }
            out[i as usize * cols + j as usize] = acc;
        }
    }
    out
}

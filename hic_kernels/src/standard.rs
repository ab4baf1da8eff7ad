// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Convenience kernel shapes.
//!
//! These are mechanical box/annulus/half-plane builders, not a reproduction
//! of any specific published dot-calling kernel set — they exist so that a
//! caller (the CLI in particular) has *some* runnable default kernels
//! without having to hand-author weight vectors.

use crate::kernel::Kernel;

/// A single unit weight at the centre, zero elsewhere. Leaves its input
/// unchanged under convolution.
pub fn identity_center(width: usize) -> Kernel {
    let mut weights = vec![0.0; width * width];
    let r = width / 2;
    weights[r * width + r] = 1.0;
    Kernel::new(width, weights).expect("odd width with matching weights length")
}

/// A uniform `width x width` averaging box, each weight `1 / width^2`.
pub fn box_kernel(width: usize) -> Kernel {
    let area = (width * width) as f64;
    let weights = vec![1.0 / area; width * width];
    Kernel::new(width, weights).expect("odd width with matching weights length")
}

/// A square annulus: uniform weight between `inner_radius` and the kernel's
/// outer radius, zero inside `inner_radius`. `inner_radius` must be less
/// than `width / 2`.
pub fn donut(width: usize, inner_radius: usize) -> Kernel {
    let r = width / 2;
    assert!(inner_radius < r, "inner_radius must be smaller than the kernel radius");
    let mut weights = vec![0.0; width * width];
    let mut count = 0usize;
    for row in 0..width {
        for col in 0..width {
            let dr = (row as isize - r as isize).unsigned_abs();
            let dc = (col as isize - r as isize).unsigned_abs();
            if dr.max(dc) > inner_radius {
                count += 1;
            }
        }
    }
    let w = 1.0 / count as f64;
    for row in 0..width {
        for col in 0..width {
            let dr = (row as isize - r as isize).unsigned_abs();
            let dc = (col as isize - r as isize).unsigned_abs();
            if dr.max(dc) > inner_radius {
                weights[row * width + col] = w;
            }
        }
    }
    Kernel::new(width, weights).expect("odd width with matching weights length")
}

/// Uniform weight on the central horizontal strip of height `thickness`,
/// zero elsewhere.
pub fn horizontal_strip(width: usize, thickness: usize) -> Kernel {
    let r = width / 2;
    let half = thickness / 2;
    let mut weights = vec![0.0; width * width];
    let mut count = 0usize;
    for dr in 0..=half.min(r) {
        count += if dr == 0 { width } else { 2 * width };
    }
    let w = 1.0 / count as f64;
    for row in 0..width {
        let dr = (row as isize - r as isize).unsigned_abs();
        if dr <= half {
            for col in 0..width {
                weights[row * width + col] = w;
            }
        }
    }
    Kernel::new(width, weights).expect("odd width with matching weights length")
}

/// Uniform weight on the central vertical strip of width `thickness`, zero
/// elsewhere.
pub fn vertical_strip(width: usize, thickness: usize) -> Kernel {
    let r = width / 2;
    let half = thickness / 2;
    let mut weights = vec![0.0; width * width];
    let mut count = 0usize;
    for dc in 0..=half.min(r) {
        count += if dc == 0 { width } else { 2 * width };
    }
    let w = 1.0 / count as f64;
    for row in 0..width {
        for col in 0..width {
            let dc = (col as isize - r as isize).unsigned_abs();
            if dc <= half {
                weights[row * width + col] = w;
            }
        }
    }
    Kernel::new(width, weights).expect("odd width with matching weights length")
}

/// Uniform weight on the lower-left triangle (row >= col in kernel-local
/// coordinates), zero elsewhere.
pub fn lowerleft_triangle(width: usize) -> Kernel {
    let mut weights = vec![0.0; width * width];
    let mut count = 0usize;
    for row in 0..width {
        for col in 0..=row {
            count += 1;
            let _ = col;
        }
    }
    let w = 1.0 / count as f64;
    for row in 0..width {
        for col in 0..=row {
            weights[row * width + col] = w;
        }
    }
    Kernel::new(width, weights).expect("odd width with matching weights length")
}

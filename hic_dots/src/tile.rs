// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Dense, row-major `f64` buffers and the rectangular sub-views
//! [`TileRect`]/[`TileRectMut`] that let a tile be addressed by an `(origin,
//! size)` window without copying.

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    size: (usize, usize),
    data: Vec<f64>,
}

#[derive(Clone, Copy)]
pub struct TileRect<'a> {
    origin: (usize, usize),
    size: (usize, usize),
    tile: &'a Tile,
}

pub struct TileRectMut<'a> {
    origin: (usize, usize),
    size: (usize, usize),
    tile: &'a mut Tile,
}

impl Tile {
    /// A `rows x cols` tile filled with `0.0`.
    pub fn new(rows: usize, cols: usize) -> Self {
        Tile {
            size: (rows, cols),
            data: vec![0.0; rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch(format!(
                "tile data length {} does not match {}x{}",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Tile {
            size: (rows, cols),
            data,
        })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.0
    }

    pub fn cols(&self) -> usize {
        self.size.1
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn as_rect(&self) -> TileRect<'_> {
        TileRect {
            origin: (0, 0),
            size: self.size,
            tile: self,
        }
    }

    pub fn as_rect_mut(&mut self) -> TileRectMut<'_> {
        TileRectMut {
            origin: (0, 0),
            size: self.size,
            tile: self,
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size.1 + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.size.1 + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.size.1;
        &self.data[start..start + self.size.1]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let cols = self.size.1;
        let start = row * cols;
        &mut self.data[start..start + cols]
    }

    /// A new tile with `f` applied element-wise.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Tile {
        Tile {
            size: self.size,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// A new tile combining `self` and `other` element-wise; panics if
    /// shapes differ.
    pub fn zip_with(&self, other: &Tile, f: impl Fn(f64, f64) -> f64) -> Result<Tile> {
        if self.size != other.size {
            return Err(Error::ShapeMismatch(format!(
                "tile shapes {:?} and {:?} differ",
                self.size, other.size
            )));
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Tile {
            size: self.size,
            data,
        })
    }
}

fn rect_size_check(origin: (usize, usize), size: (usize, usize), outer: (usize, usize)) -> Result<()> {
    if origin.0 + size.0 > outer.0 || origin.1 + size.1 > outer.1 {
        Err(Error::ShapeMismatch(format!(
            "rect {:?}+{:?} out of bounds of {:?} tile",
            origin, size, outer
        )))
    } else {
        Ok(())
    }
}

impl<'a> TileRect<'a> {
    pub fn rect(&self, origin: (usize, usize), size: (usize, usize)) -> Result<TileRect<'a>> {
        rect_size_check(origin, size, self.size)?;
        Ok(TileRect {
            origin: (origin.0 + self.origin.0, origin.1 + self.origin.1),
            size,
            tile: self.tile,
        })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn row(&self, row: usize) -> &'a [f64] {
        debug_assert!(row < self.size.0);
        let start = (row + self.origin.0) * self.tile.size.1 + self.origin.1;
        &self.tile.data[start..start + self.size.1]
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.row(row)[col]
    }

    pub fn to_tile(&self) -> Tile {
        let mut data = Vec::with_capacity(self.size.0 * self.size.1);
        for r in 0..self.size.0 {
            data.extend_from_slice(self.row(r));
        }
        Tile {
            size: self.size,
            data,
        }
    }
}

impl<'a> TileRectMut<'a> {
    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn row(&mut self, row: usize) -> &mut [f64] {
        debug_assert!(row < self.size.0);
        let start = (row + self.origin.0) * self.tile.size.1 + self.origin.1;
        &mut self.tile.data[start..start + self.size.1]
    }

    pub fn as_rect(&self) -> TileRect<'_> {
        TileRect {
            origin: self.origin,
            size: self.size,
            tile: self.tile,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Tile;

    #[test]
    fn rect_is_a_window() {
        let mut tile = Tile::new(4, 4);
        for r in 0..4 {
            for c in 0..4 {
                tile.set(r, c, (r * 4 + c) as f64);
            }
        }
        let window = tile.as_rect().rect((1, 1), (2, 2)).unwrap();
        assert_eq!(window.get(0, 0), 5.0);
        assert_eq!(window.get(1, 1), 10.0);
    }

    #[test]
    fn rect_out_of_bounds_is_an_error() {
        let tile = Tile::new(2, 2);
        assert!(tile.as_rect().rect((1, 1), (2, 2)).is_err());
    }

    #[test]
    fn zip_with_shape_mismatch() {
        let a = Tile::new(2, 2);
        let b = Tile::new(3, 3);
        assert!(a.zip_with(&b, |x, y| x + y).is_err());
    }

    #[test]
    fn map_is_elementwise() {
        let mut tile = Tile::new(2, 2);
        tile.set(0, 0, 2.0);
        let doubled = tile.map(|v| v * 2.0);
        assert_eq!(doubled.get(0, 0), 4.0);
    }
}

// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("kernel width must be odd and non-zero, got {0}")]
    InvalidWidth(usize),
    #[error("kernel weights length {got} does not match width*width = {expected}")]
    ShapeMismatch { got: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

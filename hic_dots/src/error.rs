// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid weights: expected a single per-bin vector or a matching (w_i, w_j) pair")]
    InvalidWeights,
    #[error("invalid kernels: {0}")]
    InvalidKernels(String),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("matrix fetch failed")]
    FetchFailure(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("csv serialization failed")]
    Csv(#[from] csv::Error),
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

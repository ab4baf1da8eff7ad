// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Emitted record types: one pixel row per surviving `(bin1_id, bin2_id)`
//! pair, and one cluster row per accepted pixel after [`crate::cluster`].

use std::io::Write;

use serde::Serialize;

use crate::error::Result;

/// One emitted pixel. `la_exp` carries one `(value, nnans)` pair per kernel,
/// in the same order as the kernel list the engine was run with.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelRecord {
    pub bin1_id: usize,
    pub bin2_id: usize,
    pub obs_raw: f64,
    pub exp_raw: f64,
    pub la_exp: Vec<(f64, f64)>,
}

/// `{cbin1_id, cbin2_id, c_label, c_size}` — the centroid, label, and member
/// count of the cluster a pixel was assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ClusterRecord {
    pub cbin1_id: f64,
    pub cbin2_id: f64,
    pub c_label: usize,
    pub c_size: usize,
}

/// Writes `rows` as tab-separated values with columns
/// `bin1_id, bin2_id, obs.raw, exp.raw, la_exp.<name>.value,
/// la_exp.<name>.nnans` (repeated per kernel name in `kernel_names`),
/// matching the original CLI's column convention.
pub fn write_pixel_table<W: Write>(writer: W, kernel_names: &[String], rows: &[PixelRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);

    let mut header = vec!["bin1_id".to_string(), "bin2_id".to_string(), "obs.raw".to_string(), "exp.raw".to_string()];
    for name in kernel_names {
        header.push(format!("la_exp.{name}.value"));
        header.push(format!("la_exp.{name}.nnans"));
    }
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.bin1_id.to_string(), row.bin2_id.to_string(), row.obs_raw.to_string(), row.exp_raw.to_string()];
        for (value, nnans) in &row.la_exp {
            record.push(value.to_string());
            record.push(nnans.to_string());
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `rows` as tab-separated [`ClusterRecord`]s via `serde`.
pub fn write_cluster_table<W: Write>(writer: W, rows: &[ClusterRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

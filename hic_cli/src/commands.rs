// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The two CLI drivers: `compute-expected` (§6, §12.1) and `call-dots`
//! (§12.2).

use std::io::Write;

use color_eyre::eyre::{Result, WrapErr};
use hic_dots::error::Error;
use hic_dots::expected::{block_mean, diag_mean};
use hic_dots::matrix::ContactStore;
use hic_dots::tile::Tile;
use hic_kernels::Kernel;
use rayon::prelude::*;
use statrs::distribution::{DiscreteCDF, Poisson};

use crate::regions::Region;

/// `--contact-type`.
#[derive(Clone, Copy, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum ContactType {
    Cis,
    Trans,
}

/// One output row of `compute-expected`: grouped by `region` (cis) or
/// `(region1, region2)` (trans), per §6.
pub struct ExpectedRow {
    pub region: String,
    pub region2: Option<String>,
    pub diag: Option<usize>,
    pub balanced_sum: f64,
    pub n_valid: usize,
    pub balanced_avg: f64,
}

/// Multiplies a fetched observed tile by its per-axis balancing weights,
/// element-wise, to recover the balanced matrix the dense reducers in
/// [`hic_dots::expected`] operate on.
fn balance(o_raw: &Tile, w_i: &[f64], w_j: &[f64]) -> Tile {
    let (rows, cols) = o_raw.size();
    let mut out = Tile::new(rows, cols);
    for i in 0..rows {
        for j in 0..cols {
            out.set(i, j, o_raw.get(i, j) * w_i[i] * w_j[j]);
        }
    }
    out
}

/// Runs `compute-expected` over `regions`. `--chunksize` is accepted for
/// interface compatibility with the distilled spec's CLI surface but is a
/// thin pass-through: each region is still fetched from `store` in a
/// single dense call, since the fixture backend has no partial-fetch cost
/// model to amortize (§12.1).
pub fn compute_expected<S: ContactStore + Sync>(
    store: &S,
    contact_type: ContactType,
    drop_diags: usize,
    regions: &[Region],
    nproc: usize,
) -> Result<Vec<ExpectedRow>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(nproc.max(1))
        .build()
        .wrap_err("failed to build rayon thread pool for --nproc")?;

    pool.install(|| -> Result<Vec<ExpectedRow>> {
        match contact_type {
            ContactType::Cis => {
                let rows: Result<Vec<Vec<ExpectedRow>>> = regions
                    .par_iter()
                    .map(|region| cis_region_expected(store, region, drop_diags))
                    .collect();
                Ok(rows?.into_iter().flatten().collect())
            }
            ContactType::Trans => {
                let pairs: Vec<(&Region, &Region)> = regions
                    .iter()
                    .enumerate()
                    .flat_map(|(a, r1)| regions[a + 1..].iter().map(move |r2| (r1, r2)))
                    .collect();
                let rows: Result<Vec<ExpectedRow>> =
                    pairs.par_iter().map(|(r1, r2)| trans_pair_expected(store, r1, r2)).collect();
                rows
            }
        }
    })
}

fn cis_region_expected<S: ContactStore>(store: &S, region: &Region, drop_diags: usize) -> Result<Vec<ExpectedRow>> {
    let (o_raw, _e_bal, weights) = store
        .fetch_balanced(region.range.clone(), region.range.clone())
        .wrap_err_with(|| format!("fetching region {:?}", region.name))?;
    let n = region.range.len();
    let (w_i, w_j) = weights.axis_vectors(n, n).map_err(report_hic_error)?;
    let balanced = balance(&o_raw, w_i, w_j);
    Ok(diag_mean(&balanced, drop_diags)
        .into_iter()
        .map(|stat| ExpectedRow {
            region: region.name.clone(),
            region2: None,
            diag: Some(stat.diag),
            balanced_sum: stat.balanced_sum,
            n_valid: stat.n_valid,
            balanced_avg: stat.balanced_avg,
        })
        .collect())
}

fn trans_pair_expected<S: ContactStore>(store: &S, region1: &Region, region2: &Region) -> Result<ExpectedRow> {
    let (o_raw, _e_bal, weights) = store
        .fetch_balanced(region1.range.clone(), region2.range.clone())
        .wrap_err_with(|| format!("fetching region pair {:?}/{:?}", region1.name, region2.name))?;
    let (w_i, w_j) = weights.axis_vectors(region1.range.len(), region2.range.len()).map_err(report_hic_error)?;
    let balanced = balance(&o_raw, w_i, w_j);
    let (sum, n_valid, avg) = block_mean(&balanced);
    Ok(ExpectedRow {
        region: region1.name.clone(),
        region2: Some(region2.name.clone()),
        diag: None,
        balanced_sum: sum,
        n_valid,
        balanced_avg: avg,
    })
}

fn report_hic_error(e: Error) -> color_eyre::eyre::Report {
    color_eyre::eyre::Report::msg(e.to_string())
}

pub fn write_expected_table<W: Write>(mut writer: W, contact_type: ContactType, rows: &[ExpectedRow]) -> Result<()> {
    match contact_type {
        ContactType::Cis => writeln!(writer, "region\tdiag\tbalanced.sum\tn_valid\tbalanced.avg")?,
        ContactType::Trans => writeln!(writer, "region1\tregion2\tbalanced.sum\tn_valid\tbalanced.avg")?,
    }
    for row in rows {
        match contact_type {
            ContactType::Cis => writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}",
                row.region,
                row.diag.unwrap_or_default(),
                row.balanced_sum,
                row.n_valid,
                row.balanced_avg
            )?,
            ContactType::Trans => writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}",
                row.region,
                row.region2.as_deref().unwrap_or_default(),
                row.balanced_sum,
                row.n_valid,
                row.balanced_avg
            )?,
        }
    }
    Ok(())
}

/// Resolves a comma-separated `--kernels` list into the ordered
/// `(name, Kernel)` list [`hic_dots::engine::TileProcessor`] expects,
/// drawing the shapes from [`hic_kernels::standard`] (§9: kernel list is an
/// ordered `Vec`, not a hash map).
pub fn resolve_kernels(names: &str, width: usize, donut_inner_radius: usize, strip_thickness: usize) -> Result<Vec<(String, Kernel)>> {
    use hic_kernels::standard::{box_kernel, donut, horizontal_strip, identity_center, lowerleft_triangle, vertical_strip};

    names
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| {
            let kernel = match name {
                "donut" => donut(width, donut_inner_radius),
                "vertical" => vertical_strip(width, strip_thickness),
                "horizontal" => horizontal_strip(width, strip_thickness),
                "lowerleft" => lowerleft_triangle(width),
                "box" => box_kernel(width),
                "identity" => identity_center(width),
                other => return Err(color_eyre::eyre::eyre!("unknown kernel name {other:?}")),
            };
            Ok((name.to_string(), kernel))
        })
        .collect()
}

/// Demo-only Poisson significance helper: a two-sided-in-spirit (upper
/// tail, since dot-calling only cares about enrichment) p-value of the
/// observed count against a kernel's locally-adjusted expected, used so
/// `call-dots` is runnable end to end without wiring a real Poisson test
/// collaborator (§1, §12.2: the Poisson test itself is out of scope for
/// the core). Non-finite or non-positive expected values yield `p = 1.0`,
/// matching §7's "never reject on a degenerate input" policy.
pub fn poisson_p_value(observed: f64, la_exp: f64) -> f64 {
    if !la_exp.is_finite() || la_exp <= 0.0 || !observed.is_finite() {
        return 1.0;
    }
    let Ok(dist) = Poisson::new(la_exp) else {
        return 1.0;
    };
    if observed < 1.0 {
        return 1.0;
    }
    dist.sf((observed - 1.0).floor() as u64)
}

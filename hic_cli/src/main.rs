// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};

use hic_cli::commands::{compute_expected, poisson_p_value, resolve_kernels, write_expected_table, ContactType};
use hic_cli::fixture_store::FixtureContactStore;
use hic_cli::regions::load_regions;
use hic_dots::aggregate::{AggregateFilters, Aggregator};
use hic_dots::cluster::Clusterer;
use hic_dots::fdr::benjamini_hochberg;
use hic_dots::matrix::ContactStore;
use hic_dots::pixel::{write_cluster_table, write_pixel_table, ClusterRecord, PixelRecord};
use hic_dots::scheduler::{cancellation_token, run_parallel};
use hic_dots::tile_stream::diagonal_band;

/// Locally-adjusted-expected dot calling over Hi-C contact matrices.
#[derive(Parser)]
#[command(name = "hic_cli", version)]
struct Opt {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Per-diagonal (cis) or per-block (trans) balanced expected, §6/§12.1.
    ComputeExpected {
        /// Path to a fixture store (JSON; not a real .cool file, §1 Non-goals).
        cool_path: PathBuf,

        #[arg(long, default_value_t = 1)]
        nproc: usize,

        /// Accepted for CLI-surface compatibility; a thin pass-through (§12.1).
        #[arg(long, default_value_t = 10_000_000)]
        chunksize: usize,

        #[arg(long, value_enum, default_value = "cis")]
        contact_type: ContactType,

        #[arg(long, default_value_t = 2)]
        drop_diags: usize,

        /// Accepted for CLI-surface compatibility; the fixture store carries
        /// a single weight vector, so multiple named weight columns are not
        /// supported.
        #[arg(long)]
        weight_name: Option<String>,

        #[arg(long)]
        regions: Option<PathBuf>,

        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Runs the full tile-stream -> engine -> aggregate -> FDR -> cluster
    /// pipeline end to end (§12.2).
    CallDots {
        /// Path to a fixture store (JSON; not a real .cool file, §1 Non-goals).
        store: PathBuf,

        #[arg(long, default_value_t = 20)]
        band: usize,

        #[arg(long, default_value_t = 5)]
        edge: usize,

        #[arg(long, default_value = "donut,vertical,horizontal,lowerleft")]
        kernels: String,

        #[arg(long, default_value_t = 7)]
        kernel_width: usize,

        #[arg(long, default_value_t = 2)]
        donut_inner_radius: usize,

        #[arg(long, default_value_t = 1)]
        strip_thickness: usize,

        #[arg(long, default_value_t = 0.1)]
        fdr: f64,

        #[arg(long, default_value_t = 2.0)]
        cluster_radius: f64,

        #[arg(long, default_value_t = 2)]
        diag_min: usize,

        #[arg(long)]
        nnans_cap: Option<f64>,

        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).wrap_err_with(|| format!("creating output file {path:?}"))?,
        )),
        None => Box::new(std::io::stdout()),
    })
}

fn run_compute_expected(
    cool_path: PathBuf,
    nproc: usize,
    contact_type: ContactType,
    drop_diags: usize,
    regions_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let store = FixtureContactStore::load(&cool_path).wrap_err_with(|| format!("loading fixture store {cool_path:?}"))?;
    let regions = load_regions(regions_path.as_deref(), store.len()).wrap_err("loading --regions file")?;
    let rows = compute_expected(&store, contact_type, drop_diags, &regions, nproc)?;
    let writer = open_output(output.as_ref())?;
    write_expected_table(writer, contact_type, &rows)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_call_dots(
    store_path: PathBuf,
    band: usize,
    edge: usize,
    kernels_spec: String,
    kernel_width: usize,
    donut_inner_radius: usize,
    strip_thickness: usize,
    fdr: f64,
    cluster_radius: f64,
    diag_min: usize,
    nnans_cap: Option<f64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let store = FixtureContactStore::load(&store_path).wrap_err_with(|| format!("loading fixture store {store_path:?}"))?;
    let kernels = resolve_kernels(&kernels_spec, kernel_width, donut_inner_radius, strip_thickness)?;
    let kernel_names: Vec<String> = kernels.iter().map(|(n, _)| n.clone()).collect();

    let windows: Vec<_> = diagonal_band(0, store.len(), edge, band).collect();
    tracing::info!(n_tiles = windows.len(), "scheduling diagonal-band tiles");

    let aggregator: Aggregator = run_parallel(&store, windows, std::sync::Arc::new(kernels), 64, cancellation_token())
        .wrap_err("running the tile pipeline")?;
    if aggregator.degenerate_tiles > 0 {
        tracing::warn!(count = aggregator.degenerate_tiles, "tiles with every pixel masked out");
    }
    let rows = aggregator.finish(AggregateFilters { diag_min: Some(diag_min), diag_max: None, nnans_cap });

    let primary_kernel_idx = 0usize;
    let p_values: Vec<f64> = rows
        .iter()
        .map(|r| poisson_p_value(r.obs_raw, r.la_exp[primary_kernel_idx].0))
        .collect();
    let bh = benjamini_hochberg(&p_values, fdr);

    let accepted: Vec<&PixelRecord> = rows.iter().zip(bh.reject.iter()).filter(|(_, &r)| r).map(|(row, _)| row).collect();
    let points: Vec<(usize, usize)> = accepted.iter().map(|r| (r.bin1_id, r.bin2_id)).collect();
    let clusters: Vec<ClusterRecord> = Clusterer::new(cluster_radius).cluster(&points);
    let n_clusters = clusters.iter().map(|c| c.c_label).max().map(|m| m + 1).unwrap_or(0);

    tracing::info!(n_pixels = rows.len(), n_accepted = accepted.len(), n_clusters, "call-dots finished");

    let mut writer = open_output(output.as_ref())?;
    writeln!(writer, "# {} pixels, {} FDR-accepted, {} clusters", rows.len(), accepted.len(), n_clusters)?;
    let accepted_owned: Vec<PixelRecord> = accepted.into_iter().cloned().collect();
    write_pixel_table(&mut writer, &kernel_names, &accepted_owned)?;
    if !clusters.is_empty() {
        write_cluster_table(&mut writer, &clusters)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    match opt.command {
        Command::ComputeExpected { cool_path, nproc, chunksize: _, contact_type, drop_diags, weight_name: _, regions, output } => {
            run_compute_expected(cool_path, nproc, contact_type, drop_diags, regions, output)
        }
        Command::CallDots {
            store,
            band,
            edge,
            kernels,
            kernel_width,
            donut_inner_radius,
            strip_thickness,
            fdr,
            cluster_radius,
            diag_min,
            nnans_cap,
            output,
        } => run_call_dots(store, band, edge, kernels, kernel_width, donut_inner_radius, strip_thickness, fdr, cluster_radius, diag_min, nnans_cap, output),
    }
}

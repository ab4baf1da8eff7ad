// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Data-parallel tile dispatch (feature `parallel`).
//!
//! Tiles are independent units of work; a `rayon` worker pool processes
//! them concurrently and sends results to a single aggregating consumer
//! over a bounded channel, mirroring the `par_iter` producer / single-sink
//! consumer shape used for per-group decoding in the teacher crate's
//! render pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hic_kernels::Kernel;
use rayon::prelude::*;

use crate::aggregate::Aggregator;
use crate::engine::TileProcessor;
use crate::error::Result;
use crate::matrix::ContactStore;
use crate::tile_stream::TileWindow;

/// Shared cancellation flag: set it to stop new tile fetches. In-flight
/// tiles finish or are discarded; partial results are never emitted.
pub type CancellationToken = Arc<AtomicBool>;

pub fn cancellation_token() -> CancellationToken {
    Arc::new(AtomicBool::new(false))
}

fn process_one_tile<S: ContactStore + Sync>(
    store: &S,
    window: &TileWindow,
    kernels: &[(String, Kernel)],
) -> Result<crate::engine::TileOutput> {
    let (o_raw, e_bal, weights) = store.fetch_balanced(window.row_start..window.row_stop, window.col_start..window.col_stop)?;
    TileProcessor::process((window.row_start, window.col_start), &o_raw, &e_bal, &weights, kernels)
}

/// Runs `windows` against `store` in parallel, returning an [`Aggregator`]
/// holding every non-cancelled tile's rows. The channel between workers and
/// the aggregating consumer has capacity `channel_capacity`, bounding how
/// far producers can run ahead of the consumer (backpressure).
pub fn run_parallel<S: ContactStore + Sync>(
    store: &S,
    windows: Vec<TileWindow>,
    kernels: Arc<Vec<(String, Kernel)>>,
    channel_capacity: usize,
    cancelled: CancellationToken,
) -> Result<Aggregator> {
    let (tx, rx) = std::sync::mpsc::sync_channel(channel_capacity.max(1));

    std::thread::scope(|scope| {
        let kernels = kernels.clone();
        let cancelled_producer = cancelled.clone();
        scope.spawn(move || {
            windows.par_iter().for_each_with(tx, |tx, window| {
                if cancelled_producer.load(Ordering::Relaxed) {
                    return;
                }
                #[cfg(feature = "tracing")]
                let _span = tracing::debug_span!("scheduled_tile", row = window.row_start, col = window.col_start).entered();
                let result = process_one_tile(store, window, &kernels);
                let _ = tx.send(result);
            });
        });

        let mut aggregator = Aggregator::new();
        for message in rx {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let output = message?;
            aggregator.push_tile(output.rows, output.degenerate);
        }
        Ok(aggregator)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tile::Tile;
    use crate::weights::Weights;
    use hic_kernels::standard::identity_center;

    struct ConstStore {
        n: usize,
    }

    impl ContactStore for ConstStore {
        fn fetch_balanced(
            &self,
            row_range: std::ops::Range<usize>,
            col_range: std::ops::Range<usize>,
        ) -> Result<(Tile, Tile, Weights)> {
            let rows = row_range.len();
            let cols = col_range.len();
            let o_raw = Tile::from_vec(rows, cols, vec![1.0; rows * cols])?;
            let e_bal = Tile::from_vec(rows, cols, vec![1.0; rows * cols])?;
            let weights = Weights::Asymmetric(vec![1.0; rows], vec![1.0; cols]);
            Ok((o_raw, e_bal, weights))
        }

        fn len(&self) -> usize {
            self.n
        }
    }

    #[test]
    fn runs_all_windows_and_aggregates() {
        let store = ConstStore { n: 40 };
        let windows: Vec<_> = crate::tile_stream::diagonal_band(0, 40, 1, 8).collect();
        let kernels = Arc::new(vec![("identity".to_string(), identity_center(1))]);
        let aggregator = run_parallel(&store, windows, kernels, 4, cancellation_token()).unwrap();
        let rows = aggregator.finish(crate::aggregate::AggregateFilters::default());
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.bin1_id < r.bin2_id));
    }

    #[test]
    fn cancellation_short_circuits_before_finish() {
        let store = ConstStore { n: 40 };
        let windows: Vec<_> = crate::tile_stream::diagonal_band(0, 40, 1, 8).collect();
        let kernels = Arc::new(vec![("identity".to_string(), identity_center(1))]);
        let token = cancellation_token();
        token.store(true, Ordering::Relaxed);
        let aggregator = run_parallel(&store, windows, kernels, 4, token).unwrap();
        let rows = aggregator.finish(crate::aggregate::AggregateFilters::default());
        assert!(rows.is_empty());
    }
}

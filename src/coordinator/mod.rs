//! Coordinator module
//!
//! Orchestrates workers and aggregates results.
//!
//! [`run`] partitions the transfer, starts one OS thread per worker, and
//! joins every one of them before looking at any result. A failing worker
//! never cancels its siblings: each range is copied (or fails) independently,
//! which surfaces as much diagnostic information as possible. Workers share
//! only the immutable configuration.
//!
//! # Example
//!
//! ```no_run
//! use blockperf::config::TransferConfig;
//! use blockperf::coordinator;
//!
//! let mut config = TransferConfig::new("/dev/sda", "/dev/sdb", 10 << 30);
//! config.workers = 8;
//! config.source_direct = true;
//! config.target_direct = true;
//!
//! let report = coordinator::run(&config)?;
//! println!("success: {}", report.is_success());
//! # Ok::<(), blockperf::CopyError>(())
//! ```

pub mod partition;

use crate::config::TransferConfig;
use crate::error::CopyError;
use crate::stats::aggregator::{StatisticsAggregator, TransferReport};
use crate::util::time::Timestamp;
use crate::worker::{CopyWorker, WorkerResult};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Run a transfer and collect the results of all workers
///
/// # Errors
///
/// Returns an error only for orchestration faults: a worker thread could not
/// be spawned, or a worker thread panicked. Workers that were already started
/// are joined before the error is returned. Copy failures are not errors
/// here; they are reported in [`TransferReport::outcome`].
pub fn run(config: &TransferConfig) -> Result<TransferReport, CopyError> {
    let config = Arc::new(config.clone());
    let assignments = partition::partition(&config);

    tracing::info!(
        workers = assignments.len(),
        idle = assignments.iter().filter(|a| a.is_empty()).count(),
        total_size = config.total_size,
        "starting transfer"
    );

    let start = Timestamp::now();

    let mut handles: Vec<(usize, JoinHandle<WorkerResult>)> = Vec::with_capacity(assignments.len());
    let mut spawn_error = None;

    for (id, assignment) in assignments.into_iter().enumerate() {
        let worker = CopyWorker::new(id, Arc::clone(&config), assignment);
        let spawned = thread::Builder::new()
            .name(format!("copy-worker-{}", worker.id()))
            .spawn(move || worker.run());

        match spawned {
            Ok(handle) => handles.push((id, handle)),
            Err(source) => {
                tracing::error!("failed to spawn worker thread {}: {}", id, source);
                spawn_error = Some(CopyError::SpawnFailure { worker: id, source });
                break;
            }
        }
    }

    // Wait for all workers to complete
    let mut aggregator = StatisticsAggregator::new();
    let mut panicked = None;
    for (id, handle) in handles {
        match handle.join() {
            Ok(result) => aggregator.add_worker(result),
            Err(_) => {
                tracing::error!("worker thread {} panicked", id);
                panicked.get_or_insert(id);
            }
        }
    }

    let stop = Timestamp::now();

    if let Some(err) = spawn_error {
        return Err(err);
    }
    if let Some(id) = panicked {
        return Err(CopyError::WorkerPanicked(id));
    }

    let total_elapsed = stop.duration_since(start)?;
    let report = aggregator.finish(config.total_size, total_elapsed);

    match report.aggregate() {
        Some(aggregate) => tracing::info!(
            elapsed_s = total_elapsed.as_secs_f64(),
            throughput = aggregate.total_throughput,
            "transfer finished"
        ),
        None => tracing::warn!(failed = ?report.failed_workers(), "transfer failed"),
    }

    Ok(report)
}

//! Result aggregation
//!
//! Collects the [`WorkerResult`] of every joined worker and reduces them into
//! a [`TransferReport`]: per-worker throughput plus, when every worker
//! succeeded, the aggregate throughput over the global wall-clock interval.
//!
//! A single failed worker makes the whole transfer a failure. In that case no
//! aggregate throughput is computed, but every worker's individual outcome is
//! still kept in the report.
//!
//! # Example
//!
//! ```
//! use blockperf::coordinator::partition::WorkerAssignment;
//! use blockperf::stats::{CopyCounters, WorkerStats};
//! use blockperf::stats::aggregator::StatisticsAggregator;
//! use blockperf::worker::WorkerResult;
//! use std::time::Duration;
//!
//! let mut aggregator = StatisticsAggregator::new();
//! aggregator.add_worker(WorkerResult {
//!     worker: 0,
//!     assignment: WorkerAssignment { size: 1024, skip: 0, seek: 0 },
//!     outcome: Ok(WorkerStats {
//!         elapsed: Duration::from_secs(1),
//!         counters: CopyCounters { blocks_written: 1, blocks_skipped: 0, bytes_copied: 1024 },
//!     }),
//! });
//!
//! let report = aggregator.finish(1024, Duration::from_secs(2));
//! assert!(report.is_success());
//! assert_eq!(report.aggregate().unwrap().total_throughput, 512.0);
//! ```

use crate::stats::CopyCounters;
use crate::util::time::calculate_throughput;
use crate::worker::WorkerResult;
use std::time::Duration;

/// Aggregate figures of a fully successful transfer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateStats {
    /// Bytes per second over the global elapsed time (0.0 if undefined)
    pub total_throughput: f64,
    pub counters: CopyCounters,
}

/// Overall outcome of a transfer
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(AggregateStats),
    /// The lowest-indexed failed worker and its reason
    Failure { worker: usize, reason: String },
}

/// Everything a presentation layer needs about one transfer
#[derive(Debug)]
pub struct TransferReport {
    pub total_size: u64,
    /// Time from before the first spawn to after the last join
    pub total_elapsed: Duration,
    /// Per-worker results ordered by worker index
    pub workers: Vec<WorkerResult>,
    pub outcome: Outcome,
}

impl TransferReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn aggregate(&self) -> Option<&AggregateStats> {
        match &self.outcome {
            Outcome::Success(stats) => Some(stats),
            Outcome::Failure { .. } => None,
        }
    }

    /// Indices of every failed worker
    pub fn failed_workers(&self) -> Vec<usize> {
        self.workers
            .iter()
            .filter(|w| w.outcome.is_err())
            .map(|w| w.worker)
            .collect()
    }
}

/// Collector for worker results
#[derive(Debug, Default)]
pub struct StatisticsAggregator {
    workers: Vec<WorkerResult>,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the result of a joined worker
    pub fn add_worker(&mut self, result: WorkerResult) {
        self.workers.push(result);
    }

    /// Sum of the counters of all successful workers
    pub fn totals(&self) -> CopyCounters {
        let mut totals = CopyCounters::default();
        for stats in self.workers.iter().filter_map(|w| w.outcome.as_ref().ok()) {
            totals.merge(&stats.counters);
        }
        totals
    }

    /// Reduce the collected results into a report
    ///
    /// # Arguments
    ///
    /// * `total_size` - Bytes the whole transfer was asked to copy
    /// * `total_elapsed` - Global wall-clock interval of the transfer
    pub fn finish(mut self, total_size: u64, total_elapsed: Duration) -> TransferReport {
        self.workers.sort_by_key(|w| w.worker);

        let first_failure = self.workers.iter().find_map(|w| {
            w.outcome
                .as_ref()
                .err()
                .map(|e| (w.worker, e.to_string()))
        });

        let outcome = match first_failure {
            Some((worker, reason)) => Outcome::Failure { worker, reason },
            None => Outcome::Success(AggregateStats {
                total_throughput: calculate_throughput(total_size, total_elapsed),
                counters: self.totals(),
            }),
        };

        TransferReport {
            total_size,
            total_elapsed,
            workers: self.workers,
            outcome,
        }
    }
}

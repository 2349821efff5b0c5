//! Per-worker transfer statistics
//!
//! Every worker owns its counters exclusively while it runs. Nothing is shared
//! between workers during the copy; the orchestrator merges counters only
//! after every worker thread has been joined (see [`aggregator`]).

pub mod aggregator;

use crate::util::time::calculate_throughput;
use std::time::Duration;

/// Block counters accumulated by the copy loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyCounters {
    /// Successful write calls
    pub blocks_written: u64,
    /// All-zero blocks seeked over instead of written
    pub blocks_skipped: u64,
    /// Bytes consumed from the source
    pub bytes_copied: u64,
}

impl CopyCounters {
    /// Merge counters from another worker into this one
    pub fn merge(&mut self, other: &CopyCounters) {
        self.blocks_written += other.blocks_written;
        self.blocks_skipped += other.blocks_skipped;
        self.bytes_copied += other.bytes_copied;
    }
}

/// Statistics of a successfully completed worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    /// Time from the first seek to after both files were closed
    pub elapsed: Duration,
    pub counters: CopyCounters,
}

impl WorkerStats {
    pub fn blocks_written(&self) -> u64 {
        self.counters.blocks_written
    }

    pub fn blocks_skipped(&self) -> u64 {
        self.counters.blocks_skipped
    }

    pub fn bytes_copied(&self) -> u64 {
        self.counters.bytes_copied
    }

    /// Bytes per second for `bytes` over this worker's elapsed time
    pub fn throughput(&self, bytes: u64) -> f64 {
        calculate_throughput(bytes, self.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_merge() {
        let mut total = CopyCounters::default();
        total.merge(&CopyCounters {
            blocks_written: 3,
            blocks_skipped: 1,
            bytes_copied: 4096,
        });
        total.merge(&CopyCounters {
            blocks_written: 2,
            blocks_skipped: 0,
            bytes_copied: 1024,
        });
        assert_eq!(total.blocks_written, 5);
        assert_eq!(total.blocks_skipped, 1);
        assert_eq!(total.bytes_copied, 5120);
    }

    #[test]
    fn test_worker_throughput() {
        let stats = WorkerStats {
            elapsed: Duration::from_secs(2),
            counters: CopyCounters::default(),
        };
        assert_eq!(stats.throughput(4 * 1024 * 1024), 2.0 * 1024.0 * 1024.0);
    }

    #[test]
    fn test_worker_throughput_zero_elapsed() {
        let stats = WorkerStats {
            elapsed: Duration::ZERO,
            counters: CopyCounters::default(),
        };
        assert_eq!(stats.throughput(4096), 0.0);
    }
}

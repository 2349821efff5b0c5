//! Range partitioning
//!
//! Splits a transfer into one contiguous sub-range per worker. Every range
//! except possibly the last non-empty one is a whole number of blocks, so
//! each worker's offsets stay aligned for O_DIRECT as long as the global
//! skip/seek are. Workers beyond the end of the transfer get an empty range.

use crate::config::TransferConfig;
use serde::{Deserialize, Serialize};

/// The slice of the transfer owned by one worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerAssignment {
    /// Bytes this worker must copy
    pub size: u64,
    /// Absolute source offset
    pub skip: u64,
    /// Absolute target offset
    pub seek: u64,
}

impl WorkerAssignment {
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Nominal bytes per worker, rounded up to the next whole block
///
/// Computed as `(total + workers) / workers`, plus one block, truncated to a
/// block multiple. When the quotient is already block-aligned this yields one
/// extra block; the last worker absorbs the difference.
pub fn per_worker_size(total_size: u64, workers: u32, block_size: u64) -> u64 {
    let workers = u64::from(workers.max(1));
    let share = total_size.saturating_add(workers) / workers;
    let padded = share.saturating_add(block_size);
    padded - padded % block_size
}

/// Partition a configured transfer
pub fn partition(config: &TransferConfig) -> Vec<WorkerAssignment> {
    partition_range(
        config.total_size,
        config.workers,
        config.skip,
        config.seek,
        config.block_size,
    )
}

/// Partition `total_size` bytes starting at `skip`/`seek` into `workers` ranges
pub fn partition_range(
    total_size: u64,
    workers: u32,
    skip: u64,
    seek: u64,
    block_size: u64,
) -> Vec<WorkerAssignment> {
    debug_assert!(workers >= 1, "at least one worker is required");
    let per_worker = per_worker_size(total_size, workers, block_size);

    let mut assigned = 0u64;
    (0..workers.max(1))
        .map(|_| {
            let size = per_worker.min(total_size - assigned);
            let assignment = WorkerAssignment {
                size,
                skip: skip + assigned,
                seek: seek + assigned,
            };
            assigned += size;
            assignment
        })
        .collect()
}

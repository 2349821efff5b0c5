//! blockperf - Parallel block device copy and throughput measurement
//!
//! Copies a byte range from a source file or block device to a target using
//! several worker threads, each owning a contiguous, block-aligned slice of the
//! range. Every worker reports its own elapsed time and throughput; when all
//! workers succeed, the aggregate throughput over the whole transfer is
//! reported as well.
//!
//! # Architecture
//!
//! - **config**: CLI arguments, TOML job files and validation
//! - **coordinator**: range partitioning, thread spawning and joining
//! - **worker**: the per-range copy loop with aligned buffers and sparse skip
//! - **engine**: EINTR-safe read/write/seek primitives
//! - **stats**: per-worker counters and result aggregation
//! - **output**: text and JSON presentation

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod output;
pub mod stats;
pub mod target;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::TransferConfig;
pub use error::CopyError;
pub use stats::aggregator::TransferReport;

/// Result type used by the configuration and presentation layers
pub type Result<T> = anyhow::Result<T>;

//! Error types for the copy engine
//!
//! Every variant is terminal for the worker that produces it. The only
//! condition that is retried is an interrupted syscall (`EINTR`), which the
//! IO primitives in [`crate::engine`] absorb before an error is ever built.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which side of the transfer an operation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Target => write!(f, "target"),
        }
    }
}

/// Failure of a copy worker or of the orchestration around it
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("cannot open {side} `{}': {source}", path.display())]
    OpenFailure {
        side: Side,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to seek in {side} to offset {offset}: {source}")]
    SeekFailure {
        side: Side,
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("read failed at source offset {offset}: {reason}")]
    ReadFailure { offset: u64, reason: String },

    #[error("write failed at target offset {offset}: {reason}")]
    WriteFailure { offset: u64, reason: String },

    #[error("failed to retrieve time: {0}")]
    TimingFailure(String),

    #[error("cannot allocate {bytes} byte buffer")]
    AllocationFailure { bytes: usize },

    #[error("failed to spawn worker thread {worker}: {source}")]
    SpawnFailure {
        worker: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker thread {0} panicked")]
    WorkerPanicked(usize),
}

impl CopyError {
    pub(crate) fn read(offset: u64, err: io::Error) -> Self {
        CopyError::ReadFailure {
            offset,
            reason: err.to_string(),
        }
    }

    pub(crate) fn write(offset: u64, err: io::Error) -> Self {
        CopyError::WriteFailure {
            offset,
            reason: err.to_string(),
        }
    }

    /// Short machine-friendly name of the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            CopyError::OpenFailure { .. } => "open",
            CopyError::SeekFailure { .. } => "seek",
            CopyError::ReadFailure { .. } => "read",
            CopyError::WriteFailure { .. } => "write",
            CopyError::TimingFailure(_) => "timing",
            CopyError::AllocationFailure { .. } => "allocation",
            CopyError::SpawnFailure { .. } => "spawn",
            CopyError::WorkerPanicked(_) => "panic",
        }
    }
}

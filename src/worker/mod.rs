//! Copy worker implementation
//!
//! A worker is the execution unit of a transfer. It owns one aligned buffer,
//! one source/target descriptor pair and one [`WorkerAssignment`], and copies
//! its range block by block:
//!
//! ```text
//! Init -> Opening -> Running -> Closing -> Succeeded
//!    \________\__________\__________\____> Failed
//! ```
//!
//! Every block is read from the source into the aligned buffer. An all-zero
//! block is not written; the target offset is advanced past it instead
//! (sparse-skip). This assumes the target already reads as zero there and is
//! not verified, so copying onto a target with stale data can leave that
//! data in place. Set `sparse_skip = false` to always write.
//!
//! The measured interval starts just before the initial repositioning and
//! ends after both descriptors are closed, so any flush latency the OS incurs
//! on close is included.
//!
//! Descriptors and the buffer are scoped values. Whatever state a failure
//! happens in, they are released when `execute` returns.

use crate::config::TransferConfig;
use crate::coordinator::partition::WorkerAssignment;
use crate::engine;
use crate::error::{CopyError, Side};
use crate::stats::{CopyCounters, WorkerStats};
use crate::target;
use crate::util::buffer::AlignedBuffer;
use crate::util::time::Timestamp;
use crate::util::zero::is_all_zero;
use std::fmt;
use std::io::{Read, Seek, Write};
use std::sync::Arc;

/// Lifecycle state of a copy worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Init,
    Opening,
    Running,
    Closing,
    Succeeded,
    Failed,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Init => "init",
            WorkerState::Opening => "opening",
            WorkerState::Running => "running",
            WorkerState::Closing => "closing",
            WorkerState::Succeeded => "succeeded",
            WorkerState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of one worker, produced once when it exits
#[derive(Debug)]
pub struct WorkerResult {
    /// Worker index
    pub worker: usize,
    pub assignment: WorkerAssignment,
    pub outcome: Result<WorkerStats, CopyError>,
}

impl WorkerResult {
    /// Assigned bytes per second of worker time, if the worker succeeded
    pub fn throughput(&self) -> Option<f64> {
        self.outcome
            .as_ref()
            .ok()
            .map(|stats| stats.throughput(self.assignment.size))
    }
}

/// Copies one contiguous range of the transfer
pub struct CopyWorker {
    id: usize,
    config: Arc<TransferConfig>,
    assignment: WorkerAssignment,
    state: WorkerState,
}

impl CopyWorker {
    pub fn new(id: usize, config: Arc<TransferConfig>, assignment: WorkerAssignment) -> Self {
        Self {
            id,
            config,
            assignment,
            state: WorkerState::Init,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Run the worker to completion or failure
    ///
    /// Never panics on IO problems; every failure ends up in the returned
    /// result's `outcome`.
    pub fn run(mut self) -> WorkerResult {
        let span = tracing::info_span!("worker", id = self.id);
        let _guard = span.enter();

        let outcome = self.execute();
        match &outcome {
            Ok(stats) => {
                self.transition(WorkerState::Succeeded);
                tracing::info!(
                    elapsed_s = stats.elapsed.as_secs_f64(),
                    written = stats.blocks_written(),
                    skipped = stats.blocks_skipped(),
                    "worker finished"
                );
            }
            Err(e) => {
                self.transition(WorkerState::Failed);
                tracing::error!("worker failed: {}", e);
            }
        }

        WorkerResult {
            worker: self.id,
            assignment: self.assignment,
            outcome,
        }
    }

    fn transition(&mut self, next: WorkerState) {
        tracing::debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
    }

    fn execute(&mut self) -> Result<WorkerStats, CopyError> {
        self.transition(WorkerState::Opening);
        let mut source = target::open_source(&self.config.source, self.config.source_flags())?;
        let mut target = target::open_target(&self.config.target, self.config.target_flags())?;

        // block_size was validated to fit in usize
        let mut buffer = AlignedBuffer::new(self.config.block_size as usize)?;
        debug_assert!(buffer.is_aligned());

        let start = Timestamp::now();

        if self.assignment.skip != 0 {
            engine::seek_to(&mut source, self.assignment.skip).map_err(|e| CopyError::SeekFailure {
                side: Side::Source,
                offset: self.assignment.skip,
                source: e,
            })?;
        }
        if self.assignment.seek != 0 {
            engine::seek_to(&mut target, self.assignment.seek).map_err(|e| CopyError::SeekFailure {
                side: Side::Target,
                offset: self.assignment.seek,
                source: e,
            })?;
        }

        self.transition(WorkerState::Running);
        tracing::debug!(
            size = self.assignment.size,
            skip = self.assignment.skip,
            seek = self.assignment.seek,
            "copying range"
        );
        let counters = copy_range(
            &mut source,
            &mut target,
            buffer.as_mut_slice(),
            &self.assignment,
            self.config.sparse_skip,
        )?;

        self.transition(WorkerState::Closing);
        drop(target);
        drop(source);
        drop(buffer);

        let elapsed = Timestamp::now().duration_since(start)?;

        Ok(WorkerStats { elapsed, counters })
    }
}

/// Copy `range.size` bytes from the current source position to the current
/// target position, one `buf`-sized block at a time
///
/// `range.skip`/`range.seek` are only used to report offsets in errors; the
/// caller positions both files beforehand.
pub fn copy_range<R, W>(
    source: &mut R,
    target: &mut W,
    buf: &mut [u8],
    range: &WorkerAssignment,
    sparse_skip: bool,
) -> Result<CopyCounters, CopyError>
where
    R: Read + ?Sized,
    W: Write + Seek + ?Sized,
{
    let mut counters = CopyCounters::default();
    let block_size = buf.len() as u64;

    loop {
        let remaining = range.size - counters.bytes_copied;
        let to_read = remaining.min(block_size) as usize;
        if to_read == 0 {
            break;
        }

        let src_offset = range.skip + counters.bytes_copied;
        let dst_offset = range.seek + counters.bytes_copied;

        let read = engine::read_retrying(source, &mut buf[..to_read])
            .map_err(|e| CopyError::read(src_offset, e))?;

        if read == 0 {
            return Err(CopyError::ReadFailure {
                offset: src_offset,
                reason: "no more data available".to_string(),
            });
        }

        if read < to_read {
            tracing::info!("read only {}% of requested size", 100 * read / to_read);
        }

        let block = &buf[..read];
        if sparse_skip && is_all_zero(block) {
            engine::skip_forward(target, read as u64).map_err(|e| CopyError::SeekFailure {
                side: Side::Target,
                offset: dst_offset + read as u64,
                source: e,
            })?;
            counters.blocks_skipped += 1;
        } else {
            counters.blocks_written +=
                engine::write_counted(target, block).map_err(|e| CopyError::write(dst_offset, e))?;
        }

        counters.bytes_copied += read as u64;
    }

    Ok(counters)
}

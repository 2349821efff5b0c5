//! Timing and throughput utilities
//!
//! All measurements use `std::time::Instant`, which is monotonic and immune
//! to wall-clock adjustments.

use crate::error::CopyError;
use std::time::{Duration, Instant};

/// Monotonic timestamp used to bracket a transfer
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    instant: Instant,
}

impl Timestamp {
    /// Create a new timestamp representing the current time
    #[inline]
    pub fn now() -> Self {
        Self {
            instant: Instant::now(),
        }
    }

    /// Get the duration between this timestamp and an earlier one
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::TimingFailure`] if `earlier` is actually later,
    /// which a monotonic clock must never report.
    #[inline]
    pub fn duration_since(&self, earlier: Timestamp) -> Result<Duration, CopyError> {
        self.instant
            .checked_duration_since(earlier.instant)
            .ok_or_else(|| CopyError::TimingFailure("monotonic clock went backwards".to_string()))
    }
}

/// Calculate throughput from bytes transferred and duration
///
/// Returns bytes per second. A zero duration yields 0.0 rather than infinity,
/// and so does a zero byte count.
pub fn calculate_throughput(bytes: u64, duration: Duration) -> f64 {
    let seconds = duration.as_secs_f64();
    if seconds > 0.0 {
        bytes as f64 / seconds
    } else {
        0.0
    }
}

/// Format a byte count with binary units
///
/// # Examples
///
/// ```
/// use blockperf::util::time::format_size;
///
/// assert_eq!(format_size(512.0), "512B");
/// assert_eq!(format_size(1536.0), "1.50KiB");
/// assert_eq!(format_size(3.0 * 1024.0 * 1024.0), "3.00MiB");
/// ```
pub fn format_size(size: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;
    const TIB: f64 = GIB * 1024.0;

    if size >= TIB {
        format!("{:.2}TiB", size / TIB)
    } else if size >= GIB {
        format!("{:.2}GiB", size / GIB)
    } else if size >= MIB {
        format!("{:.2}MiB", size / MIB)
    } else if size >= KIB {
        format!("{:.2}KiB", size / KIB)
    } else {
        format!("{:.0}B", size)
    }
}

/// Format throughput in human-readable form (B/s, KiB/s, ...)
///
/// # Examples
///
/// ```
/// use blockperf::util::time::format_throughput;
///
/// assert_eq!(format_throughput(2_621_440.0), "2.50MiB/s");
/// ```
pub fn format_throughput(bytes_per_sec: f64) -> String {
    format!("{}/s", format_size(bytes_per_sec))
}

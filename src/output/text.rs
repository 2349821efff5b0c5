//! Human-readable text output

use crate::stats::aggregator::{Outcome, TransferReport};
use crate::util::time::format_throughput;
use std::fmt::Write;

/// Render the per-worker and total result lines
///
/// One line per worker, successful or not, followed by either the total line
/// or the failure summary.
pub fn render_results(report: &TransferReport) -> String {
    let mut out = String::new();

    for w in &report.workers {
        match &w.outcome {
            Ok(stats) => {
                let _ = writeln!(
                    out,
                    "Worker {}: time: {:.4}, throughput: {}, written: {} blocks, skipped: {} blocks",
                    w.worker,
                    stats.elapsed.as_secs_f64(),
                    format_throughput(w.throughput().unwrap_or_default()),
                    stats.blocks_written(),
                    stats.blocks_skipped(),
                );
            }
            Err(e) => {
                let _ = writeln!(out, "Worker {} failed: {}", w.worker, e);
            }
        }
    }

    match &report.outcome {
        Outcome::Success(aggregate) => {
            let _ = writeln!(
                out,
                "total time: {:.4}, total throughput: {}",
                report.total_elapsed.as_secs_f64(),
                format_throughput(aggregate.total_throughput),
            );
        }
        Outcome::Failure { worker, .. } => {
            let _ = writeln!(out, "Worker thread {} failed.", worker);
        }
    }

    out
}

/// Print transfer results to console
pub fn print_results(report: &TransferReport) {
    print!("{}", render_results(report));
}

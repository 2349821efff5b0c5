//! JSON report output
//!
//! Serializes a finished transfer (configuration, per-worker results and the
//! aggregate) into a single JSON document, for post-processing by scripts.

use crate::config::TransferConfig;
use crate::coordinator::partition::WorkerAssignment;
use crate::stats::aggregator::{Outcome, TransferReport};
use crate::util::time::format_throughput;
use crate::worker::WorkerResult;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Duration with both seconds and microseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDuration {
    pub seconds: f64,
    pub micros: u64,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            seconds: d.as_secs_f64(),
            micros: u64::try_from(d.as_micros()).unwrap_or(u64::MAX),
        }
    }
}

/// Throughput with bytes/sec and human-readable format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonThroughput {
    pub bytes_per_sec: f64,
    pub human: String,
}

impl JsonThroughput {
    pub fn new(bytes_per_sec: f64) -> Self {
        Self {
            bytes_per_sec,
            human: format_throughput(bytes_per_sec),
        }
    }
}

/// Per-worker entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonWorker {
    pub worker: usize,
    pub assignment: WorkerAssignment,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<JsonDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput: Option<JsonThroughput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks_written: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks_skipped: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&WorkerResult> for JsonWorker {
    fn from(w: &WorkerResult) -> Self {
        match &w.outcome {
            Ok(stats) => JsonWorker {
                worker: w.worker,
                assignment: w.assignment,
                success: true,
                elapsed: Some(JsonDuration::from_duration(stats.elapsed)),
                throughput: w.throughput().map(JsonThroughput::new),
                blocks_written: Some(stats.blocks_written()),
                blocks_skipped: Some(stats.blocks_skipped()),
                error_kind: None,
                error: None,
            },
            Err(e) => JsonWorker {
                worker: w.worker,
                assignment: w.assignment,
                success: false,
                elapsed: None,
                throughput: None,
                blocks_written: None,
                blocks_skipped: None,
                error_kind: Some(e.kind().to_string()),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Complete JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub tool: String,
    pub version: String,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub config: TransferConfig,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_worker: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub total_elapsed: JsonDuration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_throughput: Option<JsonThroughput>,
    pub workers: Vec<JsonWorker>,
}

/// Build the JSON representation of a report
pub fn build_report(config: &TransferConfig, report: &TransferReport) -> JsonReport {
    let (failed_worker, failure_reason, total_throughput) = match &report.outcome {
        Outcome::Success(aggregate) => (None, None, Some(JsonThroughput::new(aggregate.total_throughput))),
        Outcome::Failure { worker, reason } => (Some(*worker), Some(reason.clone()), None),
    };

    JsonReport {
        tool: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: chrono::Local::now().to_rfc3339(),
        host: hostname::get().ok().map(|h| h.to_string_lossy().into_owned()),
        config: config.clone(),
        success: report.is_success(),
        failed_worker,
        failure_reason,
        total_elapsed: JsonDuration::from_duration(report.total_elapsed),
        total_throughput,
        workers: report.workers.iter().map(JsonWorker::from).collect(),
    }
}

/// Write JSON report to file
pub fn write_json_output(output_path: &Path, config: &TransferConfig, report: &TransferReport) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output: {}", output_path.display()))?;

    serde_json::to_writer_pretty(file, &build_report(config, report))
        .with_context(|| format!("Failed to write JSON output: {}", output_path.display()))?;

    Ok(())
}

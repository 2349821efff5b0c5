//! Configuration module
//!
//! Handles CLI argument parsing, TOML job files, and validation. A
//! [`JobConfig`] holds the raw, possibly partial settings from either source;
//! [`JobConfig::resolve`] turns it into the immutable [`TransferConfig`] that
//! the copy engine runs from.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::target::{self, OpenFlags};
use crate::util::time::format_size;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// IO block size used for every read/write, alignment and partition rounding
pub const BLOCK_SIZE: u64 = 1024 * 1024;

/// Upper bound on the number of worker threads
pub const MAX_WORKERS: u32 = 256;

/// How to decide whether a side is opened with O_DIRECT
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectMode {
    /// Direct IO for block devices, buffered IO for everything else
    #[default]
    Auto,
    Always,
    Never,
}

/// Validated, immutable description of one transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferConfig {
    pub source: PathBuf,
    pub target: PathBuf,
    pub source_direct: bool,
    pub target_direct: bool,
    /// Total number of bytes to copy
    pub total_size: u64,
    /// Number of worker threads (1-256)
    pub workers: u32,
    /// Source offset where the transfer starts
    pub skip: u64,
    /// Target offset where the transfer starts
    pub seek: u64,
    pub block_size: u64,
    /// Seek over all-zero source blocks instead of writing them
    pub sparse_skip: bool,
}

impl TransferConfig {
    /// Single-worker, buffered, offset-free transfer with default block size
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>, total_size: u64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_direct: false,
            target_direct: false,
            total_size,
            workers: 1,
            skip: 0,
            seek: 0,
            block_size: BLOCK_SIZE,
            sparse_skip: true,
        }
    }

    pub fn source_flags(&self) -> OpenFlags {
        OpenFlags {
            direct: self.source_direct,
        }
    }

    pub fn target_flags(&self) -> OpenFlags {
        OpenFlags {
            direct: self.target_direct,
        }
    }
}

impl fmt::Display for TransferConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} (skip {} bytes) -> {}{} (seek {} bytes) {} bytes ({})",
            self.source.display(),
            if self.source_direct { " (O_DIRECT)" } else { "" },
            self.skip,
            self.target.display(),
            if self.target_direct { " (O_DIRECT)" } else { "" },
            self.seek,
            self.total_size,
            format_size(self.total_size as f64),
        )
    }
}

/// Job settings as read from the command line and/or a TOML file
///
/// Sizes are kept as strings so that both sources accept suffixed values
/// such as `10G` or `512K`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub size: Option<String>,
    pub workers: Option<u32>,
    pub skip: Option<String>,
    pub seek: Option<String>,
    pub block_size: Option<String>,
    pub direct: Option<DirectMode>,
    pub sparse_skip: Option<bool>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// JSON report file path
    pub json_output: Option<PathBuf>,
}

impl JobConfig {
    /// Parse sizes, resolve direct IO per side and validate
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing, a size string is
    /// malformed, a path cannot be stat'ed, or validation fails.
    pub fn resolve(&self) -> Result<TransferConfig> {
        let source = self.source.clone().context("Missing source path")?;
        let target = self.target.clone().context("Missing target path")?;
        let size = self.size.as_deref().context("Missing transfer size")?;

        let total_size = cli_convert::parse_size(size).context("Invalid size")?;
        let skip = parse_optional_size(self.skip.as_deref()).context("Invalid skip")?;
        let seek = parse_optional_size(self.seek.as_deref()).context("Invalid seek")?;
        let block_size = match self.block_size.as_deref() {
            Some(s) => cli_convert::parse_size(s).context("Invalid block size")?,
            None => BLOCK_SIZE,
        };

        let mode = self.direct.unwrap_or_default();
        let source_direct = target::resolve_direct(&source, mode)?;
        let target_direct = target::resolve_direct(&target, mode)?;

        let config = TransferConfig {
            source,
            target,
            source_direct,
            target_direct,
            total_size,
            workers: self.workers.unwrap_or(1),
            skip,
            seek,
            block_size,
            sparse_skip: self.sparse_skip.unwrap_or(true),
        };

        validator::validate_config(&config)?;
        Ok(config)
    }
}

fn parse_optional_size(s: Option<&str>) -> Result<u64> {
    s.map(cli_convert::parse_size).transpose().map(|v| v.unwrap_or(0))
}

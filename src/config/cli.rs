//! CLI argument parsing using clap

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Direct IO selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectMode {
    /// O_DIRECT for block devices only (default)
    Auto,
    /// O_DIRECT on both sides
    Always,
    /// Never use O_DIRECT
    Never,
}

/// blockperf - parallel copy and throughput measurement for files and block devices
///
/// Sizes, skip and seek are in bytes with an optional suffix T, G, M or K
/// for tebi-, gibi-, mebi- or kibibytes.
#[derive(Parser, Debug)]
#[command(name = "blockperf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source file or block device
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Target file or block device (must already exist)
    #[arg(value_name = "TARGET")]
    pub target: Option<PathBuf>,

    /// Number of bytes to copy (e.g., 10G, 512M)
    #[arg(value_name = "SIZE")]
    pub size: Option<String>,

    /// Number of worker threads (1-256)
    #[arg(value_name = "WORKERS")]
    pub workers: Option<u32>,

    /// Bytes to skip at the start of the source
    #[arg(value_name = "SKIP")]
    pub skip: Option<String>,

    /// Bytes to seek at the start of the target
    #[arg(value_name = "SEEK")]
    pub seek: Option<String>,

    /// IO block size (power of two, default 1M)
    #[arg(short = 'b', long)]
    pub block_size: Option<String>,

    /// Direct IO mode
    #[arg(long, value_enum)]
    pub direct: Option<DirectMode>,

    /// Always write all-zero blocks instead of seeking over them
    #[arg(long)]
    pub no_sparse: bool,

    /// JSON report file path
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// TOML job file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Dry run - validate configuration and open both sides without copying
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default tracing filter for the requested verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

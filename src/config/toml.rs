//! TOML job file parsing
//!
//! A job file carries the same settings as the command line:
//!
//! ```toml
//! source = "/dev/sda"
//! target = "/dev/sdb"
//! size = "100G"
//! workers = 8
//! seek = "1M"
//! direct = "auto"
//!
//! [output]
//! json_output = "copy-report.json"
//! ```

use super::*;
use crate::config::cli::Cli;
use crate::config::cli_convert::job_from_cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML job file
pub fn parse_toml_file(path: &Path) -> Result<JobConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML job configuration from string
pub fn parse_toml_string(contents: &str) -> Result<JobConfig> {
    let config: JobConfig = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with a job file (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, config: JobConfig) -> JobConfig {
    let from_cli = job_from_cli(cli);

    JobConfig {
        source: from_cli.source.or(config.source),
        target: from_cli.target.or(config.target),
        size: from_cli.size.or(config.size),
        workers: from_cli.workers.or(config.workers),
        skip: from_cli.skip.or(config.skip),
        seek: from_cli.seek.or(config.seek),
        block_size: from_cli.block_size.or(config.block_size),
        direct: from_cli.direct.or(config.direct),
        sparse_skip: from_cli.sparse_skip.or(config.sparse_skip),
        output: OutputConfig {
            json_output: from_cli.output.json_output.or(config.output.json_output),
        },
    }
}

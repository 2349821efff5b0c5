//! CLI to Config conversion utilities

use crate::config::{cli, DirectMode, JobConfig, OutputConfig};
use anyhow::{Context, Result};

/// Parse a size string (e.g., "1G", "100M", "4k") to bytes
///
/// Accepts a decimal number with an optional binary suffix `K`, `M`, `G` or
/// `T` (case-insensitive, optionally followed by `B`).
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        anyhow::bail!("Invalid length: empty size string");
    }

    const UNITS: [(char, u64); 4] = [
        ('k', 1 << 10),
        ('m', 1 << 20),
        ('g', 1 << 30),
        ('t', 1 << 40),
    ];

    // At most one suffix is stripped, so "1kk" keeps a non-digit
    let unit = s.strip_suffix('b').unwrap_or(&s);
    let (num_str, multiplier) = UNITS
        .iter()
        .find_map(|&(suffix, mult)| unit.strip_suffix(suffix).map(|n| (n, mult)))
        .unwrap_or((s.as_str(), 1));

    if num_str.is_empty() || !num_str.bytes().all(|b| b.is_ascii_digit()) {
        anyhow::bail!("Invalid size format: {}", s);
    }

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("Invalid size format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Size out of range: {}", s))
}

/// Convert CLI DirectMode to config DirectMode
pub fn convert_direct_mode(mode: cli::DirectMode) -> DirectMode {
    match mode {
        cli::DirectMode::Auto => DirectMode::Auto,
        cli::DirectMode::Always => DirectMode::Always,
        cli::DirectMode::Never => DirectMode::Never,
    }
}

/// Build a job from CLI arguments alone
pub fn job_from_cli(cli: &cli::Cli) -> JobConfig {
    JobConfig {
        source: cli.source.clone(),
        target: cli.target.clone(),
        size: cli.size.clone(),
        workers: cli.workers,
        skip: cli.skip.clone(),
        seek: cli.seek.clone(),
        block_size: cli.block_size.clone(),
        direct: cli.direct.map(convert_direct_mode),
        sparse_skip: cli.no_sparse.then_some(false),
        output: OutputConfig {
            json_output: cli.json_output.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_size_plain() {
        assert_eq!(parse_size("0").unwrap(), 0);
        assert_eq!(parse_size("4096").unwrap(), 4096);
    }

    #[test]
    fn test_parse_size_suffixes() {
        assert_eq!(parse_size("4K").unwrap(), 4 * 1024);
        assert_eq!(parse_size("4k").unwrap(), 4 * 1024);
        assert_eq!(parse_size("100M").unwrap(), 100 * 1024 * 1024);
        assert_eq!(parse_size("2G").unwrap(), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("1T").unwrap(), 1024u64.pow(4));
        assert_eq!(parse_size("8kb").unwrap(), 8 * 1024);
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("K").is_err());
        assert!(parse_size("12X").is_err());
        assert!(parse_size("-5").is_err());
        assert!(parse_size("1.5G").is_err());
        assert!(parse_size("1 2").is_err());
        assert!(parse_size("1kk").is_err());
        assert!(parse_size("1kbkb").is_err());
        assert!(parse_size("1mm").is_err());
        assert!(parse_size("1b").is_err());
        assert!(parse_size("1bk").is_err());
    }

    #[test]
    fn test_parse_size_overflow() {
        assert!(parse_size("99999999999T").is_err());
    }

    #[test]
    fn test_job_from_cli() {
        let cli = cli::Cli::try_parse_from([
            "blockperf", "src", "dst", "1G", "2", "--no-sparse", "--direct", "always",
        ])
        .unwrap();
        let job = job_from_cli(&cli);
        assert_eq!(job.size.as_deref(), Some("1G"));
        assert_eq!(job.workers, Some(2));
        assert_eq!(job.sparse_skip, Some(false));
        assert_eq!(job.direct, Some(DirectMode::Always));
    }

    #[test]
    fn test_job_from_cli_leaves_sparse_unset() {
        let cli = cli::Cli::try_parse_from(["blockperf", "src", "dst", "1G"]).unwrap();
        assert_eq!(job_from_cli(&cli).sparse_skip, None);
    }
}

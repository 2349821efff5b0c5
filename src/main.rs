//! blockperf CLI entry point

use anyhow::{Context, Result};
use blockperf::config::cli::Cli;
use blockperf::config::{cli_convert, toml, validator, JobConfig};
use blockperf::output::{json, text};
use blockperf::{coordinator, target};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the transfer described by the command line
///
/// Returns `Ok(false)` when the transfer ran but at least one worker failed.
fn run(cli: &Cli) -> Result<bool> {
    let job = build_job(cli)?;
    let config = job.resolve().context("Configuration validation failed")?;

    for warning in validator::direct_io_warnings(&config) {
        tracing::warn!("{}", warning);
    }

    println!("{}", config);

    target::preflight(&config)?;

    if cli.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(true);
    }

    let report = coordinator::run(&config)?;
    text::print_results(&report);

    if let Some(path) = &job.output.json_output {
        json::write_json_output(path, &config, &report)?;
        tracing::info!("JSON report written to {}", path.display());
    }

    Ok(report.is_success())
}

fn build_job(cli: &Cli) -> Result<JobConfig> {
    match &cli.config {
        Some(path) => {
            let file = toml::parse_toml_file(path)?;
            Ok(toml::merge_cli_with_config(cli, file))
        }
        None => Ok(cli_convert::job_from_cli(cli)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsStr;
    use tempfile::TempDir;

    #[test]
    fn test_dry_run_opens_both_sides() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.dat");
        let dst = dir.path().join("dst.dat");
        std::fs::write(&src, vec![1u8; 8192]).unwrap();
        std::fs::write(&dst, vec![0u8; 8192]).unwrap();

        let args = |target: &std::path::Path| {
            Cli::try_parse_from([
                OsStr::new("blockperf"),
                src.as_os_str(),
                target.as_os_str(),
                OsStr::new("8k"),
                OsStr::new("--dry-run"),
                OsStr::new("--direct"),
                OsStr::new("never"),
            ])
            .unwrap()
        };

        assert!(run(&args(&dst)).unwrap());
        // Dry run copies nothing
        assert_eq!(std::fs::read(&dst).unwrap(), vec![0u8; 8192]);

        // The target is never created, so a dry run against a missing one fails
        let err = run(&args(&dir.path().join("missing.dat"))).unwrap_err();
        assert!(err.downcast_ref::<blockperf::CopyError>().is_some());
    }
}

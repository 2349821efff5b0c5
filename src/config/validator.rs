//! Configuration validation

use super::*;
use anyhow::Result;

/// Smallest logical block size O_DIRECT is expected to accept
const MIN_DIRECT_ALIGNMENT: u64 = 512;

/// Validate a resolved transfer configuration
pub fn validate_config(config: &TransferConfig) -> Result<()> {
    if config.source.as_os_str().is_empty() || config.target.as_os_str().is_empty() {
        anyhow::bail!("Invalid source or target: path must not be empty");
    }

    if config.workers == 0 || config.workers > MAX_WORKERS {
        anyhow::bail!(
            "Invalid number of worker threads: must be between 1 and {}, got {}",
            MAX_WORKERS,
            config.workers
        );
    }

    validate_block_size(config.block_size)?;

    if config.skip.checked_add(config.total_size).is_none() {
        anyhow::bail!("skip + size overflows a 64-bit offset");
    }
    if config.seek.checked_add(config.total_size).is_none() {
        anyhow::bail!("seek + size overflows a 64-bit offset");
    }

    Ok(())
}

/// Validate the IO block size
pub fn validate_block_size(block_size: u64) -> Result<()> {
    if !block_size.is_power_of_two() || block_size < MIN_DIRECT_ALIGNMENT {
        anyhow::bail!(
            "block_size must be a power of two of at least {} bytes, got {}",
            MIN_DIRECT_ALIGNMENT,
            block_size
        );
    }
    if usize::try_from(block_size).is_err() {
        anyhow::bail!("block_size {} does not fit in memory", block_size);
    }
    Ok(())
}

/// Collect non-fatal warnings about offsets that O_DIRECT may reject
///
/// Devices typically require 512-byte (or 4K) aligned offsets and lengths.
/// The kernel reports misalignment as EINVAL at the first read or write, so
/// these are surfaced up front.
pub fn direct_io_warnings(config: &TransferConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.source_direct && config.skip % MIN_DIRECT_ALIGNMENT != 0 {
        warnings.push(format!(
            "skip {} is not a multiple of {} bytes; O_DIRECT reads may fail",
            config.skip, MIN_DIRECT_ALIGNMENT
        ));
    }
    if config.target_direct && config.seek % MIN_DIRECT_ALIGNMENT != 0 {
        warnings.push(format!(
            "seek {} is not a multiple of {} bytes; O_DIRECT writes may fail",
            config.seek, MIN_DIRECT_ALIGNMENT
        ));
    }
    if (config.source_direct || config.target_direct) && config.total_size % MIN_DIRECT_ALIGNMENT != 0 {
        warnings.push(format!(
            "size {} is not a multiple of {} bytes; the final O_DIRECT transfer may fail",
            config.total_size, MIN_DIRECT_ALIGNMENT
        ));
    }

    warnings
}

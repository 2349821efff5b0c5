//! Synchronous IO primitives for the copy loop
//!
//! Each worker drives its own source/target pair with blocking `read(2)`,
//! `write(2)` and `lseek(2)` calls through `std::io`. The helpers here absorb
//! the one retryable condition, an interrupted syscall (`EINTR`), and turn
//! zero-progress transfers into errors. Everything else is returned to the
//! caller unchanged.
//!
//! The helpers are generic over `Read`/`Write`/`Seek` so the copy loop can be
//! exercised against in-memory files in tests.
//!
//! # Example
//!
//! ```
//! use blockperf::engine::{read_retrying, write_counted};
//! use std::io::Cursor;
//!
//! let mut source = Cursor::new(vec![7u8; 16]);
//! let mut buf = [0u8; 16];
//! assert_eq!(read_retrying(&mut source, &mut buf).unwrap(), 16);
//!
//! let mut target = Cursor::new(Vec::new());
//! assert_eq!(write_counted(&mut target, &buf).unwrap(), 1);
//! ```

#[cfg(test)]
pub mod mock;

use std::io::{self, Read, Seek, SeekFrom, Write};

/// Read once into `buf`, reissuing the call while it is interrupted
///
/// Returns the number of bytes read, which may be less than `buf.len()`
/// (short read) or zero (end of data). Interpreting those is left to the
/// caller.
#[inline]
pub fn read_retrying<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

/// Write all of `buf`, returning the number of successful write calls
///
/// Short writes are logged and the remainder is written by further calls.
///
/// # Errors
///
/// Returns the underlying error if a write fails, or an error of kind
/// `WriteZero` if a write makes no progress.
pub fn write_counted<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> io::Result<u64> {
    let mut written = 0;
    let mut calls = 0;

    while written < buf.len() {
        let requested = buf.len() - written;
        let n = match writer.write(&buf[written..]) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "no more space left"));
        }

        if n < requested {
            tracing::info!("written only {}% of requested size", 100 * n / requested);
        }

        written += n;
        calls += 1;
    }

    Ok(calls)
}

/// Reposition to an absolute offset
#[inline]
pub fn seek_to<S: Seek + ?Sized>(file: &mut S, offset: u64) -> io::Result<u64> {
    file.seek(SeekFrom::Start(offset))
}

/// Advance the file offset by `len` bytes without touching the data
///
/// Used for sparse-skip on the target.
#[inline]
pub fn skip_forward<S: Seek + ?Sized>(file: &mut S, len: u64) -> io::Result<u64> {
    let delta = i64::try_from(len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "skip length exceeds i64"))?;
    file.seek(SeekFrom::Current(delta))
}

#[cfg(test)]
mod tests {
    use super::mock::{MockFile, Step};
    use super::*;

    #[test]
    fn test_read_retries_interrupted() {
        let mut file = MockFile::with_data(vec![5u8; 32]);
        file.push_read(Step::Interrupt);
        file.push_read(Step::Interrupt);

        let mut buf = [0u8; 32];
        assert_eq!(read_retrying(&mut file, &mut buf).unwrap(), 32);
        assert_eq!(buf, [5u8; 32]);
        assert_eq!(file.read_calls(), 3);
    }

    #[test]
    fn test_read_short_is_returned() {
        let mut file = MockFile::with_data(vec![1u8; 32]);
        file.push_read(Step::Short(10));

        let mut buf = [0u8; 32];
        assert_eq!(read_retrying(&mut file, &mut buf).unwrap(), 10);
    }

    #[test]
    fn test_read_error_is_returned() {
        let mut file = MockFile::with_data(vec![1u8; 32]);
        file.push_read(Step::Fail(io::ErrorKind::Other));

        let mut buf = [0u8; 32];
        assert!(read_retrying(&mut file, &mut buf).is_err());
    }

    #[test]
    fn test_write_counts_calls_across_short_writes() {
        let mut file = MockFile::with_data(vec![0u8; 64]);
        file.push_write(Step::Short(16));
        file.push_write(Step::Interrupt);
        file.push_write(Step::Short(16));

        let data = [9u8; 64];
        // 16 + 16 + remaining 32 = three successful calls; the interrupt is not counted
        assert_eq!(write_counted(&mut file, &data).unwrap(), 3);
        assert_eq!(file.data(), &data[..]);
    }

    #[test]
    fn test_write_zero_progress_fails() {
        let mut file = MockFile::with_data(vec![0u8; 64]);
        file.push_write(Step::Zero);

        let err = write_counted(&mut file, &[1u8; 8]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        assert_eq!(err.to_string(), "no more space left");
    }

    #[test]
    fn test_skip_forward_moves_offset_only() {
        let mut file = MockFile::with_data(vec![0xAAu8; 64]);
        seek_to(&mut file, 8).unwrap();
        assert_eq!(skip_forward(&mut file, 16).unwrap(), 24);
        assert_eq!(file.position(), 24);
        assert!(file.writes().is_empty());
        assert!(file.data().iter().all(|&b| b == 0xAA));
    }
}

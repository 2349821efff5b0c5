//! Scripted in-memory file for testing
//!
//! `MockFile` behaves like a fixed-size file with a cursor and implements
//! `Read`, `Write` and `Seek`. Individual read and write calls can be scripted
//! to be interrupted, short, zero-length, or failing, and every successful
//! write is recorded for verification. Seeks can be scripted to fail.

use std::collections::VecDeque;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Scripted behaviour for the next read or write call
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Fail with `ErrorKind::Interrupted`
    Interrupt,
    /// Transfer at most this many bytes
    Short(usize),
    /// Transfer nothing and report success
    Zero,
    /// Fail with the given error kind
    Fail(io::ErrorKind),
}

/// Record of a successful write for testing verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub offset: u64,
    pub length: usize,
}

#[derive(Debug, Default)]
pub struct MockFile {
    data: Vec<u8>,
    pos: u64,
    read_script: VecDeque<Step>,
    write_script: VecDeque<Step>,
    seek_script: VecDeque<Step>,
    read_calls: usize,
    writes: Vec<WriteRecord>,
}

impl MockFile {
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }

    pub fn push_read(&mut self, step: Step) {
        self.read_script.push_back(step);
    }

    pub fn push_write(&mut self, step: Step) {
        self.write_script.push_back(step);
    }

    /// Script the next seek; only `Interrupt` and `Fail` change its behaviour
    pub fn push_seek(&mut self, step: Step) {
        self.seek_script.push_back(step);
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls
    }

    pub fn writes(&self) -> &[WriteRecord] {
        &self.writes
    }

    fn apply(step: Option<Step>, requested: usize) -> io::Result<usize> {
        match step {
            None => Ok(requested),
            Some(Step::Interrupt) => Err(io::Error::from(io::ErrorKind::Interrupted)),
            Some(Step::Short(n)) => Ok(n.min(requested)),
            Some(Step::Zero) => Ok(0),
            Some(Step::Fail(kind)) => Err(io::Error::from(kind)),
        }
    }
}

impl Read for MockFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_calls += 1;
        let available = self.data.len().saturating_sub(self.pos as usize);
        let n = Self::apply(self.read_script.pop_front(), buf.len().min(available))?;

        let start = self.pos as usize;
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Write for MockFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let available = self.data.len().saturating_sub(self.pos as usize);
        let n = Self::apply(self.write_script.pop_front(), buf.len().min(available))?;

        let start = self.pos as usize;
        self.data[start..start + n].copy_from_slice(&buf[..n]);
        if n > 0 {
            self.writes.push(WriteRecord {
                offset: self.pos,
                length: n,
            });
        }
        self.pos += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MockFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self.seek_script.pop_front() {
            Some(Step::Interrupt) => return Err(io::Error::from(io::ErrorKind::Interrupted)),
            Some(Step::Fail(kind)) => return Err(io::Error::from(kind)),
            _ => {}
        }
        let new = match pos {
            SeekFrom::Start(off) => Some(off),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
            SeekFrom::End(delta) => (self.data.len() as u64).checked_add_signed(delta),
        };
        self.pos = new.ok_or_else(|| io::Error::from(io::ErrorKind::InvalidInput))?;
        Ok(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_file_basic() {
        let mut file = MockFile::with_data(vec![0u8; 8]);
        file.write_all(b"abcd").unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        let mut buf = [0u8; 4];
        file.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"abcd");
        assert_eq!(file.writes(), &[WriteRecord { offset: 0, length: 4 }]);
    }

    #[test]
    fn test_mock_file_does_not_grow() {
        let mut file = MockFile::with_data(vec![0u8; 4]);
        file.seek(SeekFrom::Start(4)).unwrap();
        assert_eq!(file.write(b"x").unwrap(), 0);
    }

    #[test]
    fn test_mock_file_scripted_seek_failure() {
        let mut file = MockFile::with_data(vec![0u8; 8]);
        file.push_seek(Step::Fail(io::ErrorKind::InvalidInput));

        let err = file.seek(SeekFrom::Current(4)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(file.position(), 0);
        assert_eq!(file.seek(SeekFrom::Current(4)).unwrap(), 4);
    }
}

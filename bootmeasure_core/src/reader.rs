//! Streaming file content in fixed-size chunks.

use crate::error::{Error, Result};
use crate::fs::FileSystem;
use std::io::{ErrorKind, Read};

/// Default chunk size for content reads (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Stream the file at `path` into `sink`, `chunk_size` bytes at a time.
///
/// Every chunk except the last is exactly `chunk_size` bytes. Reading stops
/// after the first short chunk, so a file whose length is a multiple of
/// `chunk_size` ends with a zero-length call; sinks must treat that as a
/// no-op. On error no further calls are made, but chunks already delivered
/// stay delivered.
///
/// Returns the number of bytes delivered.
pub fn read_in_chunks<F>(
    fs: &dyn FileSystem,
    path: &str,
    chunk_size: usize,
    mut sink: F,
) -> Result<u64>
where
    F: FnMut(&[u8]),
{
    if chunk_size == 0 {
        return Err(Error::invalid_config("chunk size must be positive"));
    }

    let mut file = fs.open(path)?;
    let mut buf = vec![0u8; chunk_size];
    let mut total = 0u64;

    loop {
        let filled = fill(&mut file, &mut buf)?;
        sink(&buf[..filled]);
        total += filled as u64;

        if filled < chunk_size {
            return Ok(total);
        }
    }
}

/// Read until `buf` is full or the reader is exhausted.
fn fill(reader: &mut dyn Read, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemFs;

    fn chunk_lengths(fs: &MemFs, path: &str, chunk_size: usize) -> Result<Vec<usize>> {
        let mut lengths = Vec::new();
        read_in_chunks(fs, path, chunk_size, |chunk| lengths.push(chunk.len()))?;
        Ok(lengths)
    }

    #[test]
    fn test_chunks_of_partial_file() {
        let mut fs = MemFs::new();
        fs.file("\\f", &[7u8; 10]);

        assert_eq!(chunk_lengths(&fs, "\\f", 4).unwrap(), vec![4, 4, 2]);
    }

    #[test]
    fn test_exact_multiple_ends_with_empty_chunk() {
        let mut fs = MemFs::new();
        fs.file("\\f", &[1u8; 8]);

        assert_eq!(chunk_lengths(&fs, "\\f", 4).unwrap(), vec![4, 4, 0]);
    }

    #[test]
    fn test_empty_file_single_empty_chunk() {
        let mut fs = MemFs::new();
        fs.file("\\empty", b"");

        assert_eq!(chunk_lengths(&fs, "\\empty", 4).unwrap(), vec![0]);
    }

    #[test]
    fn test_content_and_total() {
        let mut fs = MemFs::new();
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        fs.file("\\data.bin", &data);

        let mut collected = Vec::new();
        let total = read_in_chunks(&fs, "\\data.bin", 64, |chunk| {
            collected.extend_from_slice(chunk)
        })
        .unwrap();

        assert_eq!(total, 1000);
        assert_eq!(collected, data);
    }

    #[test]
    fn test_short_reads_are_refilled() {
        let mut fs = MemFs::new();
        fs.file("\\f", &[3u8; 9]).trickle();

        assert_eq!(chunk_lengths(&fs, "\\f", 4).unwrap(), vec![4, 4, 1]);
    }

    #[test]
    fn test_missing_file_errors_without_sink_calls() {
        let fs = MemFs::new();
        let mut calls = 0;
        let err = read_in_chunks(&fs, "\\missing", 4, |_| calls += 1).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_read_error_keeps_delivered_chunks() {
        let mut fs = MemFs::new();
        fs.file("\\f", &[5u8; 10]).fail_after(4);

        let mut lengths = Vec::new();
        let result = read_in_chunks(&fs, "\\f", 4, |chunk| lengths.push(chunk.len()));

        assert!(matches!(result, Err(Error::Io { .. })));
        assert_eq!(lengths, vec![4]);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut fs = MemFs::new();
        fs.file("\\f", b"x");

        assert!(matches!(
            read_in_chunks(&fs, "\\f", 0, |_| {}),
            Err(Error::InvalidConfig { .. })
        ));
    }
}

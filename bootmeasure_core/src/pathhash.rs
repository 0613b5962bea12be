//! Canonical byte layout of everything the measurement absorbs.
//!
//! Each field is followed by [`SEPARATOR`]. Text is absorbed as UTF-16LE,
//! the encoding firmware uses for names and paths, so a verifier running in
//! firmware reproduces the same digest. The layout assumes no encoded field
//! contains three consecutive zero bytes at a field boundary.

use crate::error::Result;
use crate::hash::Accumulator;
use crate::reader::read_in_chunks;
use crate::volume::Volume;

/// Field terminator.
pub const SEPARATOR: [u8; 3] = [0, 0, 0];

/// What [`hash_file`] found at the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Content was absorbed.
    Hashed { bytes: u64 },
    /// Only the headers were absorbed.
    Missing,
}

pub fn hash_separator(acc: &mut dyn Accumulator) {
    acc.absorb(&SEPARATOR);
}

/// Absorb `bytes` as one field.
pub fn hash_field(acc: &mut dyn Accumulator, bytes: &[u8]) {
    acc.absorb(bytes);
    hash_separator(acc);
}

/// Absorb `text` as one field. `None` absorbs nothing at all, while an
/// empty string still absorbs the separator.
pub fn hash_text(acc: &mut dyn Accumulator, text: Option<&str>) {
    let Some(text) = text else {
        return;
    };
    let wide: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    hash_field(acc, &wide);
}

/// Absorb the volume name, partition name and path of a file, then its
/// content as a field of its own.
///
/// A missing file contributes only the three headers, so it never hashes like
/// an empty file. If reading fails midway the content already absorbed stays
/// in `acc` and no separator follows it.
pub fn hash_file(
    acc: &mut dyn Accumulator,
    volume: &Volume,
    path: &str,
    chunk_size: usize,
) -> Result<FileOutcome> {
    hash_text(acc, Some(volume.name()));
    hash_text(acc, Some(volume.partition_name()));
    hash_text(acc, Some(path));

    if !volume.fs().exists(path) {
        return Ok(FileOutcome::Missing);
    }

    let bytes = read_in_chunks(volume.fs(), path, chunk_size, |chunk| {
        if !chunk.is_empty() {
            acc.absorb(chunk);
        }
    })?;
    hash_separator(acc);

    Ok(FileOutcome::Hashed { bytes })
}

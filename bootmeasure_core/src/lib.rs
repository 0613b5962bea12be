//! # bootmeasure core
//!
//! Integrity measurement for boot entries.
//!
//! A boot entry's digest covers its loader path, load options and initrd
//! path, followed by either the files selected by its hash-path globs or,
//! when it has none, every file below the loader's directory. Comparing
//! digests across boots reveals tampering or drift.
//!
//! ## Features
//!
//! - `*`/`?` glob matching with bounded backtracking
//! - Iterative, depth-capped directory traversal
//! - Chunked content reads into SHA-256 or BLAKE3
//! - A report of everything that could not be measured
//!
//! ## Example
//!
//! ```no_run
//! use bootmeasure_core::{BootEntry, HostFs, MeasureConfig, Measurer, Volume, VolumeTable};
//! use std::sync::Arc;
//!
//! let mut volumes = VolumeTable::new();
//! let esp = volumes.add(Volume::new(
//!     "ESP",
//!     "EFI system partition",
//!     Arc::new(HostFs::new("/boot/efi")),
//! ));
//!
//! let measurer = Measurer::new(MeasureConfig::default(), Arc::new(volumes));
//! let mut entry = BootEntry::new("\\EFI\\refind\\refind_x64.efi")
//!     .with_hash_path("EFI/refind/*.conf")
//!     .on_volume(esp);
//!
//! let status = measurer.generate_hash(&mut entry);
//! println!("{:?} {}", status, entry.digest().unwrap());
//! ```

mod config;
mod entry;
mod error;
mod fs;
mod glob;
mod hash;
mod measure;
pub mod path;
mod pathhash;
mod reader;
mod report;
mod volume;
mod walker;

#[cfg(test)]
mod testing;

pub use config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_PATH_LEN, MeasureConfig};
pub use entry::BootEntry;
pub use error::{Error, Result};
pub use fs::{DirEntry, FileSystem, HostFs};
pub use glob::{Glob, MAX_CHOICE_POINTS, MatchOutcome, matches};
pub use hash::{Accumulator, Algorithm, AlgorithmAccumulator, DIGEST_SIZE, Digest};
pub use measure::Measurer;
pub use pathhash::{FileOutcome, SEPARATOR, hash_field, hash_file, hash_separator, hash_text};
pub use reader::{DEFAULT_CHUNK_SIZE, read_in_chunks};
pub use report::{FailureKind, MeasureReport, MeasurementStatus, TraversalFailure};
pub use volume::{Volume, VolumeResolver, VolumeTable};
pub use walker::Walker;

//! Directory traversal feeding the accumulator.
//!
//! Two modes share one accumulator and report:
//!
//! - [`Walker::hash_tree`] hashes everything below a directory. Each
//!   directory's files are hashed first, then its subdirectories are entered
//!   in listing order. Only `.` and `..` are skipped.
//! - [`Walker::hash_glob_path`] applies a glob to the final component of a
//!   path. Matching files are hashed; matching directories are handed to
//!   `hash_tree`. Hidden names only match patterns that start with `.`.
//!
//! Symbolic links are never followed in either mode. Each one is recorded
//! as a failure, as whatever it points at is left out of the digest.
//!
//! Traversal is iterative with an explicit frame stack capped at
//! `max_depth` directories, counting the start directory, so a deep tree
//! cannot exhaust the call stack.

use crate::config::MeasureConfig;
use crate::error::{Error, Result};
use crate::fs::DirEntry;
use crate::glob::Glob;
use crate::hash::Accumulator;
use crate::path;
use crate::pathhash::{self, FileOutcome};
use crate::report::MeasureReport;
use crate::volume::Volume;
use std::collections::VecDeque;

/// Subdirectories of one entered directory still waiting to be visited.
struct Frame {
    pending: VecDeque<String>,
}

/// Borrowed state for one measurement's traversal.
pub struct Walker<'a> {
    acc: &'a mut dyn Accumulator,
    config: &'a MeasureConfig,
    report: &'a mut MeasureReport,
}

impl<'a> Walker<'a> {
    pub fn new(
        acc: &'a mut dyn Accumulator,
        config: &'a MeasureConfig,
        report: &'a mut MeasureReport,
    ) -> Self {
        Self {
            acc,
            config,
            report,
        }
    }

    /// Hash every file below `dir`, recursively.
    pub fn hash_tree(&mut self, volume: &Volume, dir: &str) {
        let root = path::clean(dir);
        let mut stack: Vec<Frame> = Vec::new();

        if let Some(frame) = self.enter_directory(volume, root) {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(subdir) = frame.pending.pop_front() else {
                stack.pop();
                continue;
            };

            if stack.len() >= self.config.max_depth {
                let err = Error::depth_exceeded(&subdir, self.config.max_depth);
                self.report.record(volume.name(), &subdir, &err);
                continue;
            }

            if let Some(child) = self.enter_directory(volume, subdir) {
                stack.push(child);
            }
        }
    }

    /// Hash the entries selected by a one-level glob such as `docs\*.conf`.
    pub fn hash_glob_path(&mut self, volume: &Volume, pattern: &str) {
        let cleaned = path::clean(pattern);
        let (dir, segment) = path::split_last(&cleaned);

        if segment.is_empty() {
            let err = Error::invalid_path(pattern, "pattern has no final component");
            self.report.record(volume.name(), pattern, &err);
            return;
        }

        let glob = Glob::new(segment);
        let entries = match self.list(volume, dir, Some(&glob)) {
            Ok(entries) => entries,
            Err(err) => {
                self.report.record(volume.name(), dir, &err);
                return;
            }
        };

        tracing::debug!(
            volume = volume.name(),
            pattern = %cleaned,
            matched = entries.len(),
            "glob listing"
        );

        for entry in entries {
            if entry.is_self_or_parent() || (entry.is_hidden() && !glob.allows_hidden()) {
                continue;
            }
            let Some(child) = self.child_path(volume, dir, &entry.name) else {
                continue;
            };
            if entry.is_symlink {
                self.record(volume.name(), &child, &Error::symlink_skipped(&child));
            } else if entry.is_dir {
                self.hash_tree(volume, &child);
            } else {
                self.hash_file(volume, &child);
            }
        }
    }

    /// Hash one file and account for the outcome.
    pub fn hash_file(&mut self, volume: &Volume, file: &str) {
        match pathhash::hash_file(self.acc, volume, file, self.config.chunk_size) {
            Ok(FileOutcome::Hashed { bytes }) => {
                tracing::debug!(volume = volume.name(), path = file, bytes, "hashed file");
                self.report.files_hashed += 1;
                self.report.bytes_hashed += bytes;
            }
            Ok(FileOutcome::Missing) => {
                tracing::debug!(volume = volume.name(), path = file, "file missing");
                self.report.missing.push(file.to_string());
            }
            Err(err) => self.report.record(volume.name(), file, &err),
        }
    }

    /// Note a failure that happened outside the walk itself.
    pub fn record(&mut self, volume: &str, path: &str, err: &Error) {
        self.report.record(volume, path, err);
    }

    /// List `dir`, hash its files, and return a frame for its subdirectories.
    fn enter_directory(&mut self, volume: &Volume, dir: String) -> Option<Frame> {
        let entries = match self.list(volume, &dir, None) {
            Ok(entries) => entries,
            Err(err) => {
                self.report.record(volume.name(), &dir, &err);
                return None;
            }
        };

        tracing::debug!(
            volume = volume.name(),
            path = %dir,
            entries = entries.len(),
            "entered directory"
        );
        self.report.directories_visited += 1;

        let mut pending = VecDeque::new();
        for entry in entries {
            if entry.is_self_or_parent() {
                continue;
            }
            let Some(child) = self.child_path(volume, &dir, &entry.name) else {
                continue;
            };
            if entry.is_symlink {
                self.record(volume.name(), &child, &Error::symlink_skipped(&child));
            } else if entry.is_dir {
                pending.push_back(child);
            } else {
                self.hash_file(volume, &child);
            }
        }

        Some(Frame { pending })
    }

    fn list(&self, volume: &Volume, dir: &str, glob: Option<&Glob>) -> Result<Vec<DirEntry>> {
        let mut entries = match glob {
            Some(glob) => volume.fs().read_dir_matching(dir, glob)?,
            None => volume.fs().read_dir(dir)?,
        };
        if self.config.sort_entries {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(entries)
    }

    /// Join `name` onto `dir`, reporting paths over the length cap.
    fn child_path(&mut self, volume: &Volume, dir: &str, name: &str) -> Option<String> {
        let child = path::join(dir, name);
        if path::wide_len(&child) > self.config.max_path_len {
            let err = Error::path_too_long(&child, self.config.max_path_len);
            self.report.record(volume.name(), &child, &err);
            return None;
        }
        Some(child)
    }
}

//! Whole-entry measurement.

use crate::config::MeasureConfig;
use crate::entry::BootEntry;
use crate::error::{Error, Result};
use crate::hash::Accumulator;
use crate::path;
use crate::pathhash;
use crate::report::{MeasureReport, MeasurementStatus};
use crate::volume::{Volume, VolumeResolver};
use crate::walker::Walker;
use std::sync::Arc;

/// Computes boot entry digests.
///
/// A `Measurer` holds no per-measurement state: every call builds its own
/// accumulator and report, and the entry being measured is borrowed
/// exclusively for the duration of the call.
pub struct Measurer {
    config: MeasureConfig,
    resolver: Arc<dyn VolumeResolver>,
}

impl Measurer {
    pub fn new(config: MeasureConfig, resolver: Arc<dyn VolumeResolver>) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Measure `entry` with the configured algorithm, replacing its digest
    /// and report.
    pub fn generate_hash(&self, entry: &mut BootEntry) -> MeasurementStatus {
        self.generate_hash_with(entry, self.config.algorithm.accumulator())
    }

    /// Measure `entry` into a caller-supplied fresh accumulator.
    ///
    /// Absorbs the loader path, load options and initrd path, then either
    /// every `hash_paths` glob in order or, when there are none, the whole
    /// directory holding the loader.
    pub fn generate_hash_with<A: Accumulator>(
        &self,
        entry: &mut BootEntry,
        mut acc: A,
    ) -> MeasurementStatus {
        let mut report = MeasureReport::default();
        self.absorb_entry(entry, &mut acc, &mut report);

        let digest = acc.finalize();
        let status = report.status();
        tracing::info!(
            loader = %entry.loader_path,
            %digest,
            files = report.files_hashed,
            bytes = report.bytes_hashed,
            failures = report.failures.len(),
            ?status,
            "measured boot entry"
        );

        entry.digest = Some(digest);
        entry.report = Some(report);
        status
    }

    fn absorb_entry(
        &self,
        entry: &BootEntry,
        acc: &mut dyn Accumulator,
        report: &mut MeasureReport,
    ) {
        pathhash::hash_text(acc, Some(&entry.loader_path));
        pathhash::hash_text(acc, Some(&entry.load_options));
        pathhash::hash_text(acc, Some(&entry.initrd_path));

        let mut walker = Walker::new(acc, &self.config, report);

        if !entry.hash_paths.is_empty() {
            for pattern in &entry.hash_paths {
                match self.locate(entry, pattern) {
                    Ok((volume, glob_path)) => walker.hash_glob_path(&volume, glob_path),
                    Err(err) => walker.record(qualifier(pattern), pattern, &err),
                }
            }
            return;
        }

        if entry.loader_path.is_empty() {
            let err = Error::invalid_path("", "loader path is empty");
            walker.record("", "", &err);
            return;
        }

        match self.locate(entry, &entry.loader_path) {
            Ok((volume, loader)) => {
                let loader = path::clean(loader);
                walker.hash_tree(&volume, path::parent(&loader));
            }
            Err(err) => walker.record(qualifier(&entry.loader_path), &entry.loader_path, &err),
        }
    }

    /// Find the volume a path lives on. An explicit `Name:` qualifier wins
    /// over the entry's own volume.
    fn locate<'p>(&self, entry: &BootEntry, raw: &'p str) -> Result<(Arc<Volume>, &'p str)> {
        let (name, rest) = path::split_volume(raw);
        let volume = match name {
            Some(name) => self.resolver.resolve(name)?,
            None => self.default_volume(entry)?,
        };
        Ok((volume, rest))
    }

    fn default_volume(&self, entry: &BootEntry) -> Result<Arc<Volume>> {
        if let Some(volume) = &entry.volume {
            return Ok(Arc::clone(volume));
        }
        match &entry.volume_name {
            Some(name) => self.resolver.resolve(name),
            None => Err(Error::volume_not_found("<entry default>")),
        }
    }
}

fn qualifier(raw: &str) -> &str {
    path::split_volume(raw).0.unwrap_or("")
}

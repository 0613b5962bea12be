//! Boot entries and their last measurement.

use crate::hash::Digest;
use crate::report::MeasureReport;
use crate::volume::Volume;
use std::sync::Arc;

/// A bootable configuration the boot manager can measure.
#[derive(Debug, Clone, Default)]
pub struct BootEntry {
    /// Loader binary, optionally `Volume:`-qualified.
    pub loader_path: String,
    pub load_options: String,
    /// Secondary image (initrd), empty when unused.
    pub initrd_path: String,
    /// Glob paths to measure instead of the loader's directory.
    pub hash_paths: Vec<String>,
    /// Volume holding unqualified paths.
    pub volume: Option<Arc<Volume>>,
    /// Name to resolve when `volume` is not set.
    pub volume_name: Option<String>,
    pub(crate) digest: Option<Digest>,
    pub(crate) report: Option<MeasureReport>,
}

impl BootEntry {
    pub fn new(loader_path: impl Into<String>) -> Self {
        Self {
            loader_path: loader_path.into(),
            ..Self::default()
        }
    }

    pub fn with_options(mut self, load_options: impl Into<String>) -> Self {
        self.load_options = load_options.into();
        self
    }

    pub fn with_initrd(mut self, initrd_path: impl Into<String>) -> Self {
        self.initrd_path = initrd_path.into();
        self
    }

    pub fn with_hash_path(mut self, pattern: impl Into<String>) -> Self {
        self.hash_paths.push(pattern.into());
        self
    }

    pub fn on_volume(mut self, volume: Arc<Volume>) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn on_volume_named(mut self, name: impl Into<String>) -> Self {
        self.volume_name = Some(name.into());
        self
    }

    /// Digest from the last measurement, if any.
    pub fn digest(&self) -> Option<&Digest> {
        self.digest.as_ref()
    }

    /// Report from the last measurement, if any.
    pub fn report(&self) -> Option<&MeasureReport> {
        self.report.as_ref()
    }

    /// Whether the last measurement covered everything it was asked to.
    pub fn is_fully_measured(&self) -> bool {
        self.digest.is_some() && self.report.as_ref().is_some_and(MeasureReport::is_complete)
    }
}

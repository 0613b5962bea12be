//! Volumes and the lookup of volumes by name.

use crate::error::{Error, Result};
use crate::fs::FileSystem;
use std::sync::Arc;

/// A mounted volume as the measurement sees it.
#[derive(Debug, Clone)]
pub struct Volume {
    name: String,
    partition_name: String,
    root: Arc<dyn FileSystem>,
}

impl Volume {
    pub fn new(
        name: impl Into<String>,
        partition_name: impl Into<String>,
        root: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            name: name.into(),
            partition_name: partition_name.into(),
            root,
        }
    }

    /// File system label of the volume.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// GPT partition name (may be empty).
    pub fn partition_name(&self) -> &str {
        &self.partition_name
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.root.as_ref()
    }

    /// Whether `name` refers to this volume (label or partition name,
    /// ASCII case-insensitive).
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || (!self.partition_name.is_empty() && self.partition_name.eq_ignore_ascii_case(name))
    }
}

/// Finds volumes by the name used in `Name:\path` qualifiers.
pub trait VolumeResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<Arc<Volume>>;
}

/// The set of volumes known to the boot manager, in scan order.
#[derive(Debug, Clone, Default)]
pub struct VolumeTable {
    volumes: Vec<Arc<Volume>>,
}

impl VolumeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, volume: Volume) -> Arc<Volume> {
        let volume = Arc::new(volume);
        self.volumes.push(Arc::clone(&volume));
        volume
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}

impl VolumeResolver for VolumeTable {
    /// The first volume in scan order that answers to `name`.
    fn resolve(&self, name: &str) -> Result<Arc<Volume>> {
        self.volumes
            .iter()
            .find(|v| v.answers_to(name))
            .cloned()
            .ok_or_else(|| Error::volume_not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::HostFs;

    fn volume(name: &str, partition: &str) -> Volume {
        Volume::new(name, partition, Arc::new(HostFs::new("/nonexistent")))
    }

    #[test]
    fn test_resolve_by_name_or_partition() {
        let mut table = VolumeTable::new();
        table.add(volume("ESP", "EFI system partition"));
        table.add(volume("root", "linux"));

        assert_eq!(table.resolve("esp").unwrap().name(), "ESP");
        assert_eq!(table.resolve("LINUX").unwrap().name(), "root");
        assert!(table.resolve("data").unwrap_err().is_not_found());
    }

    #[test]
    fn test_empty_partition_name_never_matches() {
        let mut table = VolumeTable::new();
        assert!(table.is_empty());
        table.add(volume("ESP", ""));
        assert!(table.resolve("").is_err());
    }

    #[test]
    fn test_first_match_wins() {
        let mut table = VolumeTable::new();
        let first = table.add(volume("boot", "one"));
        table.add(volume("boot", "two"));

        let resolved = table.resolve("boot").unwrap();
        assert!(Arc::ptr_eq(&first, &resolved));
        assert_eq!(table.len(), 2);
    }
}

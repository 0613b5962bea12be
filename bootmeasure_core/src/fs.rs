//! Read-only file system access for volumes.

use crate::error::{Error, Result};
use crate::glob::Glob;
use crate::path;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    /// The entry is a symbolic link; `is_dir` is then always false.
    pub is_symlink: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            is_symlink: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            is_symlink: false,
        }
    }

    pub fn symlink(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            is_symlink: true,
        }
    }

    /// `.` or `..`.
    pub fn is_self_or_parent(&self) -> bool {
        self.name == "." || self.name == ".."
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Read-only view of a volume's file tree.
///
/// Paths are volume paths as produced by [`path::clean`]. Handles returned by
/// [`FileSystem::open`] are released when dropped.
pub trait FileSystem: fmt::Debug + Send + Sync {
    /// Open a file for reading.
    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>>;

    /// List the entries of a directory, in the file system's own order.
    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>>;

    fn exists(&self, path: &str) -> bool;

    fn is_dir(&self, path: &str) -> bool;

    /// List the entries of a directory whose names match `glob`.
    fn read_dir_matching(&self, path: &str, glob: &Glob) -> Result<Vec<DirEntry>> {
        Ok(self
            .read_dir(path)?
            .into_iter()
            .filter(|entry| glob.matches(&entry.name))
            .collect())
    }
}

/// A volume backed by a directory on the host file system.
#[derive(Debug, Clone)]
pub struct HostFs {
    root: PathBuf,
}

impl HostFs {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Host directory the volume root maps onto.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a volume path onto the host, refusing to leave the volume root.
    fn host_path(&self, volume_path: &str) -> Result<PathBuf> {
        let mut host = self.root.clone();
        for component in path::components(volume_path) {
            if component == "." || component == ".." {
                return Err(Error::invalid_path(
                    volume_path,
                    "relative components are not allowed",
                ));
            }
            host.push(component);
        }
        Ok(host)
    }
}

impl FileSystem for HostFs {
    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>> {
        let host = self.host_path(path)?;
        let file = std::fs::File::open(&host).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::not_found(path),
            _ => Error::from(e),
        })?;
        Ok(Box::new(file))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let host = self.host_path(path)?;
        if !host.exists() {
            return Err(Error::not_found(path));
        }
        if !host.is_dir() {
            return Err(Error::invalid_path(path, "not a directory"));
        }

        // Measurement sees every entry, so all ignore filters are off.
        let walker = ignore::WalkBuilder::new(&host)
            .max_depth(Some(1))
            .standard_filters(false)
            .follow_links(false)
            .build();

        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry?;

            // Skip the directory itself
            if entry.depth() == 0 {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!(
                    dir = path,
                    name = ?entry.file_name(),
                    "skipping entry with non UTF-8 name"
                );
                continue;
            };

            // Links are reported, not followed, whatever they point at.
            entries.push(if entry.path_is_symlink() {
                DirEntry::symlink(name)
            } else if entry.file_type().is_some_and(|t| t.is_dir()) {
                DirEntry::dir(name)
            } else {
                DirEntry::file(name)
            });
        }

        Ok(entries)
    }

    fn exists(&self, path: &str) -> bool {
        self.host_path(path).is_ok_and(|p| p.exists())
    }

    fn is_dir(&self, path: &str) -> bool {
        self.host_path(path).is_ok_and(|p| p.is_dir())
    }
}

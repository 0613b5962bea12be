//! In-memory volumes and accumulators for unit tests.

use crate::error::{Error, Result};
use crate::fs::{DirEntry, FileSystem};
use crate::hash::{Accumulator, Algorithm, Digest};
use crate::path;
use crate::volume::Volume;
use std::io::{self, Read};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub(crate) struct MemFile {
    data: Vec<u8>,
    trickle: bool,
    fail_after: Option<usize>,
}

impl MemFile {
    /// Hand out one byte per read call.
    pub(crate) fn trickle(&mut self) -> &mut Self {
        self.trickle = true;
        self
    }

    /// Fail every read once `offset` bytes have been delivered.
    pub(crate) fn fail_after(&mut self, offset: usize) -> &mut Self {
        self.fail_after = Some(offset);
        self
    }
}

#[derive(Debug, Clone)]
enum Node {
    File(MemFile),
    Dir { unreadable: bool },
    Link,
}

/// A file tree that lists entries in insertion order.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemFs {
    nodes: Vec<(String, Node)>,
    reverse_listing: bool,
}

impl MemFs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn file(&mut self, raw: &str, data: &[u8]) -> &mut MemFile {
        let file_path = path::clean(raw);
        self.ensure_dir(path::parent(&file_path).to_string());
        self.nodes.retain(|(p, _)| *p != file_path);
        self.nodes.push((
            file_path,
            Node::File(MemFile {
                data: data.to_vec(),
                ..MemFile::default()
            }),
        ));
        match self.nodes.last_mut() {
            Some((_, Node::File(file))) => file,
            _ => unreachable!("file node was just pushed"),
        }
    }

    /// A directory whose listing always fails.
    pub(crate) fn unreadable_dir(&mut self, raw: &str) -> &mut Self {
        let dir_path = path::clean(raw);
        self.ensure_dir(dir_path.clone());
        for (p, node) in &mut self.nodes {
            if *p == dir_path {
                *node = Node::Dir { unreadable: true };
            }
        }
        self
    }

    /// A symbolic link; its target never matters to the walker.
    pub(crate) fn symlink(&mut self, raw: &str) -> &mut Self {
        let link_path = path::clean(raw);
        self.ensure_dir(path::parent(&link_path).to_string());
        self.nodes.retain(|(p, _)| *p != link_path);
        self.nodes.push((link_path, Node::Link));
        self
    }

    pub(crate) fn remove(&mut self, raw: &str) -> &mut Self {
        let target = path::clean(raw);
        let prefix = format!("{}{}", target, path::SEPARATOR);
        self.nodes
            .retain(|(p, _)| *p != target && !p.starts_with(&prefix));
        self
    }

    /// List directories in reverse insertion order.
    pub(crate) fn reverse_listing(&mut self) -> &mut Self {
        self.reverse_listing = true;
        self
    }

    pub(crate) fn into_volume(self, name: &str, partition_name: &str) -> Arc<Volume> {
        Arc::new(Volume::new(name, partition_name, Arc::new(self)))
    }

    fn ensure_dir(&mut self, dir_path: String) {
        if dir_path == path::ROOT || self.node(&dir_path).is_some() {
            return;
        }
        self.ensure_dir(path::parent(&dir_path).to_string());
        self.nodes.push((dir_path, Node::Dir { unreadable: false }));
    }

    fn node(&self, node_path: &str) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|(p, _)| p == node_path)
            .map(|(_, node)| node)
    }
}

impl FileSystem for MemFs {
    fn open(&self, raw: &str) -> Result<Box<dyn Read + '_>> {
        let file_path = path::clean(raw);
        match self.node(&file_path) {
            Some(Node::File(file)) => Ok(Box::new(MemReader { file, pos: 0 })),
            Some(Node::Dir { .. }) => Err(Error::invalid_path(file_path, "is a directory")),
            Some(Node::Link) => Err(Error::invalid_path(file_path, "is a symbolic link")),
            None => Err(Error::not_found(file_path)),
        }
    }

    fn read_dir(&self, raw: &str) -> Result<Vec<DirEntry>> {
        let dir_path = path::clean(raw);
        match self.node(&dir_path) {
            Some(Node::Dir { unreadable: true }) => {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "unreadable").into());
            }
            Some(Node::File(_) | Node::Link) => {
                return Err(Error::invalid_path(dir_path, "not a directory"));
            }
            None if dir_path != path::ROOT => return Err(Error::not_found(dir_path)),
            _ => {}
        }

        let mut entries: Vec<DirEntry> = self
            .nodes
            .iter()
            .filter(|(p, _)| p != path::ROOT && path::parent(p) == dir_path)
            .map(|(p, node)| {
                let name = path::split_last(p).1;
                match node {
                    Node::Dir { .. } => DirEntry::dir(name),
                    Node::File(_) => DirEntry::file(name),
                    Node::Link => DirEntry::symlink(name),
                }
            })
            .collect();
        if self.reverse_listing {
            entries.reverse();
        }
        Ok(entries)
    }

    fn exists(&self, raw: &str) -> bool {
        let node_path = path::clean(raw);
        node_path == path::ROOT || self.node(&node_path).is_some()
    }

    fn is_dir(&self, raw: &str) -> bool {
        let node_path = path::clean(raw);
        node_path == path::ROOT || matches!(self.node(&node_path), Some(Node::Dir { .. }))
    }
}

struct MemReader<'a> {
    file: &'a MemFile,
    pos: usize,
}

impl Read for MemReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut end = self.file.data.len();
        if let Some(limit) = self.file.fail_after {
            if self.pos >= limit {
                return Err(io::Error::other("injected read failure"));
            }
            end = end.min(limit);
        }
        let mut n = buf.len().min(end - self.pos);
        if self.file.trickle {
            n = n.min(1);
        }
        buf[..n].copy_from_slice(&self.file.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Accumulator that keeps every absorbed byte for inspection.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) bytes: Vec<u8>,
}

impl Accumulator for Recorder {
    fn absorb(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    fn finalize(self) -> Digest {
        let mut acc = Algorithm::Sha256.accumulator();
        acc.absorb(&self.bytes);
        acc.finalize()
    }
}

/// UTF-16LE bytes of `text`, as the hasher absorbs text fields.
pub(crate) fn wide(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

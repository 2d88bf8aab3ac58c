use std::path::PathBuf;
use std::time::SystemTime;

use colored::Color;
use derive_more::Display;
use hashlink::LinkedHashMap;
use tracing::debug;

use super::enumerate::enumerate_sources;
use crate::mapping::SourceSets;

/// Last-modified times of the watched files at one instant, in enumeration
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    mtimes: LinkedHashMap<PathBuf, SystemTime>,
}

impl Snapshot {
    /// Records the mtime of every eligible source file.
    ///
    /// A file whose metadata cannot be read (it vanished after enumeration,
    /// or is not readable) is left out of the snapshot.
    pub fn capture(sets: &SourceSets) -> Self {
        enumerate_sources(sets)
            .into_iter()
            .filter_map(|path| match path.metadata().and_then(|meta| meta.modified()) {
                Ok(modified) => Some((path, modified)),
                Err(err) => {
                    debug!("Leaving {} out of the snapshot: {}", path.display(), err);
                    None
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mtimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mtimes.is_empty()
    }

    #[cfg(test)]
    pub fn modified(&self, path: &std::path::Path) -> Option<SystemTime> {
        self.mtimes.get(path).copied()
    }

    /// Changes that turn `previous` into `self`.
    ///
    /// New and modified files come first, in the order of this snapshot,
    /// followed by deletions in the order of `previous`.
    pub fn changes_since(&self, previous: &Snapshot) -> Vec<ChangeRecord> {
        let upserts = self
            .mtimes
            .iter()
            .filter_map(|(path, modified)| match previous.mtimes.get(path) {
                None => Some(ChangeRecord::new(path, ChangeKind::New)),
                Some(before) if before != modified => {
                    Some(ChangeRecord::new(path, ChangeKind::Modified))
                }
                Some(_) => None,
            });

        let deletions = previous
            .mtimes
            .keys()
            .filter(|path| !self.mtimes.contains_key(*path))
            .map(|path| ChangeRecord::new(path, ChangeKind::Deleted));

        upserts.chain(deletions).collect()
    }
}

impl FromIterator<(PathBuf, SystemTime)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (PathBuf, SystemTime)>>(iter: I) -> Self {
        Self {
            mtimes: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ChangeKind {
    #[display("NEW")]
    New,
    #[display("MODIFIED")]
    Modified,
    #[display("DELETED")]
    Deleted,
}

impl ChangeKind {
    pub fn color(&self) -> Color {
        match self {
            ChangeKind::New => Color::Green,
            ChangeKind::Modified => Color::Yellow,
            ChangeKind::Deleted => Color::Red,
        }
    }
}

/// A single difference between two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeRecord {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

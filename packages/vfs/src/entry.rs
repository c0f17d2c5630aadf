//! The persisted entry record.

use serde::{Deserialize, Serialize};

use crate::path::Path;

/// Whether an entry is a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Directory,
    File,
}

/// Kind-specific payload of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryKind {
    /// A directory and the ordered paths of its children.
    Directory {
        #[serde(default)]
        contents: Vec<Path>,
    },
    /// A text file.
    File {
        #[serde(default)]
        content: String,
    },
}

/// A single node of the file system, keyed by its path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub path: Path,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl Entry {
    /// An empty directory.
    pub fn directory(path: Path) -> Self {
        Self {
            path,
            kind: EntryKind::Directory {
                contents: Vec::new(),
            },
        }
    }

    /// A file with the given content.
    pub fn file(path: Path, content: impl Into<String>) -> Self {
        Self {
            path,
            kind: EntryKind::File {
                content: content.into(),
            },
        }
    }

    pub fn entry_type(&self) -> EntryType {
        match self.kind {
            EntryKind::Directory { .. } => EntryType::Directory,
            EntryKind::File { .. } => EntryType::File,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.entry_type() == EntryType::Directory
    }

    /// Children of a directory, `None` for files.
    pub fn contents(&self) -> Option<&[Path]> {
        match &self.kind {
            EntryKind::Directory { contents } => Some(contents),
            EntryKind::File { .. } => None,
        }
    }

    /// Record `child` in this directory's listing.
    ///
    /// Returns `false` when the entry is not a directory. Adding a child
    /// that is already listed is a no-op.
    pub fn add_child(&mut self, child: &Path) -> bool {
        match &mut self.kind {
            EntryKind::Directory { contents } => {
                if !contents.contains(child) {
                    contents.push(child.clone());
                }
                true
            }
            EntryKind::File { .. } => false,
        }
    }

    /// Drop `child` from this directory's listing.
    ///
    /// Returns whether the listing changed.
    pub fn remove_child(&mut self, child: &Path) -> bool {
        match &mut self.kind {
            EntryKind::Directory { contents } => {
                let before = contents.len();
                contents.retain(|p| p != child);
                contents.len() != before
            }
            EntryKind::File { .. } => false,
        }
    }
}

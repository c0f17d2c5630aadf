//! Persistence backends.
//!
//! A backend holds two independent tables: the entry table keyed by path
//! and the append-only history table. Entry writes are grouped in a
//! [`Batch`] that the backend commits all-or-nothing, which is how a child
//! entry and its parent's listing always change together.

pub mod disk;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::entry::Entry;
use crate::error::Result;
use crate::path::Path;

pub use disk::JsonDiskBackend;
pub use memory::MemoryBackend;

/// One write inside a [`Batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Insert or replace the entry at its own path.
    Put(Entry),
    /// Remove the entry at the path, if any.
    Delete(Path),
}

/// A group of entry writes committed as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    ops: Vec<BatchOp>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn put(mut self, entry: Entry) -> Self {
        self.ops.push(BatchOp::Put(entry));
        self
    }

    #[must_use]
    pub fn delete(mut self, path: Path) -> Self {
        self.ops.push(BatchOp::Delete(path));
        self
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every op to an in-memory entry table.
    pub(crate) fn apply_to(&self, table: &mut BTreeMap<String, Entry>) {
        for op in &self.ops {
            match op {
                BatchOp::Put(entry) => {
                    table.insert(entry.path.key(), entry.clone());
                }
                BatchOp::Delete(path) => {
                    table.remove(&path.key());
                }
            }
        }
    }
}

/// Storage for entries and command history.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Look up the entry at `path`.
    async fn get(&self, path: &Path) -> Result<Option<Entry>>;

    /// Every stored entry, ordered by key.
    async fn scan(&self) -> Result<Vec<Entry>>;

    /// Apply all ops of `batch`, or none of them.
    async fn commit(&self, batch: Batch) -> Result<()>;

    /// The history table in insertion order.
    async fn load_history(&self) -> Result<Vec<String>>;

    /// Append one command to the history table.
    async fn append_history(&self, command: &str) -> Result<()>;
}

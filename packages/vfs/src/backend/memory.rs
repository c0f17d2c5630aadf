//! In-memory backend.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{Backend, Batch};
use crate::entry::Entry;
use crate::error::{Result, StoreError};
use crate::path::Path;

/// A backend that keeps both tables in memory.
///
/// Nothing outlives the process; used for `--memory` sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, Entry>>,
    history: Mutex<Vec<String>>,
    failing_commits: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn history(&self) -> MutexGuard<'_, Vec<String>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next commit fail before anything is applied.
    ///
    /// Simulates an interruption between the parent and child writes.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn fail_next_commit(&self) {
        self.failing_commits.fetch_add(1, Ordering::SeqCst);
    }

    /// Write an entry without touching its parent.
    ///
    /// Lets tests build the inconsistent tables that `check` must detect.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn insert_raw(&self, entry: Entry) {
        self.entries().insert(entry.path.key(), entry);
    }

    fn take_injected_failure(&self) -> bool {
        self.failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get(&self, path: &Path) -> Result<Option<Entry>> {
        Ok(self.entries().get(&path.key()).cloned())
    }

    async fn scan(&self) -> Result<Vec<Entry>> {
        Ok(self.entries().values().cloned().collect())
    }

    async fn commit(&self, batch: Batch) -> Result<()> {
        if self.take_injected_failure() {
            return Err(StoreError::CommitFailed {
                message: "injected failure".to_string(),
            });
        }

        let mut entries = self.entries();
        batch.apply_to(&mut entries);
        Ok(())
    }

    async fn load_history(&self) -> Result<Vec<String>> {
        Ok(self.history().clone())
    }

    async fn append_history(&self, command: &str) -> Result<()> {
        self.history().push(command.to_string());
        Ok(())
    }
}

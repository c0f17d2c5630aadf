//! Persisted command history with a recall cursor.

use std::sync::Arc;

use crate::backend::Backend;
use crate::error::Result;

/// Ordered record of submitted command lines.
///
/// New commands go to the end and reset the cursor past the end.
/// `previous` and `next` only move the cursor.
pub struct HistoryLog {
    backend: Option<Arc<dyn Backend>>,
    entries: Vec<String>,
    index: usize,
}

impl HistoryLog {
    /// A log that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            backend: None,
            entries: Vec::new(),
            index: 0,
        }
    }

    /// Load the history table from `backend` and persist new commands to it.
    pub async fn load(backend: Arc<dyn Backend>) -> Result<Self> {
        let entries = backend.load_history().await?;
        log::debug!("Loaded {} history entries", entries.len());
        let index = entries.len();
        Ok(Self {
            backend: Some(backend),
            entries,
            index,
        })
    }

    /// Append a command; blank lines are ignored.
    pub async fn record(&mut self, command: &str) -> Result<()> {
        let command = command.trim();
        if command.is_empty() {
            return Ok(());
        }
        if let Some(backend) = &self.backend {
            backend.append_history(command).await?;
        }
        self.entries.push(command.to_string());
        self.index = self.entries.len();
        Ok(())
    }

    /// Move the cursor back and return that command.
    pub fn previous(&mut self) -> Option<&str> {
        if self.index > 0 {
            self.index -= 1;
            self.entries.get(self.index).map(String::as_str)
        } else {
            None
        }
    }

    /// Move the cursor forward and return that command.
    ///
    /// Stepping past the newest command returns `None` and parks the cursor
    /// past the end, where the input line is blank again.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&str> {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            self.entries.get(self.index).map(String::as_str)
        } else {
            self.index = self.entries.len();
            None
        }
    }

    /// Park the cursor past the newest command.
    pub fn reset_cursor(&mut self) {
        self.index = self.entries.len();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::in_memory()
    }
}

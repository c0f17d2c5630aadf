use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::{fs, path as fs_path};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Backend, Batch};
use crate::entry::Entry;
use crate::error::{Result, StoreError};
use crate::path::Path;

const ENTRIES_FILE: &str = "entries.json";
const HISTORY_FILE: &str = "history.jsonl";

/// A backend persisting both tables as JSON files under a directory.
///
/// The entry table lives in `entries.json` as a map from path to entry and
/// is rewritten through a temporary file plus rename on every commit, so a
/// commit either lands completely or not at all. The history table lives
/// in `history.jsonl`, one JSON string per line.
///
/// The rewrite runs on tokio's blocking pool with the table lock held, so
/// commits apply in order.
pub struct JsonDiskBackend {
    root: fs_path::PathBuf,
    entries: Mutex<BTreeMap<String, Entry>>,
}

impl JsonDiskBackend {
    /// Open the store rooted at `root`, which must be a writable directory.
    pub fn open(root: fs_path::PathBuf) -> Result<JsonDiskBackend> {
        let attr = fs::metadata(&root).map_err(|error| StoreError::RootPathInvalid {
            path: root.clone(),
            error,
        })?;

        if !attr.is_dir() {
            return Err(StoreError::RootPathInvalid {
                path: root,
                error: io::Error::other("Root path must be a directory."),
            });
        }

        if attr.permissions().readonly() {
            return Err(StoreError::RootPathInvalid {
                path: root,
                error: io::Error::other("Root directory must be writable"),
            });
        }

        let root = root
            .canonicalize()
            .map_err(|error| StoreError::RootPathInvalid {
                path: root.clone(),
                error,
            })?;

        let entries = Self::load_entries(&root.join(ENTRIES_FILE))?;
        log::debug!(
            "Opened store at {} with {} entries",
            root.display(),
            entries.len()
        );

        Ok(JsonDiskBackend {
            root,
            entries: Mutex::new(entries),
        })
    }

    /// Create `root` (and its parents) if needed, then open it.
    pub fn create(root: fs_path::PathBuf) -> Result<JsonDiskBackend> {
        fs::create_dir_all(&root).map_err(|error| StoreError::RootPathInvalid {
            path: root.clone(),
            error,
        })?;
        Self::open(root)
    }

    /// The canonical directory holding the tables.
    pub fn root(&self) -> &fs_path::Path {
        &self.root
    }

    fn load_entries(file_path: &fs_path::Path) -> Result<BTreeMap<String, Entry>> {
        log::debug!("Reading {}...", file_path.display());
        let file = match fs::File::open(file_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        let reader = io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    fn write_entries(root: &fs_path::Path, table: &BTreeMap<String, Entry>) -> Result<()> {
        let file_path = root.join(ENTRIES_FILE);
        log::debug!("Writing {}...", file_path.display());

        let mut tmp = tempfile::NamedTempFile::new_in(root)?;
        serde_json::to_writer_pretty(&mut tmp, table)?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&file_path).map_err(|e| StoreError::CommitFailed {
            message: format!(
                "could not replace {} with error: {}",
                file_path.display(),
                e.error
            ),
        })?;
        Ok(())
    }
}

#[async_trait]
impl Backend for JsonDiskBackend {
    async fn get(&self, path: &Path) -> Result<Option<Entry>> {
        Ok(self.entries.lock().await.get(&path.key()).cloned())
    }

    async fn scan(&self) -> Result<Vec<Entry>> {
        Ok(self.entries.lock().await.values().cloned().collect())
    }

    async fn commit(&self, batch: Batch) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        batch.apply_to(&mut next);

        let root = self.root.clone();
        let next = tokio::task::spawn_blocking(move || {
            Self::write_entries(&root, &next).map(|()| next)
        })
        .await
        .map_err(|e| StoreError::CommitFailed {
            message: format!("entry table writer stopped: {}", e),
        })??;

        *entries = next;
        Ok(())
    }

    async fn load_history(&self) -> Result<Vec<String>> {
        let file_path = self.root.join(HISTORY_FILE);
        let file = match fs::File::open(&file_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut history = Vec::new();
        for (number, line) in io::BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<String>(&line) {
                Ok(command) => history.push(command),
                Err(e) => log::warn!(
                    "Skipping malformed history line {} in {}: {}",
                    number + 1,
                    file_path.display(),
                    e
                ),
            }
        }
        Ok(history)
    }

    async fn append_history(&self, command: &str) -> Result<()> {
        let file_path = self.root.join(HISTORY_FILE);
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;
        let mut line = serde_json::to_string(command)?;
        line.push('\n');
        f.write_all(line.as_bytes())?;
        Ok(())
    }
}

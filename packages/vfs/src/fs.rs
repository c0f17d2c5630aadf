//! The file system operations.
//!
//! Every create and delete commits the child write and the parent listing
//! update in a single [`Batch`]. Mutations are serialized by an async lock
//! so two commands can never interleave their read-modify-write of the same
//! parent directory.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::backend::{Backend, Batch};
use crate::entry::{Entry, EntryKind, EntryType};
use crate::error::{Result, StoreError};
use crate::path::Path;

/// A disagreement between an entry and its parent's listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// The root directory is absent or is not a directory.
    MissingRoot,
    /// An entry exists but its parent does not list it.
    Unlisted { path: Path, parent: Path },
    /// A directory lists a child that does not exist.
    Dangling { parent: Path, child: Path },
    /// A directory lists a path whose parent is a different directory.
    Misplaced { parent: Path, child: Path },
    /// A directory lists the same child more than once.
    Duplicate { parent: Path, child: Path },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconsistency::MissingRoot => write!(f, "root directory is missing"),
            Inconsistency::Unlisted { path, parent } => {
                write!(f, "{} exists but is not listed by {}", path, parent)
            }
            Inconsistency::Dangling { parent, child } => {
                write!(f, "{} lists missing entry {}", parent, child)
            }
            Inconsistency::Misplaced { parent, child } => {
                write!(f, "{} lists {} which belongs elsewhere", parent, child)
            }
            Inconsistency::Duplicate { parent, child } => {
                write!(f, "{} lists {} more than once", parent, child)
            }
        }
    }
}

/// The persistent hierarchical file system.
#[derive(Clone)]
pub struct FileSystem {
    backend: Arc<dyn Backend>,
    mutation: Arc<Mutex<()>>,
}

impl FileSystem {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            mutation: Arc::new(Mutex::new(())),
        }
    }

    /// Open a file system and make sure the root directory exists.
    pub async fn open(backend: Arc<dyn Backend>) -> Result<Self> {
        let fs = Self::new(backend);
        fs.init().await?;
        Ok(fs)
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Create the root directory if it is missing.
    pub async fn init(&self) -> Result<()> {
        match self.create_directory(&Path::root()).await {
            Ok(()) => {
                log::info!("Initialized empty file system");
                Ok(())
            }
            Err(StoreError::AlreadyExists(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.backend.get(path).await?.is_some())
    }

    /// The type of the entry at `path`, if any.
    pub async fn entry_type(&self, path: &Path) -> Result<Option<EntryType>> {
        Ok(self.backend.get(path).await?.map(|e| e.entry_type()))
    }

    pub async fn create_directory(&self, path: &Path) -> Result<()> {
        let _guard = self.mutation.lock().await;
        self.create_entry(Entry::directory(path.clone())).await
    }

    pub async fn create_file(&self, path: &Path, content: &str) -> Result<()> {
        let _guard = self.mutation.lock().await;
        self.create_entry(Entry::file(path.clone(), content)).await
    }

    /// Replace the content of a file, creating it if it does not exist.
    pub async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let _guard = self.mutation.lock().await;
        match self.backend.get(path).await? {
            Some(mut entry) => match &mut entry.kind {
                EntryKind::File { content: existing } => {
                    *existing = content.to_string();
                    self.backend.commit(Batch::new().put(entry)).await
                }
                EntryKind::Directory { .. } => Err(StoreError::NotAFile(path.clone())),
            },
            None => self.create_entry(Entry::file(path.clone(), content)).await,
        }
    }

    pub async fn read_file(&self, path: &Path) -> Result<String> {
        match self.backend.get(path).await? {
            Some(Entry {
                kind: EntryKind::File { content },
                ..
            }) => Ok(content),
            Some(_) => Err(StoreError::NotAFile(path.clone())),
            None => Err(StoreError::NotFound(path.clone())),
        }
    }

    pub async fn list_directory(&self, path: &Path) -> Result<Vec<Path>> {
        match self.backend.get(path).await? {
            Some(Entry {
                kind: EntryKind::Directory { contents },
                ..
            }) => Ok(contents),
            Some(_) => Err(StoreError::NotADirectory(path.clone())),
            None => Err(StoreError::NotFound(path.clone())),
        }
    }

    /// Delete a file or an empty directory and unlist it from its parent.
    pub async fn delete_entry(&self, path: &Path) -> Result<()> {
        let _guard = self.mutation.lock().await;

        let entry = self
            .backend
            .get(path)
            .await?
            .ok_or_else(|| StoreError::NotFound(path.clone()))?;

        if path.is_root() {
            return Err(StoreError::RootDirectory);
        }
        if entry.contents().is_some_and(|contents| !contents.is_empty()) {
            return Err(StoreError::DirectoryNotEmpty(path.clone()));
        }

        let mut batch = Batch::new();
        if let Some(mut parent) = self.backend.get(&path.parent()).await? {
            if parent.remove_child(path) {
                batch = batch.put(parent);
            }
        }
        batch = batch.delete(path.clone());

        log::debug!("Deleting {}", path);
        self.backend.commit(batch).await
    }

    /// Audit the whole table for listing disagreements.
    pub async fn check(&self) -> Result<Vec<Inconsistency>> {
        let entries: BTreeMap<Path, Entry> = self
            .backend
            .scan()
            .await?
            .into_iter()
            .map(|e| (e.path.clone(), e))
            .collect();

        let mut problems = Vec::new();

        match entries.get(&Path::root()) {
            Some(root) if root.is_directory() => {}
            _ => problems.push(Inconsistency::MissingRoot),
        }

        for (path, entry) in &entries {
            if !path.is_root() {
                let parent = path.parent();
                let listed = entries
                    .get(&parent)
                    .and_then(Entry::contents)
                    .is_some_and(|contents| contents.contains(path));
                if !listed {
                    problems.push(Inconsistency::Unlisted {
                        path: path.clone(),
                        parent,
                    });
                }
            }

            if let Some(contents) = entry.contents() {
                let mut seen = BTreeSet::new();
                for child in contents {
                    if !seen.insert(child) {
                        problems.push(Inconsistency::Duplicate {
                            parent: path.clone(),
                            child: child.clone(),
                        });
                    } else if child.parent() != *path || child.is_root() {
                        problems.push(Inconsistency::Misplaced {
                            parent: path.clone(),
                            child: child.clone(),
                        });
                    } else if !entries.contains_key(child) {
                        problems.push(Inconsistency::Dangling {
                            parent: path.clone(),
                            child: child.clone(),
                        });
                    }
                }
            }
        }

        Ok(problems)
    }

    /// Insert a new entry and list it in its parent, in one batch.
    ///
    /// Callers hold the mutation lock.
    async fn create_entry(&self, entry: Entry) -> Result<()> {
        let path = entry.path.clone();
        if self.backend.get(&path).await?.is_some() {
            return Err(StoreError::AlreadyExists(path));
        }

        let mut batch = Batch::new();
        if !path.is_root() {
            let mut parent = match self.backend.get(&path.parent()).await? {
                Some(parent) if parent.is_directory() => parent,
                _ => return Err(StoreError::ParentMissing(path.parent())),
            };
            parent.add_child(&path);
            batch = batch.put(parent);
        }
        batch = batch.put(entry);

        log::debug!("Creating {}", path);
        self.backend.commit(batch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::path;

    async fn fresh() -> (Arc<MemoryBackend>, FileSystem) {
        let backend = Arc::new(MemoryBackend::new());
        let fs = FileSystem::open(backend.clone()).await.unwrap();
        (backend, fs)
    }

    #[tokio::test]
    async fn open_creates_root_once() {
        let (backend, fs) = fresh().await;
        fs.init().await.unwrap();
        assert_eq!(backend.scan().await.unwrap().len(), 1);
        assert!(fs.list_directory(&Path::root()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_directory_lists_in_parent() {
        let (_, fs) = fresh().await;
        fs.create_directory(&path!("root/docs")).await.unwrap();
        assert_eq!(
            fs.list_directory(&Path::root()).await.unwrap(),
            vec![path!("root/docs")]
        );
        assert_eq!(
            fs.entry_type(&path!("root/docs")).await.unwrap(),
            Some(EntryType::Directory)
        );
    }

    #[tokio::test]
    async fn create_in_missing_parent_fails() {
        let (_, fs) = fresh().await;
        let err = fs
            .create_file(&path!("root/nope/a.txt"), "")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ParentMissing(p) if p == path!("root/nope")));
    }

    #[tokio::test]
    async fn create_under_file_fails() {
        let (_, fs) = fresh().await;
        fs.create_file(&path!("root/a"), "").await.unwrap();
        let err = fs.create_directory(&path!("root/a/b")).await.unwrap_err();
        assert!(matches!(err, StoreError::ParentMissing(_)));
    }

    #[tokio::test]
    async fn write_file_creates_then_overwrites() {
        let (_, fs) = fresh().await;
        let p = path!("root/a.txt");
        fs.write_file(&p, "one").await.unwrap();
        fs.write_file(&p, "two").await.unwrap();
        assert_eq!(fs.read_file(&p).await.unwrap(), "two");
        assert_eq!(fs.list_directory(&Path::root()).await.unwrap(), vec![p]);
    }

    #[tokio::test]
    async fn write_file_on_directory_fails() {
        let (_, fs) = fresh().await;
        fs.create_directory(&path!("root/d")).await.unwrap();
        let err = fs.write_file(&path!("root/d"), "x").await.unwrap_err();
        assert!(matches!(err, StoreError::NotAFile(_)));
    }

    #[tokio::test]
    async fn read_file_errors() {
        let (_, fs) = fresh().await;
        assert!(matches!(
            fs.read_file(&path!("root/missing")).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            fs.read_file(&Path::root()).await,
            Err(StoreError::NotAFile(_))
        ));
    }

    #[tokio::test]
    async fn list_directory_errors() {
        let (_, fs) = fresh().await;
        fs.create_file(&path!("root/f"), "").await.unwrap();
        assert!(matches!(
            fs.list_directory(&path!("root/f")).await,
            Err(StoreError::NotADirectory(_))
        ));
        assert!(matches!(
            fs.list_directory(&path!("root/missing")).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_missing_fails() {
        let (_, fs) = fresh().await;
        assert!(matches!(
            fs.delete_entry(&path!("root/missing")).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn root_cannot_be_deleted() {
        let (_, fs) = fresh().await;
        assert!(matches!(
            fs.delete_entry(&Path::root()).await,
            Err(StoreError::RootDirectory)
        ));
        assert!(fs.exists(&Path::root()).await.unwrap());
    }

    #[tokio::test]
    async fn failed_create_commit_leaves_parent_untouched() {
        let (backend, fs) = fresh().await;
        backend.fail_next_commit();

        let err = fs.create_directory(&path!("root/x")).await.unwrap_err();
        assert!(matches!(err, StoreError::CommitFailed { .. }));
        assert!(!fs.exists(&path!("root/x")).await.unwrap());
        assert!(fs.list_directory(&Path::root()).await.unwrap().is_empty());
        assert!(fs.check().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_commit_leaves_both_in_place() {
        let (backend, fs) = fresh().await;
        fs.create_file(&path!("root/a"), "x").await.unwrap();
        backend.fail_next_commit();

        assert!(fs.delete_entry(&path!("root/a")).await.is_err());
        assert_eq!(fs.read_file(&path!("root/a")).await.unwrap(), "x");
        assert_eq!(
            fs.list_directory(&Path::root()).await.unwrap(),
            vec![path!("root/a")]
        );
        assert!(fs.check().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn check_reports_unlisted_and_dangling() {
        let (backend, fs) = fresh().await;
        backend.insert_raw(Entry::file(path!("root/orphan"), ""));

        let mut root = Entry::directory(Path::root());
        root.add_child(&path!("root/ghost"));
        backend.insert_raw(root);

        let problems = fs.check().await.unwrap();
        assert!(problems.contains(&Inconsistency::Unlisted {
            path: path!("root/orphan"),
            parent: Path::root(),
        }));
        assert!(problems.contains(&Inconsistency::Dangling {
            parent: Path::root(),
            child: path!("root/ghost"),
        }));
    }

    #[tokio::test]
    async fn check_reports_missing_root() {
        let backend = Arc::new(MemoryBackend::new());
        let fs = FileSystem::new(backend);
        assert_eq!(fs.check().await.unwrap(), vec![Inconsistency::MissingRoot]);
    }

    #[tokio::test]
    async fn concurrent_creates_in_one_directory_all_land() {
        let (_, fs) = fresh().await;
        let mut tasks = Vec::new();
        for i in 0..16 {
            let fs = fs.clone();
            tasks.push(tokio::spawn(async move {
                fs.create_file(&path!(&format!("root/f{}", i)), "").await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(fs.list_directory(&Path::root()).await.unwrap().len(), 16);
        assert!(fs.check().await.unwrap().is_empty());
    }
}

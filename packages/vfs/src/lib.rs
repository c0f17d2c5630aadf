//! # webos-vfs
//!
//! A persistent hierarchical file system keyed by path.
//!
//! Entries are either directories (holding the ordered paths of their
//! children) or text files. Every create and delete updates the parent's
//! listing in the same atomic batch as the child write.
//!
//! ## Layers
//!
//! - [`Backend`]: the two persisted tables (entries and history), with an
//!   in-memory implementation and a JSON-on-disk implementation
//! - [`FileSystem`]: the file system operations and the consistency audit
//! - [`HistoryLog`]: submitted command lines with a recall cursor
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use webos_vfs::{path, FileSystem, MemoryBackend};
//!
//! let fs = FileSystem::open(Arc::new(MemoryBackend::new())).await?;
//! fs.create_directory(&path!("root/docs")).await?;
//! fs.write_file(&path!("root/docs/note.md"), "# Hi").await?;
//! assert_eq!(fs.list_directory(&path!("root/docs")).await?.len(), 1);
//! ```

pub mod backend;
pub mod entry;
pub mod error;
pub mod fs;
pub mod history;
pub mod path;

pub use backend::{Backend, Batch, BatchOp, JsonDiskBackend, MemoryBackend};
pub use entry::{Entry, EntryKind, EntryType};
pub use error::{Result, StoreError};
pub use fs::{FileSystem, Inconsistency};
pub use history::HistoryLog;
pub use path::{Path, PathError, ROOT};

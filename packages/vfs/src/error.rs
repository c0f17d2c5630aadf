//! Error types for the store.

use std::path::PathBuf;

use crate::path::{Path, PathError};

/// Errors raised by store operations and backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Path already exists: {0}")]
    AlreadyExists(Path),

    #[error("Entry not found: {0}")]
    NotFound(Path),

    #[error("The specified path is not a file: {0}")]
    NotAFile(Path),

    #[error("Not a directory: {0}")]
    NotADirectory(Path),

    #[error("Parent directory not found or is not a directory: {0}")]
    ParentMissing(Path),

    #[error("Directory is not empty: {0}")]
    DirectoryNotEmpty(Path),

    #[error("The root directory cannot be deleted")]
    RootDirectory,

    #[error("Invalid path: {0}")]
    Path(#[from] PathError),

    #[error("Store root ({}) is invalid: {error}", path.display())]
    RootPathInvalid {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Commit failed: {message}")]
    CommitFailed { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn messages_name_the_path() {
        let e = StoreError::DirectoryNotEmpty(path!("root/docs"));
        assert_eq!(e.to_string(), "Directory is not empty: root/docs");

        let e = StoreError::AlreadyExists(path!("root/a"));
        assert!(e.to_string().starts_with("Path already exists"));
    }

    #[test]
    fn path_error_converts() {
        let e: StoreError = PathError::InvalidPath {
            message: "bad".to_string(),
        }
        .into();
        assert!(matches!(e, StoreError::Path(_)));
        assert!(e.to_string().contains("bad"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: StoreError = io_err.into();
        assert!(matches!(e, StoreError::Io(_)));
    }
}

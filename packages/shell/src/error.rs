use webos_vfs::{PathError, StoreError};

use crate::io::IoError;

/// Errors a command can fail with.
///
/// The message is what the user sees after `Error: `.
#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Http(#[from] webos_http::Error),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Usage: {usage}")]
    Usage { usage: &'static str },

    #[error("Path already exists")]
    PathExists,

    #[error("File does not exist")]
    FileMissing,

    #[error("File '{0}' already exists.")]
    TargetExists(String),

    #[error("Already at root directory.")]
    AtRoot,

    #[error("Directory not found")]
    DirectoryNotFound,

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Could not determine a data directory; pass --data-dir or --memory")]
    NoDataDir,

    #[error(transparent)]
    Terminal(#[from] IoError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;
    use webos_vfs::path;

    #[test]
    fn user_facing_messages() {
        assert_eq!(ShellError::PathExists.to_string(), "Path already exists");
        assert_eq!(ShellError::FileMissing.to_string(), "File does not exist");
        assert_eq!(
            ShellError::AtRoot.to_string(),
            "Already at root directory."
        );
        assert_eq!(
            ShellError::TargetExists("a.txt".to_string()).to_string(),
            "File 'a.txt' already exists."
        );
        assert_eq!(
            ShellError::Usage {
                usage: "mkdir <name>"
            }
            .to_string(),
            "Usage: mkdir <name>"
        );
    }

    #[test]
    fn store_errors_pass_through() {
        let err: ShellError = StoreError::DirectoryNotEmpty(path!("root/a")).into();
        assert_eq!(
            err.to_string(),
            StoreError::DirectoryNotEmpty(path!("root/a")).to_string()
        );
    }
}

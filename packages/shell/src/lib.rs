//! # webos-shell
//!
//! A line-oriented shell over the `webos-vfs` file system.
//!
//! ## Features
//!
//! - Directories and text files persisted between sessions
//! - Markdown rendering for `cat` on `.md` files
//! - `wget` for single URLs and `clone` for GitHub repositories
//! - Tab completion and highlighting of command names
//! - Vi mode support (detected from EDITOR, .inputrc, or WEBOS_EDIT_MODE)
//! - Command history that survives restarts
//!
//! ## Usage
//!
//! ```bash
//! webos
//!
//! # Inside the shell:
//! root > mkdir notes
//! root > cd notes
//! root/notes > touch todo.md
//! root/notes > add todo.md # Today
//! root/notes > cat todo.md
//! ```

pub mod commands;
pub mod completer;
pub mod config;
pub mod error;
pub mod highlighter;
pub mod host;
pub mod io;
pub mod markdown;
pub mod repl;
pub mod session;
pub mod shell;

pub use config::{Args, ShellConfig};
pub use error::ShellError;
pub use repl::{run, ReplCore};
pub use session::Session;
pub use shell::{Outcome, Shell};

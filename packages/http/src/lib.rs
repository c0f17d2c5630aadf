//! # webos-http
//!
//! Network access for the shell's `wget` and `clone` commands.
//!
//! Every request goes through an [`HttpExecutor`], so the commands can be
//! tested without a network:
//!
//! ```ignore
//! use webos_http::{fetch_text, ReqwestExecutor};
//!
//! let executor = ReqwestExecutor::new(None)?;
//! let body = fetch_text(&executor, "https://example.com/notes.md").await?;
//! ```
//!
//! [`GitHubClient`] walks a repository through the REST API: metadata for
//! the default branch, a recursive tree listing, then one raw fetch per
//! blob.

pub mod error;
pub mod executor;
pub mod fetch;
pub mod github;
pub mod types;

pub use error::Error;
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use fetch::fetch_text;
pub use github::{GitHubClient, RepoUrl, TreeEntry, TreeEntryKind, DEFAULT_API_BASE};
pub use types::{HttpRequest, HttpResponse};

#[cfg(any(test, feature = "test-utils"))]
pub use executor::mock::MockExecutor;

//! A read-only client for the GitHub REST API, enough to copy a repository.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::error::Error;
use crate::executor::HttpExecutor;
use crate::types::{HttpRequest, HttpResponse};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";
const FALLBACK_BRANCH: &str = "main";

lazy_static! {
    static ref REPO_URL: Regex = Regex::new(r"github\.com/([^/]+)/([^/]+)").unwrap();
}

/// The owner and name of a repository, taken from a user-supplied URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl {
    /// The URL with surrounding quotes removed.
    pub url: String,
    pub owner: String,
    pub repo: String,
}

impl RepoUrl {
    pub fn parse(raw: &str) -> Result<RepoUrl, Error> {
        let url = strip_quotes(raw).to_string();
        let captures = REPO_URL
            .captures(&url)
            .ok_or_else(|| Error::InvalidRepositoryUrl { url: url.clone() })?;
        let owner = captures[1].to_string();
        let repo = captures[2].trim_end_matches(".git").to_string();
        if repo.is_empty() {
            return Err(Error::InvalidRepositoryUrl { url });
        }
        Ok(RepoUrl { url, owner, repo })
    }

    /// Directory name to clone into when none is given: the last URL
    /// segment without a `.git` suffix.
    pub fn default_dir_name(&self) -> String {
        let last = self
            .url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.repo);
        last.strip_suffix(".git").unwrap_or(last).to_string()
    }
}

fn strip_quotes(raw: &str) -> &str {
    let raw = raw.strip_prefix(['"', '\'']).unwrap_or(raw);
    raw.strip_suffix(['"', '\'']).unwrap_or(raw)
}

#[derive(Debug, Deserialize)]
struct RepositoryMetadata {
    #[serde(default)]
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Option<Vec<TreeEntry>>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    Tree,
    Blob,
    /// Submodule pointer.
    Commit,
    #[serde(other)]
    Other,
}

/// One item of a recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    /// Slash-separated path relative to the repository root.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
    /// API URL of the blob or subtree.
    #[serde(default)]
    pub url: Option<String>,
}

pub struct GitHubClient {
    executor: Arc<dyn HttpExecutor>,
    api_base: Url,
}

impl GitHubClient {
    pub fn new(executor: Arc<dyn HttpExecutor>, api_base: &str) -> Result<GitHubClient, Error> {
        Ok(GitHubClient {
            executor,
            api_base: Url::parse(api_base)?,
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, request: HttpRequest, context: &str) -> Result<HttpResponse, Error> {
        let response = self.executor.execute(&request).await?;
        if !response.is_success() {
            return Err(Error::Status {
                context: context.to_string(),
                status: response.status,
                status_text: response.status_text,
            });
        }
        Ok(response)
    }

    /// The repository's default branch, `main` if the API omits it.
    pub async fn default_branch(&self, repo: &RepoUrl) -> Result<String, Error> {
        let url = self.endpoint(&["repos", &repo.owner, &repo.repo])?;
        let response = self
            .get(
                HttpRequest::get(url.as_str()),
                "Failed to fetch repository metadata",
            )
            .await?;
        let metadata: RepositoryMetadata = response.json()?;
        Ok(metadata
            .default_branch
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| FALLBACK_BRANCH.to_string()))
    }

    /// The full recursive tree of `branch`, parents before children.
    pub async fn tree(&self, repo: &RepoUrl, branch: &str) -> Result<Vec<TreeEntry>, Error> {
        let mut url = self.endpoint(&["repos", &repo.owner, &repo.repo, "git", "trees", branch])?;
        url.query_pairs_mut().append_pair("recursive", "1");

        let response = self
            .get(HttpRequest::get(url.as_str()), "Failed to fetch repository")
            .await?;
        let listing: TreeResponse = response.json()?;
        if listing.truncated {
            log::warn!(
                "Tree listing for {}/{} was truncated by the server",
                repo.owner,
                repo.repo
            );
        }
        listing.tree.ok_or_else(|| Error::MalformedTree {
            message: "Failed to retrieve repository structure.".to_string(),
        })
    }

    /// Raw content of a blob entry.
    pub async fn blob(&self, entry: &TreeEntry) -> Result<String, Error> {
        let url = entry.url.as_deref().ok_or_else(|| Error::MalformedTree {
            message: format!("Tree entry '{}' has no URL", entry.path),
        })?;
        let response = self
            .get(
                HttpRequest::get(url).with_header("Accept", RAW_MEDIA_TYPE),
                &format!("Failed to fetch file {}", entry.path),
            )
            .await?;
        Ok(response.body)
    }
}

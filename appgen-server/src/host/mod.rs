//! Remote repository hosting.
//!
//! [`RepoHost`] is the seam the deployment service talks to; [`GithubClient`]
//! implements it against the GitHub REST API.

pub mod github;

pub use github::GithubClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostUser {
    pub login: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRepo {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub auto_init: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostRepo {
    pub name: String,
    pub html_url: String,
}

/// A single file committed to a repository. `content` is the raw text;
/// encoding for the wire is the host's concern.
#[derive(Debug, Clone)]
pub struct FileCommit {
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub message: String,
    pub content: String,
}

#[derive(Error, Debug)]
pub enum HostError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Every call takes the caller's credential; the client holds none.
#[async_trait]
pub trait RepoHost: Send + Sync {
    async fn authenticated_user(&self, token: &str) -> Result<HostUser, HostError>;

    async fn create_repo(
        &self,
        token: &str,
        repo: &NewRepo,
    ) -> Result<HostRepo, HostError>;

    async fn put_file(
        &self,
        token: &str,
        commit: &FileCommit,
    ) -> Result<(), HostError>;
}

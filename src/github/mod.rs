//! Remote tracker abstraction layer
//!
//! The [Tracker] trait is the fixed capability surface the rest of the crate
//! consumes: credential validation plus repository, pull request and issue
//! lookups. All calls are blocking request/response.
//!
//! - [client::GithubClient]: GitHub REST implementation over `reqwest`
//! - [mock::MockTracker]: in-memory implementation for tests
//!
//! A [Connector] turns stored credentials into a tracker, so the session
//! manager can be exercised without a network.

pub mod client;
pub mod mock;

pub use client::{GithubClient, GithubConnector};
pub use mock::{MockConnector, MockTracker, TrackerCall};

use crate::config::GithubConfig;
use crate::error::Result;
use regex::Regex;
use std::fmt;

/// `owner/name` of a repository on the tracker
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        RepoSlug {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Extracts the slug from a remote URL.
    ///
    /// Supports `https://host/owner/name(.git)`, `ssh://git@host/owner/name`
    /// and scp-like `git@host:owner/name.git`.
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let re = Regex::new(r"^(?:[a-z+]+://)?(?:[^@/]+@)?[^/:]+(?::\d+)?[:/](.+)/([^/]+?)(?:\.git)?/?$")
            .ok()?;
        let captures = re.captures(url.trim())?;
        let owner = captures.get(1)?.as_str();
        let name = captures.get(2)?.as_str();
        // Nested groups keep only the last path segment as owner
        let owner = owner.rsplit('/').next().unwrap_or(owner);
        Some(RepoSlug::new(owner, name))
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub slug: RepoSlug,
    pub html_url: Option<String>,
    pub default_branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub labels: Vec<String>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub labels: Vec<String>,
    pub html_url: Option<String>,
    pub head_ref: Option<String>,
}

/// Capability surface of the remote issue/PR tracker.
///
/// Every call may fail with `Unauthorized` or `NotFound`; transport failures
/// surface verbatim.
pub trait Tracker {
    /// Whether the credentials this tracker was built with are accepted
    fn is_credential_valid(&self) -> Result<bool>;

    fn repository(&self, slug: &RepoSlug) -> Result<RepositoryInfo>;

    fn pull_request(&self, slug: &RepoSlug, number: u64) -> Result<PullRequest>;

    fn issue(&self, slug: &RepoSlug, number: u64) -> Result<Issue>;
}

/// Builds trackers from stored credentials
pub trait Connector {
    type Tracker: Tracker;

    fn connect(&self, credentials: &GithubConfig) -> Result<Self::Tracker>;
}

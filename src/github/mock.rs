use crate::config::GithubConfig;
use crate::error::{Result, UnicornError};
use crate::github::{Connector, Issue, PullRequest, RepoSlug, RepositoryInfo, Tracker};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// A request made against a [MockTracker]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    ValidateCredentials,
    Repository(String),
    PullRequest(String, u64),
    Issue(String, u64),
}

#[derive(Debug, Clone, Default)]
struct MockData {
    repositories: HashMap<RepoSlug, RepositoryInfo>,
    pull_requests: HashMap<(RepoSlug, u64), PullRequest>,
    issues: HashMap<(RepoSlug, u64), Issue>,
}

/// In-memory tracker for tests.
///
/// Clones share their data and their call log.
#[derive(Debug, Clone)]
pub struct MockTracker {
    valid: bool,
    data: Arc<MockData>,
    calls: Arc<Mutex<Vec<TrackerCall>>>,
}

impl MockTracker {
    /// Create an empty tracker that accepts its credentials
    pub fn new() -> Self {
        MockTracker {
            valid: true,
            data: Arc::new(MockData::default()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    pub fn with_repository(mut self, slug: RepoSlug) -> Self {
        let info = RepositoryInfo {
            html_url: Some(format!("https://github.com/{}", slug)),
            default_branch: Some("main".to_string()),
            slug: slug.clone(),
        };
        Arc::make_mut(&mut self.data).repositories.insert(slug, info);
        self
    }

    pub fn with_pull_request(mut self, slug: RepoSlug, pull_request: PullRequest) -> Self {
        Arc::make_mut(&mut self.data)
            .pull_requests
            .insert((slug, pull_request.number), pull_request);
        self
    }

    pub fn with_issue(mut self, slug: RepoSlug, issue: Issue) -> Self {
        Arc::make_mut(&mut self.data)
            .issues
            .insert((slug, issue.number), issue);
        self
    }

    /// Requests made so far, oldest first
    pub fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: TrackerCall) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.valid {
            Ok(())
        } else {
            Err(UnicornError::Unauthorized("bad credentials".to_string()))
        }
    }
}

impl Default for MockTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker for MockTracker {
    fn is_credential_valid(&self) -> Result<bool> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(TrackerCall::ValidateCredentials);
        }
        Ok(self.valid)
    }

    fn repository(&self, slug: &RepoSlug) -> Result<RepositoryInfo> {
        self.record(TrackerCall::Repository(slug.to_string()))?;
        self.data
            .repositories
            .get(slug)
            .cloned()
            .ok_or_else(|| UnicornError::NotFound(format!("repository {}", slug)))
    }

    fn pull_request(&self, slug: &RepoSlug, number: u64) -> Result<PullRequest> {
        self.record(TrackerCall::PullRequest(slug.to_string(), number))?;
        self.data
            .pull_requests
            .get(&(slug.clone(), number))
            .cloned()
            .ok_or_else(|| UnicornError::NotFound(format!("pull request #{}", number)))
    }

    fn issue(&self, slug: &RepoSlug, number: u64) -> Result<Issue> {
        self.record(TrackerCall::Issue(slug.to_string(), number))?;
        self.data
            .issues
            .get(&(slug.clone(), number))
            .cloned()
            .ok_or_else(|| UnicornError::NotFound(format!("issue #{}", number)))
    }
}

/// Connector whose trackers accept only the listed secrets
#[derive(Debug, Clone)]
pub struct MockConnector {
    tracker: MockTracker,
    valid_secrets: HashSet<String>,
    connections: Arc<Mutex<Vec<GithubConfig>>>,
}

impl MockConnector {
    pub fn new(tracker: MockTracker) -> Self {
        MockConnector {
            tracker,
            valid_secrets: HashSet::new(),
            connections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Accept a password or token
    pub fn accepting(mut self, secret: impl Into<String>) -> Self {
        self.valid_secrets.insert(secret.into());
        self
    }

    /// Credentials passed to `connect`, oldest first
    pub fn connections(&self) -> Vec<GithubConfig> {
        self.connections
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl Connector for MockConnector {
    type Tracker = MockTracker;

    fn connect(&self, credentials: &GithubConfig) -> Result<MockTracker> {
        if let Ok(mut connections) = self.connections.lock() {
            connections.push(credentials.clone());
        }
        let valid = [&credentials.oauth_token, &credentials.password]
            .into_iter()
            .flatten()
            .any(|secret| self.valid_secrets.contains(secret));
        Ok(self.tracker.clone().with_valid(valid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug() -> RepoSlug {
        RepoSlug::new("o", "r")
    }

    #[test]
    fn test_mock_tracker_lookups() {
        let tracker = MockTracker::new().with_repository(slug()).with_issue(
            slug(),
            Issue {
                number: 3,
                title: "Login".to_string(),
                state: "open".to_string(),
                labels: vec![],
                html_url: None,
            },
        );

        assert_eq!(tracker.repository(&slug()).unwrap().slug, slug());
        assert_eq!(tracker.issue(&slug(), 3).unwrap().title, "Login");
        assert!(matches!(
            tracker.issue(&slug(), 4),
            Err(UnicornError::NotFound(_))
        ));
        assert_eq!(
            tracker.calls(),
            vec![
                TrackerCall::Repository("o/r".to_string()),
                TrackerCall::Issue("o/r".to_string(), 3),
                TrackerCall::Issue("o/r".to_string(), 4),
            ]
        );
    }

    #[test]
    fn test_invalid_tracker_rejects_requests() {
        let tracker = MockTracker::new().with_repository(slug()).with_valid(false);
        assert!(!tracker.is_credential_valid().unwrap());
        assert!(matches!(
            tracker.repository(&slug()),
            Err(UnicornError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_connector_validity_follows_secret() {
        let connector = MockConnector::new(MockTracker::new()).accepting("good");

        let good = connector
            .connect(&GithubConfig::with_token("u", "good"))
            .unwrap();
        let bad = connector
            .connect(&GithubConfig::with_password("u", "bad"))
            .unwrap();

        assert!(good.is_credential_valid().unwrap());
        assert!(!bad.is_credential_valid().unwrap());
        assert_eq!(connector.connections().len(), 2);
    }
}

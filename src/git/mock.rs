use crate::error::Result;
use crate::git::Repository;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    branch: Option<String>,
    remotes: HashMap<String, String>,
}

impl MockRepository {
    /// Create a repository with a detached HEAD and no remotes
    pub fn new() -> Self {
        MockRepository {
            branch: None,
            remotes: HashMap::new(),
        }
    }

    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_remote(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.remotes.insert(name.into(), url.into());
        self
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(remote).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_basic() {
        let repo = MockRepository::new()
            .on_branch("issue/5")
            .with_remote("origin", "https://github.com/o/r.git");

        assert_eq!(repo.current_branch().unwrap().as_deref(), Some("issue/5"));
        assert_eq!(repo.remote_slug().unwrap().to_string(), "o/r");
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert_eq!(repo.current_branch().unwrap(), None);
        assert!(repo.remote_slug().is_err());
    }
}

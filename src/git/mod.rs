//! Git operations abstraction layer
//!
//! Only what the release bookkeeping needs from version control: the name of
//! the checked-out branch and the URL of a remote. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! [credentials::CredentialsProvider] hands validated tracker credentials to
//! `git2` for authenticated remote operations.
//!
//! ```rust
//! # use unicorn::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> unicorn::Result<()> {
//! if let Some(branch) = repo.current_branch()? {
//!     println!("on {}", branch);
//! }
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod mock;
pub mod repository;

pub use credentials::CredentialsProvider;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::{Result, UnicornError};
use crate::github::RepoSlug;

/// Remote consulted when resolving the tracker repository
pub const DEFAULT_REMOTE: &str = "origin";

/// Common git operation trait for abstraction
pub trait Repository {
    /// Short name of the checked-out branch.
    ///
    /// Returns `Ok(None)` when HEAD is detached. An unborn branch (fresh
    /// repository without commits) still has a name.
    fn current_branch(&self) -> Result<Option<String>>;

    /// URL of the named remote, `Ok(None)` if the remote does not exist
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    /// Tracker slug of the repository behind [DEFAULT_REMOTE]
    fn remote_slug(&self) -> Result<RepoSlug> {
        let url = self.remote_url(DEFAULT_REMOTE)?.ok_or_else(|| {
            UnicornError::repository(format!("no remote named '{}'", DEFAULT_REMOTE))
        })?;
        RepoSlug::from_remote_url(&url).ok_or_else(|| {
            UnicornError::repository(format!("remote URL '{}' does not name a repository", url))
        })
    }
}

impl<R: Repository + ?Sized> Repository for &R {
    fn current_branch(&self) -> Result<Option<String>> {
        (**self).current_branch()
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        (**self).remote_url(remote)
    }
}

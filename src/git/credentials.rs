use crate::config::GithubConfig;
use git2::{Cred, CredentialType, RemoteCallbacks};

/// Supplies tracker credentials to git for HTTPS remote operations.
///
/// Tokens are sent as the user name with an empty password, the form GitHub
/// accepts for token-over-HTTPS. Password credentials are sent as-is.
#[derive(Clone)]
pub struct CredentialsProvider {
    username: String,
    password: String,
}

impl CredentialsProvider {
    pub fn from_token(token: impl Into<String>) -> Self {
        CredentialsProvider {
            username: token.into(),
            password: String::new(),
        }
    }

    pub fn from_config(config: &GithubConfig) -> Self {
        match (&config.oauth_token, &config.password) {
            (Some(token), _) => Self::from_token(token.clone()),
            (None, password) => CredentialsProvider {
                username: config.username.clone(),
                password: password.clone().unwrap_or_default(),
            },
        }
    }

    /// The `(user, password)` pair handed to git
    pub fn user_pass(&self) -> (&str, &str) {
        (&self.username, &self.password)
    }

    /// Callbacks for `git2::FetchOptions` / `git2::PushOptions`
    pub fn remote_callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |_url, _username_from_url, allowed_types| {
            if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                Cred::userpass_plaintext(&self.username, &self.password)
            } else {
                Cred::default()
            }
        });
        callbacks
    }
}

impl std::fmt::Debug for CredentialsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsProvider").finish_non_exhaustive()
    }
}

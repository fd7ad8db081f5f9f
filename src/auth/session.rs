use crate::auth::{AuthMode, AuthRequest, Interaction};
use crate::config::{GithubConfig, GlobalConfigStore};
use crate::error::{Result, UnicornError};
use crate::git::CredentialsProvider;
use crate::github::{Connector, Tracker};

/// User name recorded for machine tokens handed in by CI
pub const TOKEN_USERNAME: &str = "x-access-token";

/// An authenticated handle to the tracker
pub struct Session<T> {
    pub tracker: T,
    pub credentials: GithubConfig,
    pub credentials_provider: CredentialsProvider,
}

impl<T: Tracker> Session<T> {
    fn new(tracker: T, credentials: GithubConfig) -> Self {
        Session {
            credentials_provider: CredentialsProvider::from_config(&credentials),
            tracker,
            credentials,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Stored,
    Entered,
}

enum AuthState<T> {
    CollectInput,
    Validate(GithubConfig, Origin),
    Accepted(Session<T>, Origin),
    Rejected(Origin),
}

/// Obtains and caches the tracker session for one process.
///
/// Every entered credential set is written to the store before it is
/// validated; there is no validate-without-saving mode. A manager built
/// [without a store](SessionManager::without_store) only supports the token
/// path.
pub struct SessionManager<C: Connector, I> {
    connector: C,
    store: Option<GlobalConfigStore>,
    interaction: I,
    mode: AuthMode,
    session: Option<Session<C::Tracker>>,
}

impl<C: Connector, I: Interaction> SessionManager<C, I> {
    pub fn new(connector: C, store: GlobalConfigStore, interaction: I, mode: AuthMode) -> Self {
        SessionManager {
            connector,
            store: Some(store),
            interaction,
            mode,
            session: None,
        }
    }

    /// Manager for [SessionManager::authenticate_with_token] only; never prompts
    pub fn without_store(connector: C, interaction: I) -> Self {
        SessionManager {
            connector,
            store: None,
            interaction,
            mode: AuthMode::Headless,
            session: None,
        }
    }

    fn store(&self) -> Result<&GlobalConfigStore> {
        self.store
            .as_ref()
            .ok_or_else(|| UnicornError::config("<credential store>", "no credential store is open"))
    }

    pub fn interaction(&self) -> &I {
        &self.interaction
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The cached session, authenticating with defaults on first use
    pub fn session(&mut self) -> Result<&Session<C::Tracker>> {
        if self.session.is_none() {
            self.authenticate(AuthRequest::default())?;
        }
        self.session
            .as_ref()
            .ok_or_else(|| UnicornError::InvalidCredentials("no session".to_string()))
    }

    /// Machine path: validate a bare token without prompting or persisting
    pub fn authenticate_with_token(
        &mut self,
        token: &str,
        endpoint: Option<&str>,
    ) -> Result<&Session<C::Tracker>> {
        let mut credentials = GithubConfig::with_token(TOKEN_USERNAME, token);
        credentials.endpoint = endpoint.map(str::to_string);

        let tracker = self.connector.connect(&credentials)?;
        if !tracker.is_credential_valid()? {
            return Err(UnicornError::InvalidCredentials(
                "the repository token was rejected".to_string(),
            ));
        }
        tracing::info!("authenticated with repository token");
        Ok(&*self.session.insert(Session::new(tracker, credentials)))
    }

    /// Runs the credential flow and caches the resulting session
    pub fn authenticate(&mut self, request: AuthRequest) -> Result<&Session<C::Tracker>> {
        let mut attempts = 0u32;
        let mut last_rejection = None;

        let mut state = match self.store()?.load()?.github {
            Some(stored) if !request.force_new => AuthState::Validate(stored, Origin::Stored),
            _ => AuthState::CollectInput,
        };

        loop {
            state = match state {
                AuthState::CollectInput => {
                    self.check_attempts(attempts)?;
                    let credentials = self.collect(&request, attempts == 0, last_rejection)?;
                    attempts += 1;
                    let store = self.store()?;
                    store.save_github(credentials.clone())?;
                    tracing::debug!(path = %store.path().display(), "stored credentials");
                    AuthState::Validate(credentials, Origin::Entered)
                }
                AuthState::Validate(credentials, origin) => {
                    let tracker = self.connector.connect(&credentials)?;
                    if tracker.is_credential_valid()? {
                        AuthState::Accepted(Session::new(tracker, credentials), origin)
                    } else {
                        AuthState::Rejected(origin)
                    }
                }
                AuthState::Rejected(origin) => {
                    match origin {
                        Origin::Stored => {
                            tracing::warn!("stored credentials were rejected");
                            self.interaction
                                .echo("The stored GitHub credentials are invalid");
                        }
                        Origin::Entered => {
                            tracing::warn!(attempts, "entered credentials were rejected");
                            self.interaction
                                .echo("Your credentials are invalid. Please try again.");
                        }
                    }
                    last_rejection = Some(origin);
                    AuthState::CollectInput
                }
                AuthState::Accepted(session, origin) => {
                    if origin == Origin::Entered {
                        self.interaction.echo("Login successful");
                    }
                    tracing::info!(username = %session.credentials.username, "authenticated");
                    return Ok(&*self.session.insert(session));
                }
            };
        }
    }

    fn check_attempts(&self, attempts: u32) -> Result<()> {
        match self.mode {
            AuthMode::Headless if attempts > 0 => Err(UnicornError::InvalidCredentials(
                "entered credentials are invalid and prompting is disabled".to_string(),
            )),
            AuthMode::Interactive {
                max_attempts: Some(max),
            } if attempts >= max => Err(UnicornError::InvalidCredentials(format!(
                "gave up after {} attempts",
                attempts
            ))),
            _ => Ok(()),
        }
    }

    /// Fails in headless mode, where a prompt can never be answered
    fn ensure_can_prompt(&self, last_rejection: Option<Origin>) -> Result<()> {
        match (self.mode, last_rejection) {
            (AuthMode::Interactive { .. }, _) => Ok(()),
            (AuthMode::Headless, Some(_)) => Err(UnicornError::InvalidCredentials(
                "stored credentials are invalid and prompting is disabled".to_string(),
            )),
            (AuthMode::Headless, None) => Err(UnicornError::missing_input(
                "no stored credentials and prompting is disabled",
            )),
        }
    }

    /// Builds the next credential set. Pre-filled values skip their prompt,
    /// so headless mode succeeds when the request supplies everything.
    fn collect(
        &mut self,
        request: &AuthRequest,
        first: bool,
        last_rejection: Option<Origin>,
    ) -> Result<GithubConfig> {
        let prefill = |value: &Option<String>| if first { value.clone() } else { None };
        let headless = self.mode == AuthMode::Headless;

        if !headless {
            let notice = format!(
                "Please enter your GitHub credentials (they will be stored unencrypted in {}):",
                self.store()?.path().display()
            );
            self.interaction.echo(&notice);
        }

        let username = match prefill(&request.username) {
            Some(username) => username,
            None => {
                self.ensure_can_prompt(last_rejection)?;
                required(self.interaction.prompt("GitHub username")?, "username")?
            }
        };

        let (password, token) = match (prefill(&request.password), prefill(&request.token)) {
            (Some(password), _) => (Some(password), None),
            (None, Some(token)) => (None, Some(token)),
            (None, None) => {
                self.ensure_can_prompt(last_rejection)?;
                let use_password = self.interaction.confirm(
                    "Use password (alternative: personal access token)? When 2FA is enabled, only tokens work",
                    true,
                )?;
                if use_password {
                    let password =
                        required(self.interaction.prompt_secret("Password")?, "password")?;
                    (Some(password), None)
                } else {
                    let token = required(
                        self.interaction.prompt_secret("Personal access token")?,
                        "personal access token",
                    )?;
                    (None, Some(token))
                }
            }
        };

        let endpoint = match prefill(&request.endpoint) {
            Some(endpoint) => Some(endpoint),
            None if headless => None,
            None => self
                .interaction
                .prompt("Custom GitHub endpoint? (leave empty for github.com)")?
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
        };

        Ok(GithubConfig {
            username,
            password,
            oauth_token: token,
            endpoint,
        })
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| UnicornError::missing_input(name))
}

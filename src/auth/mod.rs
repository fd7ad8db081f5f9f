//! Credential and session management
//!
//! [SessionManager] obtains a validated session against the tracker. It runs
//! as a small state machine (collect input, validate, accepted or rejected)
//! and talks to the user only through the [Interaction] port, so the same
//! flow runs against a terminal ([crate::ui::ConsoleInteraction]) or a
//! script ([ScriptedInteraction]).

pub mod scripted;
pub mod session;

pub use scripted::ScriptedInteraction;
pub use session::{Session, SessionManager};

use crate::error::Result;

/// User interaction needed by the credential flow
pub trait Interaction {
    /// Show an informational message
    fn echo(&mut self, message: &str);

    /// Ask for a line of text. `None` means the user gave no input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>>;

    /// Like [Interaction::prompt], without echoing the input
    fn prompt_secret(&mut self, text: &str) -> Result<Option<String>>;

    fn confirm(&mut self, text: &str, default: bool) -> Result<bool>;
}

/// Whether the manager may prompt, and how often
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Prompt for credentials; `None` retries until the user cancels
    Interactive { max_attempts: Option<u32> },
    /// Never prompt; fail fast when stored credentials are missing or invalid
    Headless,
}

impl Default for AuthMode {
    fn default() -> Self {
        AuthMode::Interactive { max_attempts: None }
    }
}

/// Options for one authentication run.
///
/// Pre-filled values skip the matching prompt on the first attempt only, so
/// rejected values are not retried forever.
#[derive(Debug, Clone, Default)]
pub struct AuthRequest {
    /// Ignore stored credentials and ask for new ones
    pub force_new: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub endpoint: Option<String>,
}

//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - the terminal-backed [Interaction] used by the credential flow

use console::Term;

use crate::auth::Interaction;
use crate::error::Result;

pub mod formatter;

pub use formatter::{
    display_bump, display_error, display_labels, display_report, display_status, display_success,
};

/// Prompts on the controlling terminal.
///
/// Prompts and messages go to stderr so stdout stays free for reports.
pub struct ConsoleInteraction {
    term: Term,
}

impl ConsoleInteraction {
    pub fn new() -> Self {
        ConsoleInteraction {
            term: Term::stderr(),
        }
    }

    /// Whether a user can answer prompts at all
    pub fn is_interactive(&self) -> bool {
        self.term.is_term()
    }

    fn ask(&self, text: &str, secret: bool) -> Result<Option<String>> {
        self.term.write_str(&format!("{}: ", text))?;
        let input = if secret {
            self.term.read_secure_line()?
        } else {
            self.term.read_line()?
        };
        let input = input.trim();
        Ok(if input.is_empty() {
            None
        } else {
            Some(input.to_string())
        })
    }
}

impl Default for ConsoleInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction for ConsoleInteraction {
    fn echo(&mut self, message: &str) {
        if self.term.write_line(message).is_err() {
            tracing::debug!(message, "could not write to terminal");
        }
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.ask(text, false)
    }

    fn prompt_secret(&mut self, text: &str) -> Result<Option<String>> {
        self.ask(text, true)
    }

    /// Accepts "y"/"yes" and "n"/"no" (case-insensitive); Enter picks `default`
    fn confirm(&mut self, text: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            self.term.write_str(&format!("{} ({}): ", text, hint))?;
            let response = self.term.read_line()?.trim().to_lowercase();
            match response.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.term.write_line("Please answer 'y' or 'n'.")?,
            }
        }
    }
}

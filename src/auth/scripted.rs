use crate::auth::Interaction;
use crate::error::{Result, UnicornError};
use std::collections::VecDeque;

/// Pre-recorded answers for running the credential flow headlessly.
///
/// Text prompts (plain and secret) consume `answers` in order; an empty
/// answer counts as no input. Confirmations consume `confirmations`.
#[derive(Debug, Default)]
pub struct ScriptedInteraction {
    answers: VecDeque<String>,
    confirmations: VecDeque<bool>,
    echoes: Vec<String>,
    prompts: Vec<String>,
}

impl ScriptedInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, answer: impl Into<String>) -> Self {
        self.answers.push_back(answer.into());
        self
    }

    pub fn confirm_with(mut self, confirmation: bool) -> Self {
        self.confirmations.push_back(confirmation);
        self
    }

    /// Messages echoed so far
    pub fn echoes(&self) -> &[String] {
        &self.echoes
    }

    /// Prompt texts asked so far, including confirmations
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    fn next_answer(&mut self, text: &str) -> Result<Option<String>> {
        self.prompts.push(text.to_string());
        let answer = self
            .answers
            .pop_front()
            .ok_or_else(|| UnicornError::missing_input(format!("no answer for '{}'", text)))?;
        Ok(Some(answer).filter(|a| !a.trim().is_empty()))
    }
}

impl Interaction for ScriptedInteraction {
    fn echo(&mut self, message: &str) {
        self.echoes.push(message.to_string());
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.next_answer(text)
    }

    fn prompt_secret(&mut self, text: &str) -> Result<Option<String>> {
        self.next_answer(text)
    }

    fn confirm(&mut self, text: &str, default: bool) -> Result<bool> {
        self.prompts.push(text.to_string());
        Ok(self.confirmations.pop_front().unwrap_or(default))
    }
}

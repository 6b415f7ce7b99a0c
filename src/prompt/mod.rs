//! Interactive choice and confirmation interface.
//!
//! Commands talk to a [`Prompter`] rather than the terminal directly, so
//! menu flows and destructive confirmations can be driven by a
//! [`ScriptedPrompter`] in tests.

mod scripted;

pub use scripted::{ScriptedAnswer, ScriptedPrompter};

use dialoguer::{Confirm, Input, Select};
use thiserror::Error;

/// Errors from an interactive prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The terminal could not be read or written.
    #[error("terminal prompt failed: {0}")]
    Terminal(#[from] dialoguer::Error),

    /// A scripted prompter ran out of answers or got the wrong kind of question.
    #[error("unexpected prompt `{prompt}`: {reason}")]
    Script {
        /// The prompt text.
        prompt: String,
        /// What went wrong.
        reason: String,
    },
}

/// Source of user decisions.
pub trait Prompter {
    /// Picks one of `items`; returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError`] if no answer can be obtained.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, PromptError>;

    /// Yes/no question. Defaults to no.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError`] if no answer can be obtained.
    fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError>;

    /// Free-text answer.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError`] if no answer can be obtained.
    fn input(&mut self, prompt: &str) -> Result<String, PromptError>;
}

/// Terminal prompts via `dialoguer`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, PromptError> {
        Ok(Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    fn input(&mut self, prompt: &str) -> Result<String, PromptError> {
        Ok(Input::<String>::new().with_prompt(prompt).interact_text()?)
    }
}

//! Prompter that replays canned answers, for driving interactive flows in tests.

use std::collections::VecDeque;

use super::{PromptError, Prompter};

/// One canned answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAnswer {
    /// Index for [`Prompter::select`].
    Select(usize),
    /// Answer for [`Prompter::confirm`].
    Confirm(bool),
    /// Text for [`Prompter::input`].
    Input(String),
}

/// Replays a fixed sequence of answers and records every prompt it was shown.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompter {
    answers: VecDeque<ScriptedAnswer>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    /// Creates a prompter that answers in the given order.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Prompts shown so far, in order.
    #[must_use]
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<ScriptedAnswer, PromptError> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| PromptError::Script {
            prompt: prompt.to_string(),
            reason: "no answers left".to_string(),
        })
    }
}

fn mismatch(prompt: &str, got: &ScriptedAnswer) -> PromptError {
    PromptError::Script {
        prompt: prompt.to_string(),
        reason: format!("next answer is {got:?}"),
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, PromptError> {
        match self.next(prompt)? {
            ScriptedAnswer::Select(index) if index < items.len() => Ok(index),
            other => Err(mismatch(prompt, &other)),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError> {
        match self.next(prompt)? {
            ScriptedAnswer::Confirm(answer) => Ok(answer),
            other => Err(mismatch(prompt, &other)),
        }
    }

    fn input(&mut self, prompt: &str) -> Result<String, PromptError> {
        match self.next(prompt)? {
            ScriptedAnswer::Input(text) => Ok(text),
            other => Err(mismatch(prompt, &other)),
        }
    }
}

//! Interactive Prompts
//!
//! The controller never talks to the terminal directly; it asks a
//! [`Prompter`] for a selection, a line of text, a salary, or a yes/no answer.
//! [`TerminalPrompter`] is the `dialoguer` implementation used by the binary.
//!
//! Text and salary prompts validate inline: invalid input is rejected next to
//! the prompt and the user is asked again, so a `ValidationFailure` never
//! reaches the store.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use rust_decimal::Decimal;

use crate::error::{Result, TrackerError};
use crate::validation::parse_salary;

/// Maximum number of menu entries shown at once
pub const PAGE_SIZE: usize = 15;

/// Source of user answers
pub trait Prompter {
    /// Pick one of `items`, returning its index
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize>;

    /// Read a line of text that must satisfy `validate`; returns the validated value
    fn text(&mut self, prompt: &str, validate: &dyn Fn(&str) -> Result<String>) -> Result<String>;

    /// Read a positive salary
    fn salary(&mut self, prompt: &str) -> Result<Decimal>;

    /// Ask a yes/no question; the default answer is "no"
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// `dialoguer`-backed prompter for an interactive terminal
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self { theme: ColorfulTheme::default() }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize> {
        if items.is_empty() {
            return Err(TrackerError::validation("Nothing to choose from"));
        }

        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .max_length(PAGE_SIZE)
            .interact()?)
    }

    fn text(&mut self, prompt: &str, validate: &dyn Fn(&str) -> Result<String>) -> Result<String> {
        let raw: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(|input: &String| validate(input).map(|_| ()).map_err(|e| e.message()))
            .interact_text()?;

        validate(&raw)
    }

    fn salary(&mut self, prompt: &str) -> Result<Decimal> {
        let raw: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(|input: &String| parse_salary(input).map(|_| ()).map_err(|e| e.message()))
            .interact_text()?;

        parse_salary(&raw)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme).with_prompt(prompt).default(false).interact()?)
    }
}

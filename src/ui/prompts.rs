//! ui::prompts
//!
//! Interactive prompts on the controlling terminal.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode they
//! fail with [`PromptError::NotInteractive`] so callers can fall back to a
//! flag or a clear error. These functions block; async callers run them on
//! a blocking thread.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<io::Error> for PromptError {
    fn from(err: io::Error) -> Self {
        PromptError::IoError(err.to_string())
    }
}

/// Ask the user to pick one of `choices` by number or label.
///
/// Returns the chosen label. An empty answer or end of input cancels.
pub fn choose(message: &str, choices: &[String], interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    let stdin = io::stdin();
    let mut stderr = io::stderr();
    writeln!(stderr, "{}", message)?;
    for (i, choice) in choices.iter().enumerate() {
        writeln!(stderr, "  [{}] {}", i + 1, choice)?;
    }
    write!(stderr, "> ")?;
    stderr.flush()?;

    let mut line = String::new();
    if stdin.lock().read_line(&mut line)? == 0 {
        return Err(PromptError::Cancelled);
    }
    resolve_choice(line.trim(), choices).ok_or(PromptError::Cancelled)
}

/// Match an answer against the available choices.
///
/// Accepts a 1-based index or a case-insensitive label.
pub fn resolve_choice(answer: &str, choices: &[String]) -> Option<String> {
    if answer.is_empty() {
        return None;
    }
    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| choices.get(i))
            .cloned();
    }
    choices
        .iter()
        .find(|choice| choice.eq_ignore_ascii_case(answer))
        .cloned()
}

/// Prompt for masked input (tokens).
///
/// The input is not echoed to the terminal.
pub fn password(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    let mut stderr = io::stderr();
    write!(stderr, "{}", message)?;
    stderr.flush()?;

    let value = rpassword::read_password()?;
    Ok(value.trim().to_string())
}

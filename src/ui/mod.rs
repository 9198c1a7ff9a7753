//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Interactive prompts on the terminal
//! - [`output`] - Output formatting and display
//! - [`console`] - Terminal host and browser authorization flow
//!
//! # Design
//!
//! All output and prompts go through this module so interactive and
//! non-interactive runs behave consistently.

pub mod console;
pub mod output;
pub mod prompts;

pub use console::{BrowserAuthorizationFlow, ConsoleHost};

//! atomgit-code-api - AtomGit code hosting adapter
//!
//! Implements the [`forge::CodeApi`] contract against the AtomGit REST API:
//! branch and commit resolution, directory trees, file content, blame, branch
//! creation and batched file commits. Calls without a credential trigger an
//! interactive OAuth handshake driven through host callbacks.
//!
//! # Architecture
//!
//! - [`cli`] - `atomgit-code` binary: argument parsing and command handlers
//! - [`forge`] - The `CodeApi` contract, normalized entities, AtomGit adapter
//! - [`auth`] - Credential cache and the authorization handshake
//! - [`host`] - Dialog, notification and reinitialization callbacks
//! - [`secrets`] - Secret storage abstraction
//! - [`core`] - Configuration and validated domain types
//! - [`ui`] - Terminal host, prompts and output formatting
//!
//! # Invariants
//!
//! 1. No HTTP request is made without a credential
//! 2. At most one handshake runs at a time
//! 3. Every failed request notifies the host at most once
//! 4. Tokens never appear in logs, `Debug` or `Display` output

pub mod auth;
pub mod cli;
pub mod core;
pub mod forge;
pub mod host;
pub mod secrets;
pub mod ui;

//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the adapter through [`CodeApi`](crate::forge::CodeApi)
//! 3. Formats and displays output
//!
//! The adapter reports failed requests to the console host itself, so
//! handlers only add context to the returned error.

mod auth;
mod repo;

pub use auth::{auth, validate_token};
pub use repo::{
    blame, blob, branches, commit, commit_files, create_branch, files, parse_file_spec, project,
    tree,
};

use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::args::Command;
use super::Context;
use crate::auth::CredentialCache;
use crate::core::config::Config;
use crate::forge::atomgit::AtomGitApi;
use crate::secrets;
use crate::ui::{BrowserAuthorizationFlow, ConsoleHost};

/// Dispatch a command to its handler.
pub async fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Auth {
            token,
            status,
            logout,
            login,
        } => auth::auth(ctx, token.as_deref(), status, logout, login).await,
        Command::Project { repo } => repo::project(ctx, &repo).await,
        Command::Commit { repo } => repo::commit(ctx, &repo).await,
        Command::Tree { repo, path } => repo::tree(ctx, &repo, &path).await,
        Command::Files { repo } => repo::files(ctx, &repo).await,
        Command::Blob { repo, path } => repo::blob(ctx, &repo, &path).await,
        Command::Branches { repo } => repo::branches(ctx, &repo).await,
        Command::Blame { repo, path } => repo::blame(ctx, &repo, &path).await,
        Command::CreateBranch { repo, name } => repo::create_branch(ctx, &repo, &name).await,
        Command::CommitFiles {
            repo,
            branch,
            message,
            create,
            update,
            delete,
        } => repo::commit_files(ctx, &repo, &branch, &message, &create, &update, &delete).await,
    }
}

/// Load the configuration named by `--config`, or the default one.
fn load_config(ctx: &Context) -> Result<Config> {
    match &ctx.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().context("Failed to load config"),
    }
}

/// Build the adapter with the console host and browser flow.
fn connect(ctx: &Context) -> Result<AtomGitApi> {
    let config = load_config(ctx)?;
    let platform = config.platform();

    let store = secrets::create_store(config.secrets_provider())
        .context("Failed to initialize secret store")?;
    let credential = Arc::new(CredentialCache::load(store, platform.token.clone()));

    let host = Arc::new(ConsoleHost::new(ctx.interactive, ctx.verbosity()));
    let flow = Arc::new(BrowserAuthorizationFlow::new(ctx.interactive));

    Ok(AtomGitApi::new(
        platform,
        &config.authorization(),
        credential,
        host,
        flow,
    ))
}

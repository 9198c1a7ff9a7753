//! cli::commands::auth
//!
//! Authentication command for the AtomGit access token.
//!
//! # Design
//!
//! The auth command:
//! - Stores tokens through the configured secret store
//! - NEVER prints tokens to stdout/stderr
//! - Can run the browser handshake the adapter uses on a 401
//!
//! # Example
//!
//! ```bash
//! # Interactive (prompts for token)
//! atomgit-code auth
//!
//! # Non-interactive
//! atomgit-code auth --token <TOKEN>
//!
//! # Browser authorization
//! atomgit-code auth --login
//!
//! # Check status
//! atomgit-code auth --status
//!
//! # Remove stored token
//! atomgit-code auth --logout
//! ```

use anyhow::{bail, Context as _, Result};

use super::connect;
use crate::auth::HandshakeOutcome;
use crate::cli::Context;
use crate::forge::atomgit::AtomGitApi;
use crate::forge::CodeApi;
use crate::ui::prompts;

/// Run the auth command.
///
/// # Security
///
/// This function NEVER prints the token value. It only confirms success/failure.
pub async fn auth(
    ctx: &Context,
    token: Option<&str>,
    status: bool,
    logout: bool,
    login: bool,
) -> Result<()> {
    let api = connect(ctx)?;

    if status {
        return show_status(&api, ctx.quiet);
    }

    if logout {
        api.clear_token();
        if !ctx.quiet {
            println!("Logged out from {}.", AtomGitApi::NAME);
        }
        return Ok(());
    }

    if login {
        return do_login(&api, ctx.quiet).await;
    }

    let token_value = match token {
        Some(t) => t.to_string(),
        None => read_token(ctx)?,
    };
    validate_token(&token_value)?;

    api.credential()
        .set_token(&token_value)
        .context("Failed to store token")?;

    if !ctx.quiet {
        println!("Authentication configured for {}.", AtomGitApi::NAME);
    }
    Ok(())
}

/// Show authentication status.
fn show_status(api: &AtomGitApi, quiet: bool) -> Result<()> {
    let present = api.credential().is_present();

    if quiet {
        // Machine-readable output
        println!(
            "{}",
            if present {
                "authenticated"
            } else {
                "not_authenticated"
            }
        );
    } else if present {
        println!("Authenticated with {}.", AtomGitApi::NAME);
    } else {
        println!("Not authenticated with {}.", AtomGitApi::NAME);
        println!("Run 'atomgit-code auth --login' to authenticate.");
    }
    Ok(())
}

/// Run the browser handshake.
async fn do_login(api: &AtomGitApi, quiet: bool) -> Result<()> {
    let outcome = api
        .authorizer()
        .run()
        .await
        .context("Authorization failed")?;

    match outcome {
        HandshakeOutcome::Authorized | HandshakeOutcome::AlreadyAuthorized => {
            if !quiet {
                println!("Authorized with {}.", AtomGitApi::NAME);
            }
            Ok(())
        }
        other => bail!("Authorization did not complete: {}", other),
    }
}

/// Prompt for a token with masked input.
fn read_token(ctx: &Context) -> Result<String> {
    if !ctx.interactive {
        bail!("Token required. Use --token <TOKEN>, --login, or run interactively.");
    }
    prompts::password("AtomGit access token: ", true).context("Failed to read token")
}

/// Basic token sanity checks.
///
/// AtomGit tokens are opaque; only reject values that cannot be a token.
pub fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        bail!("Token cannot be empty.");
    }
    if token.chars().any(char::is_whitespace) {
        bail!("Token cannot contain whitespace.");
    }
    if token.len() < 8 {
        bail!("Token appears too short.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_token() {
        assert!(validate_token("").is_err());
    }

    #[test]
    fn rejects_whitespace() {
        assert!(validate_token("abc def ghi").is_err());
        assert!(validate_token("abcdefgh\n").is_err());
    }

    #[test]
    fn rejects_short_token() {
        assert!(validate_token("abc").is_err());
    }

    #[test]
    fn accepts_opaque_token() {
        assert!(validate_token("9f86d081884c7d65").is_ok());
    }

    #[test]
    fn error_never_echoes_token() {
        let err = validate_token("secret value").unwrap_err();
        assert!(!err.to_string().contains("secret"));
    }
}

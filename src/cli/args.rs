//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Read configuration from this file
//! - `--debug`: Enable debug logging
//! - `--interactive` / `--no-interactive`: Control prompts
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Print results as JSON

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::types::{BranchName, RepoSlug};

/// atomgit-code - Browse and edit AtomGit repositories over the REST API
#[derive(Parser, Debug)]
#[command(name = "atomgit-code")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable interactive prompts
    #[arg(
        long = "interactive",
        global = true,
        conflicts_with = "no_interactive"
    )]
    pub interactive_flag: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// Returns true if:
    /// - `--interactive` was explicitly set, OR
    /// - Neither `--no-interactive` nor `--quiet` was set AND stdin is a TTY
    pub fn interactive(&self) -> bool {
        if self.interactive_flag {
            true
        } else if self.no_interactive || self.quiet {
            false
        } else {
            std::io::stdin().is_terminal()
        }
    }
}

/// Repository selection shared by the repository commands.
#[derive(clap::Args, Debug, Clone)]
pub struct RepoArgs {
    /// Repository as owner/name
    #[arg(long, short = 'R', value_name = "OWNER/NAME")]
    pub repo: RepoSlug,

    /// Branch or tag (defaults to the repository's default branch)
    #[arg(long = "ref", value_name = "REF")]
    pub ref_name: Option<String>,

    /// Commit sha (skips resolving --ref)
    #[arg(long, value_name = "SHA")]
    pub commit: Option<String>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store, check, or remove the AtomGit access token
    #[command(
        name = "auth",
        long_about = "Store, check, or remove the AtomGit access token.\n\n\
            Without flags, prompts for a token on the terminal. The token is kept \
            in the configured secret store and is never printed.",
        after_help = "\
EXAMPLES:
    # Paste a token interactively
    atomgit-code auth

    # Store a token non-interactively
    atomgit-code auth --token <TOKEN>

    # Authorize in the browser
    atomgit-code auth --login

    # Check or remove the stored token
    atomgit-code auth --status
    atomgit-code auth --logout"
    )]
    Auth {
        /// Token to store (prompts if omitted)
        #[arg(long, conflicts_with_all = ["status", "logout", "login"])]
        token: Option<String>,

        /// Show whether a token is available
        #[arg(long, conflicts_with_all = ["logout", "login"])]
        status: bool,

        /// Remove the stored token
        #[arg(long, conflicts_with = "login")]
        logout: bool,

        /// Authorize in the browser and paste the resulting token
        #[arg(long)]
        login: bool,
    },

    /// Show the repository id and default branch
    Project {
        #[command(flatten)]
        repo: RepoArgs,
    },

    /// Resolve a branch to its head commit
    Commit {
        #[command(flatten)]
        repo: RepoArgs,
    },

    /// List one directory
    #[command(
        name = "tree",
        after_help = "\
EXAMPLES:
    # Top level of the default branch
    atomgit-code tree -R openharmony/docs

    # A subdirectory at a given commit
    atomgit-code tree -R openharmony/docs --commit 1a2b3c4 zh-cn/readme"
    )]
    Tree {
        #[command(flatten)]
        repo: RepoArgs,

        /// Directory path (empty for the root)
        #[arg(default_value = "")]
        path: String,
    },

    /// List every file path
    Files {
        #[command(flatten)]
        repo: RepoArgs,
    },

    /// Print the content of a file
    #[command(
        name = "blob",
        long_about = "Print the content of a file.\n\n\
            With --commit the file is read at that exact commit; otherwise at --ref. \
            Content is written to stdout unchanged."
    )]
    Blob {
        #[command(flatten)]
        repo: RepoArgs,

        /// File path
        path: String,
    },

    /// List branches
    Branches {
        #[command(flatten)]
        repo: RepoArgs,
    },

    /// Show which commit last touched each line range of a file
    Blame {
        #[command(flatten)]
        repo: RepoArgs,

        /// File path
        path: String,
    },

    /// Create a branch
    #[command(name = "create-branch")]
    CreateBranch {
        #[command(flatten)]
        repo: RepoArgs,

        /// Name of the new branch
        name: BranchName,
    },

    /// Commit file changes in a single request
    #[command(
        name = "commit-files",
        after_help = "\
EXAMPLES:
    # Add one file and update another from local copies
    atomgit-code commit-files -R me/notes --branch main -m \"Update notes\" \\
        --create docs/new.md=./new.md --update README.md=./README.md

    # Delete a file
    atomgit-code commit-files -R me/notes --branch main -m \"Remove old\" --delete old.txt

NOTE:
    Local files are sent as UTF-8 text. Binary files are not supported."
    )]
    CommitFiles {
        /// Repository as owner/name
        #[arg(long, short = 'R', value_name = "OWNER/NAME")]
        repo: RepoSlug,

        /// Branch to commit to
        #[arg(long)]
        branch: BranchName,

        /// Commit message
        #[arg(long, short = 'm')]
        message: String,

        /// Create a file from a local UTF-8 text file: REPO_PATH=LOCAL_FILE
        #[arg(long, value_name = "REPO_PATH=LOCAL_FILE")]
        create: Vec<String>,

        /// Replace a file with a local UTF-8 text file: REPO_PATH=LOCAL_FILE
        #[arg(long, value_name = "REPO_PATH=LOCAL_FILE")]
        update: Vec<String>,

        /// Delete a file
        #[arg(long, value_name = "REPO_PATH")]
        delete: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repo_args() {
        let cli = Cli::try_parse_from([
            "atomgit-code",
            "tree",
            "-R",
            "openharmony/docs",
            "--ref",
            "master",
            "zh-cn",
        ])
        .unwrap();

        match cli.command {
            Command::Tree { repo, path } => {
                assert_eq!(repo.repo.owner(), "openharmony");
                assert_eq!(repo.repo.name(), "docs");
                assert_eq!(repo.ref_name.as_deref(), Some("master"));
                assert_eq!(repo.commit, None);
                assert_eq!(path, "zh-cn");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_repo_slug() {
        assert!(Cli::try_parse_from(["atomgit-code", "branches", "-R", "nope"]).is_err());
    }

    #[test]
    fn rejects_bad_branch_name() {
        assert!(Cli::try_parse_from([
            "atomgit-code",
            "create-branch",
            "-R",
            "a/b",
            "bad..name"
        ])
        .is_err());
    }

    #[test]
    fn auth_flags_conflict() {
        assert!(Cli::try_parse_from(["atomgit-code", "auth", "--status", "--logout"]).is_err());
        assert!(Cli::try_parse_from(["atomgit-code", "auth", "--token", "t", "--login"]).is_err());
    }

    #[test]
    fn commit_files_help_states_text_only() {
        let mut cmd = Cli::command();
        let help = cmd
            .find_subcommand_mut("commit-files")
            .unwrap()
            .render_long_help()
            .to_string();
        assert!(help.contains("UTF-8 text file"));
        assert!(help.contains("Binary files are not supported"));
    }

    #[test]
    fn quiet_disables_interaction() {
        let cli = Cli::try_parse_from(["atomgit-code", "-q", "auth", "--status"]).unwrap();
        assert!(!cli.interactive());

        let cli =
            Cli::try_parse_from(["atomgit-code", "--interactive", "auth", "--status"]).unwrap();
        assert!(cli.interactive());
    }
}

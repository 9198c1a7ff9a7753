//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Results go to stdout, diagnostics to stderr. Quiet mode suppresses
//! everything except results and errors. With `--json` results are
//! pretty-printed JSON of the normalized entities.

use std::fmt::Display;

use serde::Serialize;

use crate::forge::{BranchOrTag, GitlensBlame, TreeEntry};
use crate::host::{Message, MessageType};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - results and errors only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print an informational message to stderr (respects quiet mode).
pub fn info(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a value as pretty JSON on stdout.
pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One line per tree entry: kind, then path.
pub fn format_tree(entries: &[TreeEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{:<6} {}", entry.kind, entry.path))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per branch: short sha, name, protection marker.
pub fn format_branches(branches: &[BranchOrTag]) -> String {
    branches
        .iter()
        .map(|branch| {
            let short: String = branch.commit.id.chars().take(8).collect();
            let marker = if branch.protected == Some(true) {
                " (protected)"
            } else {
                ""
            };
            format!("{:<8} {}{}", short, branch.name, marker)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per blame group: short sha, author, then line ranges.
pub fn format_blame(groups: &[GitlensBlame]) -> String {
    groups
        .iter()
        .map(|group| {
            let short: String = group.commit.id.chars().take(8).collect();
            let ranges = group
                .lines
                .iter()
                .map(|line| {
                    let last = line.current_number + line.effect_line.saturating_sub(1);
                    if last > line.current_number {
                        format!("{}-{}", line.current_number, last)
                    } else {
                        line.current_number.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(",");
            format!("{:<8} {:<20} {}", short, group.commit.author_name, ranges)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a host notification for the terminal.
pub fn format_message(platform: &str, message: &Message) -> String {
    let mut line = format!("{} [{}] {}", message.kind, platform, message.symbol);
    if let Some(status) = message.status {
        line.push_str(&format!(" ({})", status));
    }
    if let Some(detail) = &message.message {
        line.push_str(": ");
        line.push_str(detail);
    }
    line
}

/// Whether a notification should be shown at this verbosity.
pub fn should_show(kind: MessageType, verbosity: Verbosity) -> bool {
    kind == MessageType::Error || verbosity != Verbosity::Quiet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::{BlameAuthor, BlameCommit, BlameLine, CommitRef, EntryKind};

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn tree_lines() {
        let entries = vec![
            TreeEntry {
                id: None,
                name: "src".into(),
                path: "src".into(),
                kind: EntryKind::Tree,
                mode: None,
            },
            TreeEntry {
                id: Some("abc".into()),
                name: "lib.rs".into(),
                path: "src/lib.rs".into(),
                kind: EntryKind::Blob,
                mode: Some("100644".into()),
            },
        ];
        assert_eq!(format_tree(&entries), "tree   src\nblob   src/lib.rs");
    }

    #[test]
    fn branch_lines() {
        let branches = vec![BranchOrTag {
            name: "main".into(),
            commit: CommitRef {
                id: "0123456789abcdef".into(),
            },
            protected: Some(true),
        }];
        assert_eq!(format_branches(&branches), "01234567 main (protected)");
    }

    #[test]
    fn blame_lines() {
        let groups = vec![GitlensBlame {
            commit: BlameCommit {
                id: "fedcba9876543210".into(),
                author_name: "dev".into(),
                author_email: "no_email".into(),
                authored_date: None,
                committed_date: None,
                message: "init".into(),
                author: BlameAuthor::default(),
            },
            lines: vec![
                BlameLine {
                    current_number: 1,
                    effect_line: 3,
                    previous_number: 1,
                },
                BlameLine {
                    current_number: 7,
                    effect_line: 1,
                    previous_number: 7,
                },
            ],
        }];
        assert_eq!(
            format_blame(&groups),
            format!("fedcba98 {:<20} 1-3,7", "dev")
        );
    }

    #[test]
    fn message_rendering() {
        let message = Message {
            kind: MessageType::Error,
            status: Some(404),
            symbol: "error.resource-not-found".into(),
            message: Some("not found: x".into()),
        };
        assert_eq!(
            format_message("atomgit", &message),
            "error [atomgit] error.resource-not-found (404): not found: x"
        );
    }

    #[test]
    fn errors_always_shown() {
        assert!(should_show(MessageType::Error, Verbosity::Quiet));
        assert!(!should_show(MessageType::Info, Verbosity::Quiet));
        assert!(should_show(MessageType::Warning, Verbosity::Normal));
    }
}

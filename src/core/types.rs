//! core::types
//!
//! Validated identifiers taken from user input.
//!
//! # Types
//!
//! - [`RepoSlug`] - `owner/name` repository coordinates
//! - [`BranchName`] - a branch name the provider will accept
//!
//! # Examples
//!
//! ```
//! use atomgit_code_api::core::types::{BranchName, RepoSlug};
//!
//! let slug: RepoSlug = "openharmony/docs".parse().unwrap();
//! assert_eq!(slug.owner(), "openharmony");
//!
//! assert!(BranchName::new("feature/login").is_ok());
//! assert!(BranchName::new("bad..name").is_err());
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from identifier validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid repository '{0}': expected owner/name")]
    InvalidRepo(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),
}

/// Repository coordinates, written `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    /// Build from separate parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, TypeError> {
        let (owner, name) = (owner.into(), name.into());
        if !Self::valid_part(&owner) || !Self::valid_part(&name) {
            return Err(TypeError::InvalidRepo(format!("{}/{}", owner, name)));
        }
        Ok(Self { owner, name })
    }

    fn valid_part(part: &str) -> bool {
        !part.is_empty()
            && part != "."
            && part != ".."
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }

    /// Owning user or organization.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoSlug {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches(".git");
        match s.split_once('/') {
            Some((owner, name)) if !name.contains('/') => Self::new(owner, name)
                .map_err(|_| TypeError::InvalidRepo(s.to_string())),
            _ => Err(TypeError::InvalidRepo(s.to_string())),
        }
    }
}

impl TryFrom<String> for RepoSlug {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepoSlug> for String {
    fn from(slug: RepoSlug) -> Self {
        slug.to_string()
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A branch name that satisfies git's refname rules.
///
/// Rejected: empty or `@`, a leading `.` or `-`, a trailing `/` or
/// `.lock`, the sequences `..`, `@{` and `//`, whitespace, control
/// characters, and any of `~ ^ : \ ? * [`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Validate and wrap a branch name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if let Some(reason) = Self::violation(&name) {
            return Err(TypeError::InvalidBranchName(reason));
        }
        Ok(Self(name))
    }

    fn violation(name: &str) -> Option<String> {
        const FORBIDDEN_CHARS: [char; 7] = ['~', '^', ':', '\\', '?', '*', '['];
        const FORBIDDEN_SEQUENCES: [&str; 3] = ["..", "@{", "//"];

        if name.is_empty() || name == "@" {
            return Some(format!("'{}' is reserved", name));
        }
        if name.starts_with('-') || name.ends_with('/') {
            return Some("cannot start with '-' or end with '/'".into());
        }
        if let Some(seq) = FORBIDDEN_SEQUENCES.iter().find(|seq| name.contains(**seq)) {
            return Some(format!("cannot contain '{}'", seq));
        }
        if let Some(c) = name
            .chars()
            .find(|c| FORBIDDEN_CHARS.contains(c) || c.is_whitespace() || c.is_control())
        {
            return Some(format!("cannot contain {:?}", c));
        }
        name.split('/')
            .find(|part| part.starts_with('.') || part.ends_with(".lock"))
            .map(|part| format!("component '{}' cannot start with '.' or end with '.lock'", part))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BranchName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

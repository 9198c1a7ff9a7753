//! forge::types
//!
//! Normalized entities returned by [`CodeApi`](super::CodeApi) calls.
//!
//! # Design
//!
//! These are the host-facing shapes. They are derived from the most recent
//! provider response and never cached. Field names follow the JSON the host
//! consumes, so every type is `Serialize` and round-trips through `serde_json`.

use serde::{Deserialize, Serialize};

/// Repository reference supplied by the host on every call.
///
/// `ref_name` is the branch or tag the user is looking at, `commit` is the
/// sha it has already been resolved to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryModel {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Branch or tag name
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Resolved commit sha
    pub commit: String,
}

impl RepositoryModel {
    /// Create a repository reference.
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        ref_name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            ref_name: ref_name.into(),
            commit: commit.into(),
        }
    }

    /// `owner/name`, the path prefix used by every repository endpoint.
    pub fn project_path(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Directory
    Tree,
    /// Regular file or symlink
    Blob,
    /// Submodule
    Commit,
    /// Anything the provider reports that we do not model
    #[serde(other)]
    Other,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Tree => write!(f, "tree"),
            EntryKind::Blob => write!(f, "blob"),
            EntryKind::Commit => write!(f, "commit"),
            EntryKind::Other => write!(f, "other"),
        }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Object id of the entry, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name (last path segment)
    pub name: String,
    /// Full path from the repository root
    pub path: String,
    /// Entry kind
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// File mode string (e.g. `100644`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Parameters identifying a blob to fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryParam {
    /// Path from the repository root
    pub path: String,
}

impl EntryParam {
    /// Create a blob parameter for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Commit pointer inside a branch or tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    /// Commit sha
    pub id: String,
}

/// A branch or tag as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchOrTag {
    /// Branch or tag name
    pub name: String,
    /// Head commit
    pub commit: CommitRef,
    /// Whether the branch is protected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
}

/// A branch returned from branch creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name
    pub name: String,
    /// Full ref name
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Head commit
    pub commit: CommitRef,
}

/// Author details attached to a blame commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameAuthor {
    /// Avatar URL, empty when unknown
    pub avatar_url: String,
}

/// Commit metadata for one blame group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameCommit {
    /// Commit sha
    pub id: String,
    /// Author display name
    pub author_name: String,
    /// Author email, `no_email` when the provider has none
    pub author_email: String,
    /// Authored time in epoch milliseconds
    pub authored_date: Option<i64>,
    /// Committed time in epoch milliseconds
    pub committed_date: Option<i64>,
    /// Commit title
    pub message: String,
    /// Author details
    pub author: BlameAuthor,
}

/// A line range attributed to a blame commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameLine {
    /// First line of the range (1-based) in the current file
    pub current_number: u32,
    /// Number of lines in the range
    pub effect_line: u32,
    /// First line of the range in the previous revision
    pub previous_number: u32,
}

/// All line ranges attributed to one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitlensBlame {
    /// The commit
    pub commit: BlameCommit,
    /// Line ranges in first-seen order
    pub lines: Vec<BlameLine>,
}

/// Kind of change in a bulk file mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileActionType {
    /// Create a new file
    Create,
    /// Replace the content of an existing file
    Update,
    /// Remove a file
    Delete,
}

impl FileActionType {
    /// The lowercase verb the provider expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileActionType::Create => "create",
            FileActionType::Update => "update",
            FileActionType::Delete => "delete",
        }
    }
}

impl std::fmt::Display for FileActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(FileActionType::Create),
            "update" => Ok(FileActionType::Update),
            "delete" => Ok(FileActionType::Delete),
            other => Err(format!(
                "invalid action '{}', must be one of: create, update, delete",
                other
            )),
        }
    }
}

/// One file change in a bulk mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAction {
    /// Kind of change
    pub action_type: FileActionType,
    /// Target path
    pub file_path: String,
    /// New content (absent for deletes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Commit metadata for a bulk mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileActionHeader {
    /// Branch to commit to
    pub branch: String,
    /// Commit message
    pub commit_message: String,
}

/// Outcome of a successful bulk mutation.
///
/// `extra` holds every response field that is not one of the named ones,
/// so hosts see the provider's full commit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileActionResult {
    /// Whether the commit created the branch
    pub branch_created: bool,
    /// Branch committed to
    pub branch: String,
    /// Resulting commit sha
    pub commit_id: String,
    /// File name, empty for batch commits
    pub file_name: String,
    /// Remaining provider fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Repository summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier (the repository name on AtomGit)
    pub id: String,
    /// Default branch
    pub default_branch: String,
}

/// Authenticated user summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name
    pub login: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// A content search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSearchResult {
    /// File path
    pub path: String,
    /// Line number of the match
    pub line: u32,
    /// Matched line content
    pub content: String,
}

/// Commit listing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitParams {
    /// Branch, tag or sha to list from
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Restrict to commits touching this path
    pub path: Option<String>,
    /// 1-based page
    pub page: u32,
    /// Page size
    pub page_size: u32,
}

/// A commit in a history listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit sha
    pub id: String,
    /// Parent shas
    pub parents: Vec<String>,
    /// Author name
    pub author: String,
    /// Author email
    pub author_email: String,
    /// Author time in epoch milliseconds
    pub author_date: i64,
    /// Full message
    pub message: String,
}

/// A file changed by a commit or between two commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFileChange {
    /// Path before the change
    pub old_file_path: String,
    /// Path after the change
    pub new_file_path: String,
    /// `added`, `modified`, `deleted` or `renamed`
    #[serde(rename = "type")]
    pub change_type: String,
    /// Lines added
    pub additions: u32,
    /// Lines deleted
    pub deletions: u32,
}

/// Parameters for an entry metadata lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfoParam {
    /// Path from the repository root
    pub path: String,
}

/// Entry metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    /// Size in bytes
    pub size: u64,
    /// `text` or `binary`
    pub file_type: String,
}

/// Pull request created on the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestCreated {
    /// Provider id of the pull request
    pub id: String,
    /// Web URL
    pub url: String,
}

/// Result of asking whether conflicts can be resolved online.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictCheck {
    /// Whether online resolution is possible
    pub can_resolve: bool,
}

/// Conflicting files between two branches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSet {
    /// Conflicting paths
    pub files: Vec<String>,
}

/// Resolved file contents to submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResolution {
    /// `(path, content)` pairs
    pub files: Vec<(String, String)>,
    /// Commit message for the resolution commit
    pub commit_message: String,
}

/// Result of submitting a conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveConflictResult {
    /// Resolution commit sha
    pub commit_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_model_serializes_ref() {
        let repo = RepositoryModel::new("octo", "demo", "main", "abc");
        let json = serde_json::to_value(&repo).unwrap();
        assert_eq!(json["ref"], "main");
        assert_eq!(repo.project_path(), "octo/demo");
    }

    #[test]
    fn entry_kind_unknown_maps_to_other() {
        let kind: EntryKind = serde_json::from_str("\"symlink\"").unwrap();
        assert_eq!(kind, EntryKind::Other);
        let kind: EntryKind = serde_json::from_str("\"blob\"").unwrap();
        assert_eq!(kind, EntryKind::Blob);
    }

    #[test]
    fn file_action_type_parsing() {
        assert_eq!("CREATE".parse::<FileActionType>().unwrap(), FileActionType::Create);
        assert_eq!("delete".parse::<FileActionType>().unwrap(), FileActionType::Delete);
        assert!("rename".parse::<FileActionType>().is_err());
        assert_eq!(FileActionType::Update.to_string(), "update");
    }

    #[test]
    fn file_action_result_flattens_extra_fields() {
        let mut extra = serde_json::Map::new();
        extra.insert("id".into(), serde_json::json!("abc123"));
        let result = FileActionResult {
            branch_created: false,
            branch: "main".into(),
            commit_id: "abc123".into(),
            file_name: String::new(),
            extra,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["commit_id"], "abc123");
        assert_eq!(json["branch_created"], false);
    }

    #[test]
    fn branch_serializes_ref_field() {
        let branch = Branch {
            name: "feature".into(),
            ref_name: "refs/heads/feature".into(),
            commit: CommitRef { id: "deadbeef".into() },
        };
        let json = serde_json::to_value(&branch).unwrap();
        assert_eq!(json["ref"], "refs/heads/feature");
        assert_eq!(json["commit"]["id"], "deadbeef");
    }
}

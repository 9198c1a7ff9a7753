//! forge::atomgit::api
//!
//! Request and response schemas for the AtomGit REST endpoints.
//!
//! Every endpoint the adapter calls has an explicit schema here; responses
//! are parsed at the boundary instead of trusting field presence. Optional
//! provider fields default rather than fail.

use serde::{Deserialize, Serialize};

use crate::forge::types::EntryKind;

// --------------------------------------------------------------------------
// Responses
// --------------------------------------------------------------------------

/// `GET /repos/{owner}/{name}/branches/{ref}`
#[derive(Debug, Clone, Deserialize)]
pub struct BranchDetail {
    /// Branch name
    #[serde(default)]
    pub name: String,
    /// Head commit
    pub commit: CommitSha,
}

/// Commit pointer carrying a `sha`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitSha {
    /// Commit sha
    pub sha: String,
}

/// Element of `GET /repos/{owner}/{name}/trees/{sha}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FileTreeEntry {
    /// Object id
    #[serde(default)]
    pub sha: Option<String>,
    /// Path from the repository root
    pub path: String,
    /// Object kind
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// File mode
    #[serde(default)]
    pub mode: Option<String>,
}

/// `GET /repos/{owner}/{name}/contents` and `.../contents/file`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlob {
    /// `file`, `dir`, `symlink` or `submodule`
    #[serde(rename = "type")]
    pub kind: String,
    /// `base64` when the content is encoded
    #[serde(default)]
    pub encoding: Option<String>,
    /// Content, possibly encoded
    #[serde(default)]
    pub content: String,
}

/// Element of `GET /repos/{owner}/{name}/branches`.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchInfo {
    /// Branch name
    pub name: String,
    /// Head commit
    pub commit: CommitSha,
    /// Whether the branch is protected
    #[serde(default)]
    pub protected: Option<bool>,
}

/// Element of `GET /repos/{owner}/{name}/files/blame`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileBlameSegment {
    /// Commit the segment is attributed to
    pub commit: BlameCommitInfo,
    /// First line of the segment (1-based)
    pub start: u32,
    /// Line contents of the segment
    #[serde(default)]
    pub contents: Vec<String>,
}

/// Commit metadata of a blame segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlameCommitInfo {
    /// Commit sha
    pub id: String,
    /// Author display name
    #[serde(default)]
    pub author_name: String,
    /// Author email
    #[serde(default)]
    pub author_email: Option<String>,
    /// Commit time (RFC 3339)
    #[serde(default)]
    pub created_at: Option<String>,
    /// Commit title
    #[serde(default)]
    pub title: String,
    /// Platform user behind the author
    #[serde(default)]
    pub user: Option<BlameUser>,
}

/// Platform user attached to a blame commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlameUser {
    /// Avatar URL
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// `POST /repos/{owner}/{name}/git/refs`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefObject {
    /// Full ref name
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Object the ref points to
    #[serde(default)]
    pub object: Option<CommitSha>,
}

/// `GET /repos/{owner}/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoInfo {
    /// Repository name
    pub name: String,
    /// Default branch
    #[serde(default)]
    pub default_branch: String,
}

/// Element of a recursive tree listing; only blobs are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct FileName {
    /// Path from the repository root
    pub path: String,
    /// Object kind
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

// --------------------------------------------------------------------------
// Requests
// --------------------------------------------------------------------------

/// Body of `POST /repos/{owner}/{name}/commits/create`.
#[derive(Debug, Serialize)]
pub struct CreateCommitBody<'a> {
    /// File changes
    pub actions: Vec<CommitActionBody<'a>>,
    /// Target branch
    pub branch: &'a str,
    /// Commit message
    pub commit_message: &'a str,
}

/// One change inside [`CreateCommitBody`].
#[derive(Debug, Serialize)]
pub struct CommitActionBody<'a> {
    /// `create`, `update` or `delete`
    pub action: &'static str,
    /// Target path
    pub file_path: &'a str,
    /// New content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
    /// Path before the change; AtomGit expects the target path here
    pub previous_path: &'a str,
}

/// Body of `POST /repos/{owner}/{name}/git/refs`.
#[derive(Debug, Serialize)]
pub struct CreateRefBody<'a> {
    /// Source ref or sha
    pub sha: &'a str,
    /// New branch name
    #[serde(rename = "ref")]
    pub ref_name: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_blob_defaults() {
        let blob: ContentBlob = serde_json::from_str(r#"{"type": "dir"}"#).unwrap();
        assert_eq!(blob.kind, "dir");
        assert!(blob.encoding.is_none());
        assert!(blob.content.is_empty());
    }

    #[test]
    fn blame_segment_deserialize() {
        let json = r#"{
            "commit": {
                "id": "c1",
                "author_name": "Ada",
                "created_at": "2024-03-01T10:00:00+08:00",
                "title": "init",
                "user": {"avatar_url": "https://a/1.png"}
            },
            "start": 3,
            "contents": ["a", "b"]
        }"#;
        let seg: FileBlameSegment = serde_json::from_str(json).unwrap();
        assert_eq!(seg.commit.id, "c1");
        assert!(seg.commit.author_email.is_none());
        assert_eq!(seg.start, 3);
        assert_eq!(seg.contents.len(), 2);
    }

    #[test]
    fn ref_object_without_target() {
        let obj: RefObject = serde_json::from_str(r#"{"ref": "refs/heads/x"}"#).unwrap();
        assert_eq!(obj.ref_name, "refs/heads/x");
        assert!(obj.object.is_none());
    }

    #[test]
    fn create_commit_body_omits_missing_content() {
        let body = CreateCommitBody {
            actions: vec![CommitActionBody {
                action: "delete",
                file_path: "a.txt",
                content: None,
                previous_path: "a.txt",
            }],
            branch: "main",
            commit_message: "rm",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["actions"][0].get("content").is_none());
        assert_eq!(json["actions"][0]["previous_path"], "a.txt");
    }

    #[test]
    fn create_ref_body_uses_ref_key() {
        let body = CreateRefBody {
            sha: "deadbeef",
            ref_name: "refs/heads/feature",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["ref"], "refs/heads/feature");
        assert_eq!(json["sha"], "deadbeef");
    }
}

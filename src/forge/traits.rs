//! forge::traits
//!
//! The `CodeApi` contract every code hosting adapter implements.
//!
//! # Design
//!
//! The trait is async because every operation involves network I/O.
//! All methods return `Result` so hosts can tell runtime failures
//! (`Unauthorized`, `NotFound`, `Request`) from integration gaps
//! (`NotImplemented`).
//!
//! # Example
//!
//! ```ignore
//! use atomgit_code_api::forge::{CodeApi, EntryParam, RepositoryModel};
//!
//! async fn read_readme(api: &dyn CodeApi, repo: &RepositoryModel) -> Result<Vec<u8>, ForgeError> {
//!     api.get_blob(repo, &EntryParam::new("README.md")).await
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use super::types::{
    Branch, BranchOrTag, CommitFileChange, CommitParams, CommitRecord, ConflictCheck,
    ConflictResolution, ConflictSet, ContentSearchResult, EntryInfo, EntryInfoParam, EntryParam,
    FileAction, FileActionHeader, FileActionResult, Project, PullRequestCreated,
    RepositoryModel, ResolveConflictResult, TreeEntry, User,
};

/// Notification key for unauthorized requests.
pub const MESSAGE_UNAUTHORIZED: &str = "atomgit.unauthorized";

/// Notification key for missing resources.
pub const MESSAGE_NOT_FOUND: &str = "error.resource-not-found";

/// Notification key for any other request failure.
pub const MESSAGE_REQUEST: &str = "error.request";

/// Errors from code hosting operations.
///
/// Messages never contain credentials.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// The provider rejected the credential (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other failed request: non-success status, transport error.
    #[error("request failed{}: {message}", status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    Request {
        /// HTTP status code, absent for transport failures
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// The provider answered with a body that does not match its schema.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A blob was requested for something that is not a file.
    #[error("{0} is not a file")]
    NotAFile(String),

    /// The operation is not supported by this provider.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

impl ForgeError {
    /// The host notification key for this failure.
    ///
    /// Schema mismatches are reported like any other request failure.
    pub fn message_key(&self) -> &'static str {
        match self {
            ForgeError::Unauthorized => MESSAGE_UNAUTHORIZED,
            ForgeError::NotFound(_) => MESSAGE_NOT_FOUND,
            _ => MESSAGE_REQUEST,
        }
    }

    /// HTTP status associated with the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ForgeError::Unauthorized => Some(401),
            ForgeError::NotFound(_) => Some(404),
            ForgeError::Request { status, .. } => *status,
            _ => None,
        }
    }
}

/// Caller-controlled failure surfacing.
///
/// With `error_option: false` a failed request is logged and the call
/// resolves to `None` instead of notifying the host and failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseOptions {
    /// Surface failures to the host and the caller
    pub error_option: bool,
}

impl Default for ResponseOptions {
    fn default() -> Self {
        Self { error_option: true }
    }
}

impl ResponseOptions {
    /// Options that swallow failures.
    pub fn silent() -> Self {
        Self {
            error_option: false,
        }
    }
}

/// The code hosting contract.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// - `Unauthorized`: the adapter already ran its authorization handshake;
///   the caller may retry
/// - `NotFound` / `Request` / `InvalidResponse`: the host was notified
/// - `NotAFile`: the path names a directory or submodule
/// - `NotImplemented`: never a runtime condition, fix the integration
#[async_trait]
pub trait CodeApi: Send + Sync {
    /// Provider identifier (e.g., "atomgit").
    fn name(&self) -> &'static str;

    /// Whether the adapter can make authenticated calls.
    ///
    /// Returns `true` immediately when a credential is held, otherwise runs
    /// the authorization handshake and returns its outcome.
    async fn available(&self) -> bool;

    /// Resolve a branch name to its head commit sha.
    async fn get_commit(&self, repo: &RepositoryModel, ref_name: &str)
        -> Result<String, ForgeError>;

    /// List one directory at `repo.commit`.
    async fn get_tree(&self, repo: &RepositoryModel, path: &str)
        -> Result<Vec<TreeEntry>, ForgeError>;

    /// Fetch file content at `repo.ref_name`.
    async fn get_blob(&self, repo: &RepositoryModel, entry: &EntryParam)
        -> Result<Vec<u8>, ForgeError>;

    /// Fetch file content at an explicit commit.
    ///
    /// Resolves to `None` when the request fails and `options` suppress errors.
    async fn get_blob_by_commit_path(
        &self,
        repo: &RepositoryModel,
        commit: &str,
        path: &str,
        options: ResponseOptions,
    ) -> Result<Option<Vec<u8>>, ForgeError>;

    /// List branches. Empty when unauthenticated.
    async fn get_branches(&self, repo: &RepositoryModel) -> Result<Vec<BranchOrTag>, ForgeError>;

    /// List branch names only.
    async fn get_branch_names(&self, repo: &RepositoryModel) -> Result<Vec<String>, ForgeError>;

    /// List tags.
    async fn get_tags(&self, repo: &RepositoryModel) -> Result<Vec<BranchOrTag>, ForgeError>;

    /// Map a repository path to a directly loadable URL.
    fn transform_static_resource(
        &self,
        repo: &RepositoryModel,
        path: &str,
    ) -> Result<String, ForgeError>;

    /// Search file contents.
    async fn search_content(
        &self,
        repo: &RepositoryModel,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ContentSearchResult>, ForgeError>;

    /// Search file names.
    async fn search_file(
        &self,
        repo: &RepositoryModel,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<String>, ForgeError>;

    /// Blame a file at `repo.commit`, encoded as JSON bytes of
    /// `Vec<GitlensBlame>`.
    async fn get_file_blame(&self, repo: &RepositoryModel, path: &str)
        -> Result<Vec<u8>, ForgeError>;

    /// List commits.
    async fn get_commits(
        &self,
        repo: &RepositoryModel,
        params: &CommitParams,
    ) -> Result<Vec<CommitRecord>, ForgeError>;

    /// Files changed by one commit.
    async fn get_commit_diff(
        &self,
        repo: &RepositoryModel,
        sha: &str,
    ) -> Result<Vec<CommitFileChange>, ForgeError>;

    /// Files changed between two commits.
    async fn get_commit_compare(
        &self,
        repo: &RepositoryModel,
        from: &str,
        to: &str,
    ) -> Result<Vec<CommitFileChange>, ForgeError>;

    /// Entry metadata.
    async fn get_entry_info(
        &self,
        repo: &RepositoryModel,
        entry: &EntryInfoParam,
    ) -> Result<EntryInfo, ForgeError>;

    /// Every file path at `repo.commit`.
    async fn get_files(&self, repo: &RepositoryModel) -> Result<Vec<String>, ForgeError>;

    /// Commit a batch of file changes in one request.
    ///
    /// Returns a single result on success and an empty list when the
    /// provider reports no commit.
    async fn bulk_change_files(
        &self,
        repo: &RepositoryModel,
        actions: &[FileAction],
        header: &FileActionHeader,
    ) -> Result<Vec<FileActionResult>, ForgeError>;

    /// Create `new_branch` pointing at `ref_name`.
    async fn create_branch(
        &self,
        repo: &RepositoryModel,
        new_branch: &str,
        ref_name: &str,
    ) -> Result<Branch, ForgeError>;

    /// The authenticated user, when the provider exposes one.
    async fn get_user(&self, repo: &RepositoryModel) -> Result<Option<User>, ForgeError>;

    /// Repository summary.
    async fn get_project(&self, repo: &RepositoryModel) -> Result<Project, ForgeError>;

    /// Open a pull request.
    async fn create_pull_request(
        &self,
        repo: &RepositoryModel,
        source_branch: &str,
        target_branch: &str,
        title: &str,
        auto_merge: bool,
    ) -> Result<PullRequestCreated, ForgeError>;

    /// Whether conflicts of a pull request can be resolved online.
    async fn can_resolve_conflict(
        &self,
        repo: &RepositoryModel,
        source_branch: &str,
        target_branch: &str,
        pr_id: &str,
    ) -> Result<ConflictCheck, ForgeError>;

    /// Submit a conflict resolution.
    async fn resolve_conflict(
        &self,
        repo: &RepositoryModel,
        resolution: &ConflictResolution,
        source_branch: &str,
        target_branch: &str,
        pr_id: Option<&str>,
    ) -> Result<ResolveConflictResult, ForgeError>;

    /// Conflicting files between two branches.
    async fn get_conflict(
        &self,
        repo: &RepositoryModel,
        source_branch: &str,
        target_branch: &str,
    ) -> Result<ConflictSet, ForgeError>;

    /// Merge base of two refs.
    async fn merge_base(
        &self,
        repo: &RepositoryModel,
        target: &str,
        source: &str,
    ) -> Result<CommitRecord, ForgeError>;

    /// Drop the held credential and its stored copy.
    fn clear_token(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forge_error_display() {
        assert_eq!(format!("{}", ForgeError::Unauthorized), "unauthorized");
        assert_eq!(
            format!("{}", ForgeError::NotFound("/repos/a/b".into())),
            "not found: /repos/a/b"
        );
        assert_eq!(
            format!(
                "{}",
                ForgeError::Request {
                    status: Some(500),
                    message: "boom".into()
                }
            ),
            "request failed (500): boom"
        );
        assert_eq!(
            format!(
                "{}",
                ForgeError::Request {
                    status: None,
                    message: "connection refused".into()
                }
            ),
            "request failed: connection refused"
        );
        assert_eq!(
            format!("{}", ForgeError::NotAFile("src".into())),
            "src is not a file"
        );
        assert_eq!(
            format!("{}", ForgeError::NotImplemented("get_commits")),
            "not implemented: get_commits"
        );
    }

    #[test]
    fn message_keys() {
        assert_eq!(ForgeError::Unauthorized.message_key(), MESSAGE_UNAUTHORIZED);
        assert_eq!(
            ForgeError::NotFound("x".into()).message_key(),
            MESSAGE_NOT_FOUND
        );
        assert_eq!(
            ForgeError::Request {
                status: Some(502),
                message: String::new()
            }
            .message_key(),
            MESSAGE_REQUEST
        );
        assert_eq!(
            ForgeError::InvalidResponse("bad".into()).message_key(),
            MESSAGE_REQUEST
        );
    }

    #[test]
    fn status_mapping() {
        assert_eq!(ForgeError::Unauthorized.status(), Some(401));
        assert_eq!(ForgeError::NotFound("x".into()).status(), Some(404));
        assert_eq!(ForgeError::NotImplemented("x").status(), None);
    }

    #[test]
    fn response_options_default_surfaces_errors() {
        assert!(ResponseOptions::default().error_option);
        assert!(!ResponseOptions::silent().error_option);
    }
}

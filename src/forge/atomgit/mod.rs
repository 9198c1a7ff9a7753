//! forge::atomgit
//!
//! [`CodeApi`] implementation for the AtomGit REST API.
//!
//! # Architecture
//!
//! - [`api`]: explicit request/response schemas per endpoint
//! - `request`: shared execution, credential attachment, failure translation
//! - this module: per-operation paths and reshaping into normalized entities
//!
//! Operations AtomGit does not offer fail with
//! [`ForgeError::NotImplemented`] without touching the network.
//!
//! # Example
//!
//! ```ignore
//! use atomgit_code_api::forge::atomgit::AtomGitApi;
//! use atomgit_code_api::forge::{CodeApi, RepositoryModel};
//!
//! let api = AtomGitApi::new(platform, &authorization, credential, host, flow);
//! let repo = RepositoryModel::new("openharmony", "docs", "master", "");
//! let sha = api.get_commit(&repo, "master").await?;
//! ```

pub mod api;
mod request;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

pub use request::{RequestOptions, USER_AGENT_VALUE};

use self::api::{
    BranchDetail, BranchInfo, CommitActionBody, ContentBlob, CreateCommitBody, CreateRefBody,
    FileBlameSegment, FileName, FileTreeEntry, RefObject, RepoInfo,
};
use super::traits::{CodeApi, ForgeError, ResponseOptions};
use super::types::{
    Branch, BranchOrTag, CommitFileChange, CommitParams, CommitRecord, CommitRef, ConflictCheck,
    ConflictResolution, ConflictSet, ContentSearchResult, EntryInfo, EntryInfoParam, EntryKind,
    EntryParam, FileAction, FileActionHeader, FileActionResult, Project, PullRequestCreated,
    RepositoryModel, ResolveConflictResult, TreeEntry, User,
};
use super::{blame, content};
use crate::auth::{AuthorizationFlow, Authorizer, CredentialCache};
use crate::core::config::{AuthorizationConfig, PlatformConfig};
use crate::host::Host;

/// The AtomGit adapter.
pub struct AtomGitApi {
    client: Client,
    platform: PlatformConfig,
    credential: Arc<CredentialCache>,
    host: Arc<dyn Host>,
    authorizer: Authorizer,
}

// Custom Debug to avoid exposing token
impl std::fmt::Debug for AtomGitApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomGitApi")
            .field("platform", &self.platform)
            .field("credential", &self.credential)
            .finish()
    }
}

impl AtomGitApi {
    /// Provider identifier.
    pub const NAME: &'static str = "atomgit";

    /// Create an adapter.
    ///
    /// `credential` is shared with whoever else needs the token (e.g. a CLI
    /// `auth --status`); `host` and `flow` drive the handshake.
    pub fn new(
        platform: PlatformConfig,
        authorization: &AuthorizationConfig,
        credential: Arc<CredentialCache>,
        host: Arc<dyn Host>,
        flow: Arc<dyn AuthorizationFlow>,
    ) -> Self {
        let authorizer = Authorizer::new(
            Arc::clone(&credential),
            Arc::clone(&host),
            flow,
            &platform,
            authorization,
        );
        Self {
            client: Client::new(),
            platform,
            credential,
            host,
            authorizer,
        }
    }

    /// Platform settings in use.
    pub fn platform(&self) -> &PlatformConfig {
        &self.platform
    }

    /// The shared credential.
    pub fn credential(&self) -> &Arc<CredentialCache> {
        &self.credential
    }

    /// The handshake runner.
    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// `/repos/{owner}/{name}{suffix}`
    fn repo_path(repo: &RepositoryModel, suffix: &str) -> String {
        format!("/repos/{}{}", repo.project_path(), suffix)
    }
}

/// Last segment of a slash-separated path.
fn display_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Parse each element of a JSON list into `T`.
fn parse_items<T: serde::de::DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, ForgeError> {
    items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| ForgeError::InvalidResponse(e.to_string()))
}

/// Overlay the provider's commit record onto the default result fields.
///
/// A named field only takes the provider's value when it has the
/// field's type; anything else keeps the default.
fn file_action_result(
    header: &FileActionHeader,
    commit_id: &str,
    mut response: serde_json::Map<String, Value>,
) -> FileActionResult {
    let branch_created = match response.remove("branch_created") {
        Some(Value::Bool(created)) => created,
        other => {
            ignore_mistyped("branch_created", other);
            false
        }
    };
    let mut text = |key: &str, default: String| match response.remove(key) {
        Some(Value::String(value)) => value,
        other => {
            ignore_mistyped(key, other);
            default
        }
    };
    let branch = text("branch", header.branch.clone());
    let commit_id = text("commit_id", commit_id.to_string());
    let file_name = text("file_name", String::new());

    FileActionResult {
        branch_created,
        branch,
        commit_id,
        file_name,
        extra: response,
    }
}

fn ignore_mistyped(key: &str, value: Option<Value>) {
    if let Some(value) = value {
        tracing::debug!(key, %value, "ignoring commit record field of unexpected type");
    }
}

#[async_trait]
impl CodeApi for AtomGitApi {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn available(&self) -> bool {
        if self.credential.is_present() {
            return true;
        }

        match self.authorizer.authorize().await {
            Ok(authorized) => authorized,
            Err(e) => {
                tracing::warn!(error = %e, "authorization failed");
                false
            }
        }
    }

    async fn get_commit(
        &self,
        repo: &RepositoryModel,
        ref_name: &str,
    ) -> Result<String, ForgeError> {
        let path = Self::repo_path(
            repo,
            &format!("/branches/{}", urlencoding::encode(ref_name)),
        );
        let detail: BranchDetail = self.request(&path, RequestOptions::get()).await?;
        Ok(detail.commit.sha)
    }

    async fn get_tree(
        &self,
        repo: &RepositoryModel,
        path: &str,
    ) -> Result<Vec<TreeEntry>, ForgeError> {
        let endpoint = Self::repo_path(repo, &format!("/trees/{}", repo.commit));
        let body: Value = self
            .request(&endpoint, RequestOptions::get().param("file_path", path))
            .await?;

        let Value::Array(items) = body else {
            return Ok(Vec::new());
        };

        Ok(parse_items::<FileTreeEntry>(items)?
            .into_iter()
            .map(|entry| TreeEntry {
                name: display_name(&entry.path).to_string(),
                id: entry.sha,
                path: entry.path,
                kind: entry.kind,
                mode: entry.mode,
            })
            .collect())
    }

    async fn get_blob(
        &self,
        repo: &RepositoryModel,
        entry: &EntryParam,
    ) -> Result<Vec<u8>, ForgeError> {
        let endpoint = Self::repo_path(repo, "/contents");
        let blob: ContentBlob = self
            .request(
                &endpoint,
                RequestOptions::get()
                    .param("ref", repo.ref_name.as_str())
                    .param("path", entry.path.as_str()),
            )
            .await?;
        content::decode_blob(blob, &entry.path)
    }

    async fn get_blob_by_commit_path(
        &self,
        repo: &RepositoryModel,
        commit: &str,
        path: &str,
        options: ResponseOptions,
    ) -> Result<Option<Vec<u8>>, ForgeError> {
        let endpoint = Self::repo_path(repo, "/contents/file");
        let blob: Option<ContentBlob> = self
            .request_with(
                &endpoint,
                RequestOptions::get().param("path", path).param("ref", commit),
                options,
            )
            .await?;

        blob.map(|b| content::decode_blob(b, path)).transpose()
    }

    async fn get_branches(&self, repo: &RepositoryModel) -> Result<Vec<BranchOrTag>, ForgeError> {
        if !self.credential.is_present() {
            tracing::debug!("no credential, skipping branch listing");
            return Ok(Vec::new());
        }

        let body: Value = self
            .request(&Self::repo_path(repo, "/branches"), RequestOptions::get())
            .await?;
        let Value::Array(items) = body else {
            return Err(ForgeError::InvalidResponse(
                "branch listing is not a list".into(),
            ));
        };

        Ok(parse_items::<BranchInfo>(items)?
            .into_iter()
            .map(|branch| BranchOrTag {
                name: branch.name,
                commit: CommitRef {
                    id: branch.commit.sha,
                },
                protected: branch.protected,
            })
            .collect())
    }

    async fn get_branch_names(&self, _repo: &RepositoryModel) -> Result<Vec<String>, ForgeError> {
        Err(ForgeError::NotImplemented("get_branch_names"))
    }

    async fn get_tags(&self, _repo: &RepositoryModel) -> Result<Vec<BranchOrTag>, ForgeError> {
        Ok(Vec::new())
    }

    fn transform_static_resource(
        &self,
        _repo: &RepositoryModel,
        _path: &str,
    ) -> Result<String, ForgeError> {
        Err(ForgeError::NotImplemented("transform_static_resource"))
    }

    async fn search_content(
        &self,
        _repo: &RepositoryModel,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<ContentSearchResult>, ForgeError> {
        Ok(Vec::new())
    }

    async fn search_file(
        &self,
        _repo: &RepositoryModel,
        _query: &str,
        _limit: Option<usize>,
    ) -> Result<Vec<String>, ForgeError> {
        Ok(Vec::new())
    }

    async fn get_file_blame(
        &self,
        repo: &RepositoryModel,
        path: &str,
    ) -> Result<Vec<u8>, ForgeError> {
        let segments: Vec<FileBlameSegment> = self
            .request(
                &Self::repo_path(repo, "/files/blame"),
                RequestOptions::get()
                    .param("file_path", path)
                    .param("sha", repo.commit.as_str()),
            )
            .await?;
        blame::encode(&blame::group_segments(segments))
    }

    async fn get_commits(
        &self,
        _repo: &RepositoryModel,
        _params: &CommitParams,
    ) -> Result<Vec<CommitRecord>, ForgeError> {
        Err(ForgeError::NotImplemented("get_commits"))
    }

    async fn get_commit_diff(
        &self,
        _repo: &RepositoryModel,
        _sha: &str,
    ) -> Result<Vec<CommitFileChange>, ForgeError> {
        Err(ForgeError::NotImplemented("get_commit_diff"))
    }

    async fn get_commit_compare(
        &self,
        _repo: &RepositoryModel,
        _from: &str,
        _to: &str,
    ) -> Result<Vec<CommitFileChange>, ForgeError> {
        Err(ForgeError::NotImplemented("get_commit_compare"))
    }

    async fn get_entry_info(
        &self,
        _repo: &RepositoryModel,
        _entry: &EntryInfoParam,
    ) -> Result<EntryInfo, ForgeError> {
        Err(ForgeError::NotImplemented("get_entry_info"))
    }

    async fn get_files(&self, repo: &RepositoryModel) -> Result<Vec<String>, ForgeError> {
        let endpoint = Self::repo_path(repo, &format!("/trees/{}", repo.commit));
        let body: Value = self
            .request(&endpoint, RequestOptions::get().param("recursive", "true"))
            .await?;

        let Value::Array(items) = body else {
            return Ok(Vec::new());
        };

        Ok(parse_items::<FileName>(items)?
            .into_iter()
            .filter(|file| file.kind == EntryKind::Blob)
            .map(|file| file.path)
            .collect())
    }

    async fn bulk_change_files(
        &self,
        repo: &RepositoryModel,
        actions: &[FileAction],
        header: &FileActionHeader,
    ) -> Result<Vec<FileActionResult>, ForgeError> {
        let body = CreateCommitBody {
            actions: actions
                .iter()
                .map(|action| CommitActionBody {
                    action: action.action_type.as_str(),
                    file_path: &action.file_path,
                    content: action.content.as_deref(),
                    previous_path: &action.file_path,
                })
                .collect(),
            branch: &header.branch,
            commit_message: &header.commit_message,
        };
        let body = serde_json::to_value(&body)
            .map_err(|e| ForgeError::InvalidResponse(format!("cannot encode commit: {}", e)))?;

        let response: serde_json::Map<String, Value> = self
            .request(
                &Self::repo_path(repo, "/commits/create"),
                RequestOptions::post(body),
            )
            .await?;

        let commit_id = response
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if commit_id.is_empty() {
            tracing::warn!(branch = %header.branch, "provider reported no commit");
            return Ok(Vec::new());
        }

        Ok(vec![file_action_result(header, &commit_id, response)])
    }

    async fn create_branch(
        &self,
        repo: &RepositoryModel,
        new_branch: &str,
        ref_name: &str,
    ) -> Result<Branch, ForgeError> {
        let body = serde_json::to_value(CreateRefBody {
            sha: ref_name,
            ref_name: new_branch,
        })
        .map_err(|e| ForgeError::InvalidResponse(format!("cannot encode ref: {}", e)))?;

        let created: RefObject = self
            .request(&Self::repo_path(repo, "/git/refs"), RequestOptions::post(body))
            .await?;

        Ok(Branch {
            name: created.ref_name.clone(),
            ref_name: created.ref_name,
            commit: CommitRef {
                id: created.object.map(|o| o.sha).unwrap_or_default(),
            },
        })
    }

    async fn get_user(&self, _repo: &RepositoryModel) -> Result<Option<User>, ForgeError> {
        Ok(None)
    }

    async fn get_project(&self, repo: &RepositoryModel) -> Result<Project, ForgeError> {
        let info: RepoInfo = self
            .request(&Self::repo_path(repo, ""), RequestOptions::get())
            .await?;
        Ok(Project {
            id: info.name,
            default_branch: info.default_branch,
        })
    }

    async fn create_pull_request(
        &self,
        _repo: &RepositoryModel,
        _source_branch: &str,
        _target_branch: &str,
        _title: &str,
        _auto_merge: bool,
    ) -> Result<PullRequestCreated, ForgeError> {
        Err(ForgeError::NotImplemented("create_pull_request"))
    }

    async fn can_resolve_conflict(
        &self,
        _repo: &RepositoryModel,
        _source_branch: &str,
        _target_branch: &str,
        _pr_id: &str,
    ) -> Result<ConflictCheck, ForgeError> {
        Err(ForgeError::NotImplemented("can_resolve_conflict"))
    }

    async fn resolve_conflict(
        &self,
        _repo: &RepositoryModel,
        _resolution: &ConflictResolution,
        _source_branch: &str,
        _target_branch: &str,
        _pr_id: Option<&str>,
    ) -> Result<ResolveConflictResult, ForgeError> {
        Err(ForgeError::NotImplemented("resolve_conflict"))
    }

    async fn get_conflict(
        &self,
        _repo: &RepositoryModel,
        _source_branch: &str,
        _target_branch: &str,
    ) -> Result<ConflictSet, ForgeError> {
        Err(ForgeError::NotImplemented("get_conflict"))
    }

    async fn merge_base(
        &self,
        _repo: &RepositoryModel,
        _target: &str,
        _source: &str,
    ) -> Result<CommitRecord, ForgeError> {
        Err(ForgeError::NotImplemented("merge_base"))
    }

    fn clear_token(&self) {
        if let Err(e) = self.credential.clear() {
            tracing::warn!(error = %e, "could not remove stored credential");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::types::FileActionType;

    #[test]
    fn display_name_is_last_segment() {
        assert_eq!(display_name("src/lib.rs"), "lib.rs");
        assert_eq!(display_name("README.md"), "README.md");
        assert_eq!(display_name("docs/guide/"), "guide");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn repo_path_format() {
        let repo = RepositoryModel::new("o", "n", "main", "abc");
        assert_eq!(AtomGitApi::repo_path(&repo, ""), "/repos/o/n");
        assert_eq!(AtomGitApi::repo_path(&repo, "/branches"), "/repos/o/n/branches");
    }

    #[test]
    fn file_action_result_overlays_response() {
        let header = FileActionHeader {
            branch: "main".into(),
            commit_message: "msg".into(),
        };
        let response = serde_json::json!({
            "id": "c0ffee",
            "branch_created": true,
            "message": "msg",
        });
        let Value::Object(map) = response else {
            unreachable!()
        };

        let result = file_action_result(&header, "c0ffee", map);
        assert!(result.branch_created);
        assert_eq!(result.branch, "main");
        assert_eq!(result.commit_id, "c0ffee");
        assert_eq!(result.file_name, "");
        assert_eq!(result.extra["id"], "c0ffee");
        assert_eq!(result.extra["message"], "msg");
    }

    #[test]
    fn file_action_result_keeps_defaults_for_mistyped_fields() {
        let header = FileActionHeader {
            branch: "main".into(),
            commit_message: "msg".into(),
        };
        let response = serde_json::json!({
            "id": "c0ffee",
            "branch": null,
            "branch_created": "yes",
            "commit_id": 7,
            "file_name": null,
        });
        let Value::Object(map) = response else {
            unreachable!()
        };

        let result = file_action_result(&header, "c0ffee", map);
        assert!(!result.branch_created);
        assert_eq!(result.branch, "main");
        assert_eq!(result.commit_id, "c0ffee");
        assert_eq!(result.file_name, "");
        assert_eq!(result.extra.len(), 1);
        assert_eq!(result.extra["id"], "c0ffee");
    }

    #[test]
    fn commit_action_body_uses_lowercase_verbs() {
        let action = FileAction {
            action_type: FileActionType::Update,
            file_path: "a.txt".into(),
            content: Some("x".into()),
        };
        let body = CommitActionBody {
            action: action.action_type.as_str(),
            file_path: &action.file_path,
            content: action.content.as_deref(),
            previous_path: &action.file_path,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["action"], "update");
        assert_eq!(json["previous_path"], "a.txt");
    }
}

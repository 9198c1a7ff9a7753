//! cli::commands::repo
//!
//! Repository commands: each one is a thin wrapper around a single
//! [`CodeApi`] call, plus ref resolution where the call needs a commit.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use super::connect;
use crate::cli::args::RepoArgs;
use crate::cli::Context;
use crate::core::types::{BranchName, RepoSlug};
use crate::forge::{
    CodeApi, EntryParam, FileAction, FileActionHeader, FileActionType, GitlensBlame,
    RepositoryModel, ResponseOptions,
};
use crate::ui::output;

/// Build the repository reference for `args`.
///
/// The ref falls back to the project's default branch. With
/// `need_commit`, a missing `--commit` is resolved from the ref.
async fn resolve(api: &dyn CodeApi, args: &RepoArgs, need_commit: bool) -> Result<RepositoryModel> {
    let mut repo = bare_repo(&args.repo);

    repo.ref_name = match &args.ref_name {
        Some(r) => r.clone(),
        None => {
            let project = api
                .get_project(&repo)
                .await
                .with_context(|| format!("Failed to read project {}", args.repo))?;
            project.default_branch
        }
    };

    repo.commit = match &args.commit {
        Some(c) => c.clone(),
        None if need_commit => api
            .get_commit(&repo, &repo.ref_name)
            .await
            .with_context(|| format!("Failed to resolve '{}'", repo.ref_name))?,
        None => String::new(),
    };

    tracing::debug!(repo = %args.repo, ref_name = %repo.ref_name, commit = %repo.commit, "resolved repository");
    Ok(repo)
}

fn bare_repo(slug: &RepoSlug) -> RepositoryModel {
    RepositoryModel::new(slug.owner(), slug.name(), "", "")
}

/// `project`: id and default branch.
pub async fn project(ctx: &Context, args: &RepoArgs) -> Result<()> {
    let api = connect(ctx)?;
    let project = api
        .get_project(&bare_repo(&args.repo))
        .await
        .with_context(|| format!("Failed to read project {}", args.repo))?;

    if ctx.json {
        output::json(&project)?;
    } else {
        println!("{}\t{}", project.id, project.default_branch);
    }
    Ok(())
}

/// `commit`: head commit of a branch.
pub async fn commit(ctx: &Context, args: &RepoArgs) -> Result<()> {
    let api = connect(ctx)?;
    let repo = resolve(&api, args, true).await?;

    if ctx.json {
        output::json(&serde_json::json!({ "ref": repo.ref_name, "commit": repo.commit }))?;
    } else {
        println!("{}", repo.commit);
    }
    Ok(())
}

/// `tree`: one directory listing.
pub async fn tree(ctx: &Context, args: &RepoArgs, path: &str) -> Result<()> {
    let api = connect(ctx)?;
    let repo = resolve(&api, args, true).await?;
    let entries = api
        .get_tree(&repo, path)
        .await
        .with_context(|| format!("Failed to list '{}'", path))?;

    if ctx.json {
        output::json(&entries)?;
    } else if !entries.is_empty() {
        println!("{}", output::format_tree(&entries));
    }
    Ok(())
}

/// `files`: every file path.
pub async fn files(ctx: &Context, args: &RepoArgs) -> Result<()> {
    let api = connect(ctx)?;
    let repo = resolve(&api, args, true).await?;
    let paths = api.get_files(&repo).await.context("Failed to list files")?;

    if ctx.json {
        output::json(&paths)?;
    } else {
        for path in &paths {
            println!("{}", path);
        }
    }
    Ok(())
}

/// `blob`: raw file content on stdout.
pub async fn blob(ctx: &Context, args: &RepoArgs, path: &str) -> Result<()> {
    let api = connect(ctx)?;

    let bytes = match &args.commit {
        Some(commit) => api
            .get_blob_by_commit_path(
                &bare_repo(&args.repo),
                commit,
                path,
                ResponseOptions::default(),
            )
            .await
            .with_context(|| format!("Failed to read '{}' at {}", path, commit))?
            .unwrap_or_default(),
        None => {
            let repo = resolve(&api, args, false).await?;
            api.get_blob(&repo, &EntryParam::new(path))
                .await
                .with_context(|| format!("Failed to read '{}'", path))?
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
    Ok(())
}

/// `branches`: branch list with head commits.
pub async fn branches(ctx: &Context, args: &RepoArgs) -> Result<()> {
    let api = connect(ctx)?;
    let branches = api
        .get_branches(&bare_repo(&args.repo))
        .await
        .context("Failed to list branches")?;

    if ctx.json {
        output::json(&branches)?;
    } else if branches.is_empty() {
        output::info("No branches (not authenticated?)", ctx.verbosity());
    } else {
        println!("{}", output::format_branches(&branches));
    }
    Ok(())
}

/// `blame`: commit groups with their line ranges.
pub async fn blame(ctx: &Context, args: &RepoArgs, path: &str) -> Result<()> {
    let api = connect(ctx)?;
    let repo = resolve(&api, args, true).await?;
    let bytes = api
        .get_file_blame(&repo, path)
        .await
        .with_context(|| format!("Failed to blame '{}'", path))?;
    let groups: Vec<GitlensBlame> =
        serde_json::from_slice(&bytes).context("Failed to decode blame")?;

    if ctx.json {
        output::json(&groups)?;
    } else {
        println!("{}", output::format_blame(&groups));
    }
    Ok(())
}

/// `create-branch`: new branch from a ref or commit.
pub async fn create_branch(ctx: &Context, args: &RepoArgs, name: &BranchName) -> Result<()> {
    let api = connect(ctx)?;
    let repo = resolve(&api, args, true).await?;
    let branch = api
        .create_branch(&repo, name.as_str(), &repo.commit)
        .await
        .with_context(|| format!("Failed to create branch '{}'", name))?;

    if ctx.json {
        output::json(&branch)?;
    } else {
        output::info(
            format!("Created branch '{}' at {}.", branch.name, branch.commit.id),
            ctx.verbosity(),
        );
    }
    Ok(())
}

/// `commit-files`: one commit with every requested change.
pub async fn commit_files(
    ctx: &Context,
    slug: &RepoSlug,
    branch: &BranchName,
    message: &str,
    create: &[String],
    update: &[String],
    delete: &[String],
) -> Result<()> {
    let mut actions = Vec::new();
    for (action_type, specs) in [
        (FileActionType::Create, create),
        (FileActionType::Update, update),
    ] {
        for spec in specs {
            let (path, local) = parse_file_spec(spec)?;
            let content = std::fs::read_to_string(&local)
                .with_context(|| {
                    format!(
                        "Failed to read {} (only UTF-8 text files are supported)",
                        local.display()
                    )
                })?;
            actions.push(FileAction {
                action_type,
                file_path: path,
                content: Some(content),
            });
        }
    }
    for path in delete {
        actions.push(FileAction {
            action_type: FileActionType::Delete,
            file_path: path.clone(),
            content: None,
        });
    }
    if actions.is_empty() {
        bail!("Nothing to commit. Use --create, --update or --delete.");
    }

    let header = FileActionHeader {
        branch: branch.to_string(),
        commit_message: message.to_string(),
    };

    let api = connect(ctx)?;
    let mut repo = bare_repo(slug);
    repo.ref_name = branch.to_string();
    let results = api
        .bulk_change_files(&repo, &actions, &header)
        .await
        .context("Failed to commit files")?;

    if ctx.json {
        output::json(&results)?;
    } else {
        match results.first() {
            Some(result) => output::info(
                format!(
                    "Committed {} change(s) to '{}' as {}.",
                    actions.len(),
                    result.branch,
                    result.commit_id
                ),
                ctx.verbosity(),
            ),
            None => output::info("The provider reported no commit.", ctx.verbosity()),
        }
    }
    Ok(())
}

/// Split `REPO_PATH=LOCAL_FILE`.
pub fn parse_file_spec(spec: &str) -> Result<(String, PathBuf)> {
    match spec.split_once('=') {
        Some((path, local)) if !path.is_empty() && !local.is_empty() => {
            Ok((path.to_string(), PathBuf::from(local)))
        }
        _ => bail!("Invalid file spec '{}': expected REPO_PATH=LOCAL_FILE", spec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_spec_splits_on_first_equals() {
        let (path, local) = parse_file_spec("docs/a=b.md=./a.md").unwrap();
        assert_eq!(path, "docs/a");
        assert_eq!(local, PathBuf::from("b.md=./a.md"));
    }

    #[test]
    fn file_spec_requires_both_sides() {
        assert!(parse_file_spec("docs/a.md").is_err());
        assert!(parse_file_spec("=./a.md").is_err());
        assert!(parse_file_spec("docs/a.md=").is_err());
    }

    #[test]
    fn bare_repo_has_no_ref() {
        let slug: RepoSlug = "openharmony/docs".parse().unwrap();
        let repo = bare_repo(&slug);
        assert_eq!(repo.project_path(), "openharmony/docs");
        assert!(repo.ref_name.is_empty());
        assert!(repo.commit.is_empty());
    }

    #[tokio::test]
    async fn empty_commit_files_fails_before_connecting() {
        let slug: RepoSlug = "a/b".parse().unwrap();
        let branch = BranchName::new("main").unwrap();
        let err = commit_files(&Context::default(), &slug, &branch, "m", &[], &[], &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Nothing to commit"));
    }

    #[tokio::test]
    async fn binary_file_is_rejected_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("logo.png");
        std::fs::write(&local, [0x89, b'P', b'N', b'G', 0xff, 0xfe]).unwrap();
        let spec = format!("logo.png={}", local.display());

        let slug: RepoSlug = "a/b".parse().unwrap();
        let branch = BranchName::new("main").unwrap();
        let err = commit_files(&Context::default(), &slug, &branch, "m", &[spec], &[], &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("only UTF-8 text files are supported"));
    }
}

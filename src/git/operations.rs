//! Subprocess git plumbing
//!
//! Every mutating git interaction goes through list-form `git` invocations
//! with captured exit code, stdout, and stderr. Argument vectors only; no
//! shell strings anywhere.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::error::WorkflowError;

/// Stderr fragments that mark a push failure as transient and retryable
const TRANSIENT_PUSH_ERRORS: &[&str] = &[
    "connection refused",
    "connection reset",
    "timeout",
    "network is unreachable",
    "temporary failure",
    "ssh_exchange_identification",
];

/// Run a git command, capturing output; non-zero exit is not an error here
pub fn run_git(args: &[&str], cwd: Option<&Path>) -> Result<Output> {
    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    debug!("git {}", args.join(" "));
    Ok(cmd.output()?)
}

/// Run a git command and fail with a [`WorkflowError`] on non-zero exit
pub fn run_git_checked(args: &[&str], cwd: Option<&Path>) -> Result<Output> {
    let output = run_git(args, cwd)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WorkflowError::GitCommand(format!(
            "'git {}': {}",
            args.join(" "),
            stderr.trim()
        ))
        .into());
    }
    Ok(output)
}

fn stdout_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Current branch name, None when HEAD cannot be resolved
pub fn get_current_branch(repo_path: &Path) -> Option<String> {
    let output = run_git(&["rev-parse", "--abbrev-ref", "HEAD"], Some(repo_path)).ok()?;
    if output.status.success() {
        let branch = stdout_string(&output);
        (!branch.is_empty()).then_some(branch)
    } else {
        None
    }
}

/// Commit subjects on HEAD since `base_branch`
pub fn get_commits_since(repo_path: &Path, base_branch: &str) -> Vec<String> {
    let range = format!("{}..HEAD", base_branch);
    match run_git(&["log", &range, "--pretty=format:%s"], Some(repo_path)) {
        Ok(output) if output.status.success() => stdout_string(&output)
            .lines()
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Latest commit message body (`git log -1 --pretty=%B`)
pub fn last_commit_message(repo_path: &Path) -> Result<String> {
    let output = run_git_checked(&["log", "-1", "--pretty=%B"], Some(repo_path))?;
    Ok(stdout_string(&output))
}

/// Rewrite the latest commit's message
pub fn amend_commit_message(repo_path: &Path, message: &str) -> Result<()> {
    run_git_checked(&["commit", "--amend", "-m", message], Some(repo_path))?;
    Ok(())
}

/// Checkout an existing branch
pub fn checkout(repo_path: &Path, branch: &str) -> Result<()> {
    run_git_checked(&["checkout", branch], Some(repo_path))?;
    Ok(())
}

/// Number of modified files reported by `git status --porcelain`
pub fn count_modified_files(repo_path: &Path) -> usize {
    match run_git(&["status", "--porcelain"], Some(repo_path)) {
        Ok(output) if output.status.success() => stdout_string(&output)
            .lines()
            .filter(|line| !line.is_empty())
            .count(),
        _ => 0,
    }
}

/// Clone a repository, or fetch and fast-forward the root branch of an
/// existing clone
///
/// The clone lands in `<clone_to>/<last path segment of branch_name>` so each
/// branch gets its own working copy, matching the workflow's one-directory-
/// per-branch convention.
pub fn clone_or_update_repo(
    url: &str,
    clone_to: &str,
    root_branch: &str,
    branch_name: &str,
) -> Result<PathBuf> {
    let dir_name = branch_name.rsplit('/').next().unwrap_or(branch_name);
    let base_path = PathBuf::from(clone_to);
    let repo_path = base_path.join(dir_name);

    if repo_path.join(".git").exists() {
        debug!("repository exists at {}, updating", repo_path.display());
        run_git_checked(&["fetch", "origin"], Some(&repo_path))?;
        run_git_checked(&["checkout", root_branch], Some(&repo_path))?;
        run_git_checked(&["pull", "origin", root_branch], Some(&repo_path))?;
    } else if repo_path.exists() {
        return Err(WorkflowError::NotARepository(repo_path.display().to_string()).into());
    } else {
        std::fs::create_dir_all(&base_path)?;
        run_git_checked(&["clone", url, &repo_path.display().to_string()], None)?;
        run_git_checked(&["checkout", root_branch], Some(&repo_path))?;
        run_git_checked(&["pull", "origin", root_branch], Some(&repo_path))?;
    }
    Ok(repo_path)
}

/// Create a branch off `root_branch` (or reuse it) and push it to origin
///
/// Transient network failures are retried with exponential backoff (1s, 2s,
/// 4s), capped by `max_retries`. On the last attempt a `ls-remote` existence
/// check decides whether the branch made it to the remote despite the
/// reported error.
pub fn create_and_push_branch(
    repo_path: &Path,
    branch_name: &str,
    root_branch: &str,
    max_retries: u32,
) -> Result<()> {
    let verify = run_git(&["rev-parse", "--verify", branch_name], Some(repo_path))?;
    if verify.status.success() {
        debug!("branch {} already exists locally", branch_name);
        run_git_checked(&["checkout", branch_name], Some(repo_path))?;
    } else {
        run_git_checked(&["checkout", root_branch], Some(repo_path))?;
        run_git_checked(&["checkout", "-b", branch_name], Some(repo_path))?;
    }

    for attempt in 1..=max_retries {
        let push = run_git(&["push", "-u", "origin", branch_name], Some(repo_path))?;
        if push.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&push.stderr).to_lowercase();
        let stdout = String::from_utf8_lossy(&push.stdout).to_lowercase();
        let combined = format!("{}{}", stderr, stdout);

        // Known success conditions reported as failures
        if combined.contains("already exists")
            || combined.contains("up-to-date")
            || (combined.contains("rejected") && combined.contains("fast-forward"))
        {
            return Ok(());
        }

        let is_transient = TRANSIENT_PUSH_ERRORS.iter().any(|e| stderr.contains(e));
        if is_transient && attempt < max_retries {
            let wait = Duration::from_secs(1 << (attempt - 1));
            debug!(
                "transient push error on attempt {}/{}, retrying in {:?}",
                attempt, max_retries, wait
            );
            std::thread::sleep(wait);
            continue;
        }

        if attempt == max_retries {
            let verify_remote = run_git(
                &["ls-remote", "--heads", "origin", branch_name],
                Some(repo_path),
            )?;
            if verify_remote.status.success() && !stdout_string(&verify_remote).is_empty() {
                debug!("branch exists on remote (verified via ls-remote)");
                return Ok(());
            }
        }
    }

    Err(WorkflowError::PushFailed(branch_name.to_string()).into())
}

/// Push the current branch to origin
pub fn push_latest_changes(repo_path: &Path, branch_name: &str) -> Result<()> {
    run_git_checked(&["push", "origin", branch_name], Some(repo_path))?;
    Ok(())
}

/// Checkout and fast-forward the root branch
pub fn update_root_branch(repo_path: &Path, root_branch: &str) -> Result<()> {
    run_git_checked(&["checkout", root_branch], Some(repo_path))?;
    run_git_checked(&["pull", "origin", root_branch], Some(repo_path))?;
    Ok(())
}

/// Delete a local branch; false when git refuses (unmerged changes)
pub fn delete_local_branch(repo_path: &Path, branch: &str) -> bool {
    run_git(&["branch", "-d", branch], Some(repo_path))
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Delete a remote branch; false on failure
pub fn delete_remote_branch(repo_path: &Path, branch: &str) -> bool {
    run_git(&["push", "origin", "--delete", branch], Some(repo_path))
        .map(|o| o.status.success())
        .unwrap_or(false)
}

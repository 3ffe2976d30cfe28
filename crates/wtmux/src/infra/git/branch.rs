use std::path::PathBuf;

use super::repo::{command_output_detail, run_git_command, run_git_command_output};

const FALLBACK_DEFAULT_BRANCHES: [&str; 2] = ["main", "master"];

/// Resolves the branch new worktrees should start from by default.
///
/// Prefers `origin/HEAD`, then `main`/`master`, then whatever is checked out
/// in `repo_root`.
///
/// # Errors
/// Returns an error when none of the strategies yields a branch name.
pub async fn default_branch(repo_root: PathBuf) -> Result<String, String> {
    if let Ok(remote_head) = run_git_command(
        repo_root.clone(),
        vec![
            "symbolic-ref".to_string(),
            "--short".to_string(),
            "refs/remotes/origin/HEAD".to_string(),
        ],
        "Git symbolic-ref failed".to_string(),
    )
    .await
    {
        let remote_head = remote_head.trim();
        let branch = remote_head.strip_prefix("origin/").unwrap_or(remote_head);
        if !branch.is_empty() {
            return Ok(branch.to_string());
        }
    }

    for candidate in FALLBACK_DEFAULT_BRANCHES {
        if branch_exists(repo_root.clone(), candidate.to_string()).await? {
            return Ok(candidate.to_string());
        }
    }

    let current = current_branch(repo_root).await?;
    if current.is_empty() {
        return Err("Unable to determine default branch".to_string());
    }

    Ok(current)
}

/// Lists local branch names in `refname` order.
///
/// # Errors
/// Returns an error if `git for-each-ref` fails.
pub async fn branches(repo_root: PathBuf) -> Result<Vec<String>, String> {
    let stdout = run_git_command(
        repo_root,
        vec![
            "for-each-ref".to_string(),
            "--format=%(refname:short)".to_string(),
            "refs/heads".to_string(),
        ],
        "Git for-each-ref failed".to_string(),
    )
    .await?;

    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Returns whether a local branch named `branch_name` exists.
///
/// # Errors
/// Returns an error if git cannot be executed or fails for a reason other
/// than the ref being missing.
pub async fn branch_exists(repo_root: PathBuf, branch_name: String) -> Result<bool, String> {
    let output = run_git_command_output(
        repo_root,
        vec![
            "show-ref".to_string(),
            "--verify".to_string(),
            "--quiet".to_string(),
            format!("refs/heads/{branch_name}"),
        ],
    )
    .await?;

    match output.status.code() {
        Some(0) => Ok(true),
        Some(1) => Ok(false),
        _ => Err(format!(
            "Git show-ref failed: {}",
            command_output_detail(&output.stdout, &output.stderr)
        )),
    }
}

/// Returns the branch checked out at `path`, or an empty string for a
/// detached `HEAD`.
///
/// # Errors
/// Returns an error if `path` is not a git checkout.
pub async fn current_branch(path: PathBuf) -> Result<String, String> {
    let stdout = run_git_command(
        path,
        vec![
            "rev-parse".to_string(),
            "--abbrev-ref".to_string(),
            "HEAD".to_string(),
        ],
        "Git rev-parse --abbrev-ref failed".to_string(),
    )
    .await?;

    Ok(normalize_branch_output(&stdout))
}

/// Maps `rev-parse --abbrev-ref HEAD` output to a branch name, treating the
/// literal `HEAD` (detached) as no branch.
fn normalize_branch_output(stdout: &str) -> String {
    let branch = stdout.trim();
    if branch == "HEAD" {
        return String::new();
    }

    branch.to_string()
}

/// Orders `branches` so `default_branch` comes first, keeping the rest in
/// their original order.
pub fn order_with_default_first(mut branches: Vec<String>, default_branch: &str) -> Vec<String> {
    if let Some(position) = branches.iter().position(|branch| branch == default_branch) {
        let default = branches.remove(position);
        branches.insert(0, default);
    }

    branches
}

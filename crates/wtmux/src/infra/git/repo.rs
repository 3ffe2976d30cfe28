//! Git process plumbing shared by the adapter, plus repository root lookup.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tokio::task::spawn_blocking;

/// Resolves the primary repository root for a repository or any of its
/// linked worktrees.
///
/// All worktrees share one common git directory; its parent is the primary
/// checkout, or the directory itself for a bare repository.
///
/// # Errors
/// Returns an error if `dir` is not inside a git repository.
pub async fn main_repo_root(dir: PathBuf) -> Result<PathBuf, String> {
    let stdout = run_git_command(
        dir.clone(),
        vec!["rev-parse".to_string(), "--git-common-dir".to_string()],
        "Git rev-parse --git-common-dir failed".to_string(),
    )
    .await?;
    let common_dir = stdout.trim();
    if common_dir.is_empty() {
        return Err("Git rev-parse --git-common-dir returned empty output".to_string());
    }

    let common_dir = if Path::new(common_dir).is_absolute() {
        PathBuf::from(common_dir)
    } else {
        dir.join(common_dir)
    };
    let common_dir = tokio::fs::canonicalize(&common_dir)
        .await
        .unwrap_or(common_dir);

    Ok(root_of_common_dir(common_dir))
}

/// Returns the top-level directory of the checkout containing `dir`.
///
/// # Errors
/// Returns an error if `dir` is not inside a git checkout.
pub async fn worktree_root(dir: PathBuf) -> Result<PathBuf, String> {
    let stdout = run_git_command(
        dir,
        vec!["rev-parse".to_string(), "--show-toplevel".to_string()],
        "Git rev-parse --show-toplevel failed".to_string(),
    )
    .await?;
    let root = stdout.trim();
    if root.is_empty() {
        return Err("Git rev-parse --show-toplevel returned empty output".to_string());
    }

    Ok(PathBuf::from(root))
}

/// Runs `git <args>` in `dir` and returns stdout, failing with
/// `error_context` plus git's own message on a non-zero exit.
///
/// # Errors
/// Returns an error if git cannot be spawned or exits unsuccessfully.
pub(super) async fn run_git_command(
    dir: PathBuf,
    args: Vec<String>,
    error_context: String,
) -> Result<String, String> {
    let output = run_git_command_output(dir, args).await?;
    if !output.status.success() {
        let detail = command_output_detail(&output.stdout, &output.stderr);

        return Err(format!("{error_context}: {detail}"));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Runs `git <args>` in `dir` on the blocking pool and returns the raw
/// output; the caller interprets the exit status.
///
/// # Errors
/// Returns an error if git cannot be spawned or the blocking task cannot be
/// joined.
pub(super) async fn run_git_command_output(
    dir: PathBuf,
    args: Vec<String>,
) -> Result<Output, String> {
    spawn_blocking(move || {
        Command::new("git")
            .args(&args)
            .current_dir(&dir)
            .output()
            .map_err(|error| format!("Failed to run `git {}`: {error}", args.join(" ")))
    })
    .await
    .map_err(|error| format!("Join error: {error}"))?
}

/// Picks the most useful message from a failed command: trimmed stderr,
/// then trimmed stdout.
pub(crate) fn command_output_detail(stdout: &[u8], stderr: &[u8]) -> String {
    [stderr, stdout]
        .into_iter()
        .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| "Unknown error".to_string())
}

fn root_of_common_dir(common_dir: PathBuf) -> PathBuf {
    if common_dir.file_name().is_some_and(|name| name == ".git")
        && let Some(root) = common_dir.parent()
    {
        return root.to_path_buf();
    }

    common_dir
}

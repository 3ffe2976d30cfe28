use std::path::PathBuf;

use super::repo::run_git_command;
use crate::domain::worktree::{CommitSummary, StatusSummary};

/// Counts staged, modified, and untracked entries in the checkout at `path`.
///
/// # Errors
/// Returns an error if `git status` fails.
pub async fn status(path: PathBuf) -> Result<StatusSummary, String> {
    let stdout = run_git_command(
        path,
        vec!["status".to_string(), "--porcelain=v1".to_string()],
        "Git status failed".to_string(),
    )
    .await?;

    Ok(parse_status_porcelain(&stdout))
}

/// Reads ahead/behind commit counts against the upstream of `path`.
///
/// # Errors
/// Returns an error when upstream tracking information is unavailable.
pub async fn ahead_behind(path: PathBuf) -> Result<(u32, u32), String> {
    let rev_list_output = run_git_command(
        path,
        vec![
            "rev-list".to_string(),
            "--left-right".to_string(),
            "--count".to_string(),
            "HEAD...@{u}".to_string(),
        ],
        "Git rev-list failed".to_string(),
    )
    .await?;

    parse_ahead_behind(&rev_list_output)
}

/// Returns the latest `count` commits reachable from `HEAD` at `path`.
///
/// # Errors
/// Returns an error if `git log` fails, for example on an unborn branch.
pub async fn log(path: PathBuf, count: usize) -> Result<Vec<CommitSummary>, String> {
    let stdout = run_git_command(
        path,
        vec![
            "log".to_string(),
            "-n".to_string(),
            count.to_string(),
            "--format=%h%x09%s".to_string(),
        ],
        "Git log failed".to_string(),
    )
    .await?;

    Ok(parse_log(&stdout))
}

/// Parses `git status --porcelain=v1`.
///
/// The index column counts as staged, the worktree column as modified, and
/// `??` entries as untracked.
pub(crate) fn parse_status_porcelain(output: &str) -> StatusSummary {
    let mut summary = StatusSummary::default();

    for line in output.lines() {
        let mut columns = line.chars();
        let (Some(index), Some(worktree)) = (columns.next(), columns.next()) else {
            continue;
        };

        if index == '?' && worktree == '?' {
            summary.untracked += 1;

            continue;
        }
        if index != ' ' {
            summary.staged += 1;
        }
        if worktree != ' ' {
            summary.modified += 1;
        }
    }

    summary
}

fn parse_ahead_behind(output: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = output.split_whitespace().collect();
    if let [ahead, behind, ..] = parts.as_slice() {
        let ahead = ahead.parse().unwrap_or(0);
        let behind = behind.parse().unwrap_or(0);

        return Ok((ahead, behind));
    }

    Err("Unexpected output format from git rev-list".to_string())
}

fn parse_log(output: &str) -> Vec<CommitSummary> {
    output
        .lines()
        .filter_map(|line| {
            let (hash, message) = line.split_once('\t')?;

            Some(CommitSummary {
                hash: hash.to_string(),
                message: message.to_string(),
            })
        })
        .collect()
}

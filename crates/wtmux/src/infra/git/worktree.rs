use std::path::{Path, PathBuf};

use super::repo::run_git_command;
use crate::domain::repository::path_basename;
use crate::domain::worktree::WorkingTree;

/// Lists every non-bare worktree registered in the repository at `repo_root`.
///
/// # Errors
/// Returns an error if `git worktree list --porcelain` fails.
pub async fn worktree_list(repo_root: PathBuf) -> Result<Vec<WorkingTree>, String> {
    let stdout = run_git_command(
        repo_root,
        vec![
            "worktree".to_string(),
            "list".to_string(),
            "--porcelain".to_string(),
        ],
        "Git worktree list failed".to_string(),
    )
    .await?;

    Ok(parse_worktree_porcelain(&stdout))
}

/// Creates a worktree at `worktree_path`.
///
/// When `base_branch` is `Some`, a new branch `branch_name` is created from it
/// (`git worktree add -b`). Otherwise the existing `branch_name` is checked
/// out.
///
/// # Errors
/// Returns an error if invoking `git` fails or the worktree command exits with
/// a non-zero status.
pub async fn worktree_add(
    repo_root: PathBuf,
    worktree_path: PathBuf,
    branch_name: String,
    base_branch: Option<String>,
) -> Result<(), String> {
    let worktree_path = worktree_path.to_string_lossy().into_owned();
    let mut args = vec!["worktree".to_string(), "add".to_string()];
    match base_branch {
        Some(base_branch) => {
            args.extend(["-b".to_string(), branch_name, worktree_path, base_branch]);
        }
        None => {
            args.extend([worktree_path, branch_name]);
        }
    }

    run_git_command(repo_root, args, "Git worktree add failed".to_string()).await?;

    Ok(())
}

/// Removes the worktree at `worktree_path`, with `--force` when requested.
///
/// # Errors
/// Returns an error if the path is not a registered worktree or git refuses
/// to remove it.
pub async fn worktree_remove(
    repo_root: PathBuf,
    worktree_path: PathBuf,
    force: bool,
) -> Result<(), String> {
    let mut args = vec!["worktree".to_string(), "remove".to_string()];
    if force {
        args.push("--force".to_string());
    }
    args.push(worktree_path.to_string_lossy().into_owned());

    run_git_command(repo_root, args, "Git worktree remove failed".to_string()).await?;

    Ok(())
}

/// Parses `git worktree list --porcelain` output.
///
/// Bare entries are skipped; detached entries get `branch: None`.
pub(crate) fn parse_worktree_porcelain(output: &str) -> Vec<WorkingTree> {
    let mut worktrees = Vec::new();
    let mut current_path: Option<PathBuf> = None;
    let mut current_branch: Option<String> = None;
    let mut is_bare = false;

    for line in output.lines().chain(std::iter::once("")) {
        let line = line.trim_end();
        if line.is_empty() {
            if let Some(path) = current_path.take()
                && !is_bare
            {
                worktrees.push(working_tree(path, current_branch.take()));
            }
            current_branch = None;
            is_bare = false;

            continue;
        }

        if let Some(path) = line.strip_prefix("worktree ") {
            current_path = Some(PathBuf::from(path));
        } else if let Some(branch_ref) = line.strip_prefix("branch ") {
            let branch = branch_ref.strip_prefix("refs/heads/").unwrap_or(branch_ref);
            current_branch = Some(branch.to_string());
        } else if line == "bare" {
            is_bare = true;
        }
    }

    worktrees
}

fn working_tree(path: PathBuf, branch: Option<String>) -> WorkingTree {
    WorkingTree {
        branch,
        name: path_basename(Path::new(&path)),
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_worktree_porcelain_reads_branches_and_detached() {
        // Arrange
        let output = "worktree /src/app\nHEAD 1111111\nbranch refs/heads/main\n\n\
                      worktree /src/app-feature\nHEAD 2222222\nbranch refs/heads/feature/login\n\n\
                      worktree /src/app-probe\nHEAD 3333333\ndetached\n";

        // Act
        let worktrees = parse_worktree_porcelain(output);

        // Assert
        assert_eq!(worktrees.len(), 3);
        assert_eq!(worktrees[0].path, PathBuf::from("/src/app"));
        assert_eq!(worktrees[0].branch.as_deref(), Some("main"));
        assert_eq!(worktrees[1].name, "app-feature");
        assert_eq!(worktrees[1].branch.as_deref(), Some("feature/login"));
        assert_eq!(worktrees[2].branch, None);
    }

    #[test]
    fn test_parse_worktree_porcelain_skips_bare_entries() {
        // Arrange
        let output = concat!(
            "worktree /src/app.git\nbare\n\n",
            "worktree /src/app-main\nHEAD 1\nbranch refs/heads/main\n\n",
        );

        // Act
        let worktrees = parse_worktree_porcelain(output);

        // Assert
        assert_eq!(worktrees.len(), 1);
        assert_eq!(worktrees[0].name, "app-main");
    }

    #[test]
    fn test_parse_worktree_porcelain_handles_empty_output() {
        // Arrange
        let output = "";

        // Act
        let worktrees = parse_worktree_porcelain(output);

        // Assert
        assert!(worktrees.is_empty());
    }
}

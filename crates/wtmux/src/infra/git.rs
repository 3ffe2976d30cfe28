use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

/// Branch listing and resolution.
mod branch;
/// Repository-level helpers and process plumbing.
mod repo;
/// Status, upstream, and history queries.
mod status;
/// Worktree listing and lifecycle.
mod worktree;

pub use branch::{branch_exists, branches, current_branch, default_branch, order_with_default_first};
pub(crate) use repo::command_output_detail;
pub use repo::{main_repo_root, worktree_root};
pub use status::{ahead_behind, log, status};
pub use worktree::{worktree_add, worktree_list, worktree_remove};

use crate::domain::worktree::{CommitSummary, StatusSummary, WorkingTree};

/// Boxed async result used by [`GitClient`] trait methods.
pub type GitFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Async git boundary used by the reconciliation service.
///
/// Production uses [`RealGitClient`], while tests inject `MockGitClient` to
/// script repository state without touching the filesystem.
#[cfg_attr(test, mockall::automock)]
pub trait GitClient: Send + Sync {
    /// Resolves the main repository root that contains `dir`, following
    /// linked worktrees back to the shared repository.
    ///
    /// # Errors
    /// Returns an error when `dir` is not in a git repository.
    fn main_repo_root(&self, dir: PathBuf) -> GitFuture<Result<PathBuf, String>>;

    /// Resolves the top-level directory of the checkout containing `dir`.
    ///
    /// # Errors
    /// Returns an error when `dir` is not in a git checkout.
    fn worktree_root(&self, dir: PathBuf) -> GitFuture<Result<PathBuf, String>>;

    /// Resolves the branch new worktrees start from by default.
    ///
    /// # Errors
    /// Returns an error when no default branch can be determined.
    fn default_branch(&self, repo_root: PathBuf) -> GitFuture<Result<String, String>>;

    /// Lists local branch names.
    ///
    /// # Errors
    /// Returns an error when refs cannot be read.
    fn branches(&self, repo_root: PathBuf) -> GitFuture<Result<Vec<String>, String>>;

    /// Returns whether local branch `branch_name` exists.
    ///
    /// # Errors
    /// Returns an error when git cannot answer.
    fn branch_exists(
        &self,
        repo_root: PathBuf,
        branch_name: String,
    ) -> GitFuture<Result<bool, String>>;

    /// Returns the branch checked out at `path`; empty for a detached `HEAD`.
    ///
    /// # Errors
    /// Returns an error when `path` is not a git checkout.
    fn current_branch(&self, path: PathBuf) -> GitFuture<Result<String, String>>;

    /// Lists the worktrees registered in `repo_root`.
    ///
    /// # Errors
    /// Returns an error when git cannot enumerate worktrees.
    fn worktree_list(&self, repo_root: PathBuf) -> GitFuture<Result<Vec<WorkingTree>, String>>;

    /// Adds a worktree at `worktree_path` for `branch_name`, creating the
    /// branch from `base_branch` when one is given.
    ///
    /// # Errors
    /// Returns an error when git refuses the worktree.
    fn worktree_add(
        &self,
        repo_root: PathBuf,
        worktree_path: PathBuf,
        branch_name: String,
        base_branch: Option<String>,
    ) -> GitFuture<Result<(), String>>;

    /// Removes the worktree at `worktree_path`.
    ///
    /// # Errors
    /// Returns an error when the path is not a registered worktree or git
    /// cannot remove it.
    fn worktree_remove(
        &self,
        repo_root: PathBuf,
        worktree_path: PathBuf,
        force: bool,
    ) -> GitFuture<Result<(), String>>;

    /// Counts local changes at `path`.
    ///
    /// # Errors
    /// Returns an error when status cannot be read.
    fn status(&self, path: PathBuf) -> GitFuture<Result<StatusSummary, String>>;

    /// Reads ahead/behind counts against the upstream of `path`.
    ///
    /// # Errors
    /// Returns an error when no upstream is configured.
    fn ahead_behind(&self, path: PathBuf) -> GitFuture<Result<(u32, u32), String>>;

    /// Returns the latest `count` commits at `path`.
    ///
    /// # Errors
    /// Returns an error when history cannot be read.
    fn log(&self, path: PathBuf, count: usize) -> GitFuture<Result<Vec<CommitSummary>, String>>;
}

/// Production [`GitClient`] implementation backed by the `git` binary.
pub struct RealGitClient;

impl GitClient for RealGitClient {
    fn main_repo_root(&self, dir: PathBuf) -> GitFuture<Result<PathBuf, String>> {
        Box::pin(async move { main_repo_root(dir).await })
    }

    fn worktree_root(&self, dir: PathBuf) -> GitFuture<Result<PathBuf, String>> {
        Box::pin(async move { worktree_root(dir).await })
    }

    fn default_branch(&self, repo_root: PathBuf) -> GitFuture<Result<String, String>> {
        Box::pin(async move { default_branch(repo_root).await })
    }

    fn branches(&self, repo_root: PathBuf) -> GitFuture<Result<Vec<String>, String>> {
        Box::pin(async move { branches(repo_root).await })
    }

    fn branch_exists(
        &self,
        repo_root: PathBuf,
        branch_name: String,
    ) -> GitFuture<Result<bool, String>> {
        Box::pin(async move { branch_exists(repo_root, branch_name).await })
    }

    fn current_branch(&self, path: PathBuf) -> GitFuture<Result<String, String>> {
        Box::pin(async move { current_branch(path).await })
    }

    fn worktree_list(&self, repo_root: PathBuf) -> GitFuture<Result<Vec<WorkingTree>, String>> {
        Box::pin(async move { worktree_list(repo_root).await })
    }

    fn worktree_add(
        &self,
        repo_root: PathBuf,
        worktree_path: PathBuf,
        branch_name: String,
        base_branch: Option<String>,
    ) -> GitFuture<Result<(), String>> {
        Box::pin(
            async move { worktree_add(repo_root, worktree_path, branch_name, base_branch).await },
        )
    }

    fn worktree_remove(
        &self,
        repo_root: PathBuf,
        worktree_path: PathBuf,
        force: bool,
    ) -> GitFuture<Result<(), String>> {
        Box::pin(async move { worktree_remove(repo_root, worktree_path, force).await })
    }

    fn status(&self, path: PathBuf) -> GitFuture<Result<StatusSummary, String>> {
        Box::pin(async move { status(path).await })
    }

    fn ahead_behind(&self, path: PathBuf) -> GitFuture<Result<(u32, u32), String>> {
        Box::pin(async move { ahead_behind(path).await })
    }

    fn log(&self, path: PathBuf, count: usize) -> GitFuture<Result<Vec<CommitSummary>, String>> {
        Box::pin(async move { log(path, count).await })
    }
}

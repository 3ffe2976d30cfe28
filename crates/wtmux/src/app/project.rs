//! Which repositories the dashboard covers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::repository::Repository;
use crate::infra::git::GitClient;

/// Repositories covered by one dashboard instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProjectScope {
    /// Launched outside any repository: every discoverable project.
    Cross(Vec<Repository>),
    /// Launched inside `Repository`.
    Single(Repository),
}

/// Owns the project scope and the checkout the dashboard was launched from.
#[derive(Debug)]
pub struct ProjectManager {
    active_worktree: Option<PathBuf>,
    scope: ProjectScope,
    working_dir: PathBuf,
}

impl ProjectManager {
    pub fn single(
        repository: Repository,
        active_worktree: Option<PathBuf>,
        working_dir: PathBuf,
    ) -> Self {
        Self {
            active_worktree,
            scope: ProjectScope::Single(repository),
            working_dir,
        }
    }

    pub fn cross(repositories: Vec<Repository>, working_dir: PathBuf) -> Self {
        Self {
            active_worktree: None,
            scope: ProjectScope::Cross(repositories),
            working_dir,
        }
    }

    /// Resolves the scope for a launch from `working_dir`.
    ///
    /// Inside a repository the scope is that repository. Elsewhere it is
    /// every candidate root that still resolves to a repository, where
    /// candidates are the configured `extra_roots` followed by recently
    /// visited projects.
    pub async fn discover(
        git_client: Arc<dyn GitClient>,
        working_dir: PathBuf,
        extra_roots: &[PathBuf],
        recent_roots: Vec<PathBuf>,
    ) -> Self {
        if let Ok(root) = git_client.main_repo_root(working_dir.clone()).await {
            let active_worktree = git_client.worktree_root(working_dir.clone()).await.ok();
            info!(repo = %root.display(), "Single-project mode");

            return Self::single(Repository::from_root(root), active_worktree, working_dir);
        }

        let mut repositories: Vec<Repository> = Vec::new();
        for candidate in extra_roots.iter().cloned().chain(recent_roots) {
            match git_client.main_repo_root(candidate.clone()).await {
                Ok(root) => {
                    if !repositories.iter().any(|repository| repository.root == root) {
                        repositories.push(Repository::from_root(root));
                    }
                }
                Err(error) => {
                    debug!(path = %candidate.display(), %error, "Skipping project candidate");
                }
            }
        }
        info!(count = repositories.len(), "Cross-project mode");

        Self::cross(repositories, working_dir)
    }

    pub fn scope(&self) -> &ProjectScope {
        &self.scope
    }

    pub fn is_cross_project(&self) -> bool {
        matches!(self.scope, ProjectScope::Cross(_))
    }

    /// Returns the repository in single-project mode.
    pub fn repository(&self) -> Option<&Repository> {
        match &self.scope {
            ProjectScope::Single(repository) => Some(repository),
            ProjectScope::Cross(_) => None,
        }
    }

    /// Returns every repository the create and adopt pickers offer.
    pub fn repositories(&self) -> Vec<Repository> {
        match &self.scope {
            ProjectScope::Single(repository) => vec![repository.clone()],
            ProjectScope::Cross(repositories) => repositories.clone(),
        }
    }

    /// Returns the root used to exclude the current project from recents.
    pub fn current_root(&self) -> Option<&Path> {
        self.repository().map(|repository| repository.root.as_path())
    }

    /// Returns the checkout the dashboard runs in, which cannot be deleted.
    pub fn active_worktree(&self) -> Option<&Path> {
        self.active_worktree.as_deref()
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Returns a short label for the status bar.
    pub fn label(&self) -> String {
        match &self.scope {
            ProjectScope::Single(repository) => repository.name.clone(),
            ProjectScope::Cross(repositories) => format!("{} projects", repositories.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::git::MockGitClient;

    #[tokio::test]
    async fn test_discover_inside_repository_uses_single_scope() {
        // Arrange
        let mut git_client = MockGitClient::new();
        git_client
            .expect_main_repo_root()
            .returning(|_| Box::pin(async { Ok(PathBuf::from("/src/app")) }));
        git_client
            .expect_worktree_root()
            .returning(|_| Box::pin(async { Ok(PathBuf::from("/src/app-login")) }));

        // Act
        let projects = ProjectManager::discover(
            Arc::new(git_client),
            PathBuf::from("/src/app-login/src"),
            &[],
            Vec::new(),
        )
        .await;

        // Assert
        assert!(!projects.is_cross_project());
        assert_eq!(projects.current_root(), Some(Path::new("/src/app")));
        assert_eq!(projects.active_worktree(), Some(Path::new("/src/app-login")));
    }

    #[tokio::test]
    async fn test_discover_outside_repository_collects_distinct_projects() {
        // Arrange
        let mut git_client = MockGitClient::new();
        git_client.expect_main_repo_root().returning(|dir| {
            Box::pin(async move {
                match dir.to_str() {
                    Some("/src/api" | "/src/api-login") => Ok(PathBuf::from("/src/api")),
                    Some("/src/web") => Ok(PathBuf::from("/src/web")),
                    _ => Err("not a git repository".to_string()),
                }
            })
        });

        // Act
        let projects = ProjectManager::discover(
            Arc::new(git_client),
            PathBuf::from("/home/dev"),
            &[PathBuf::from("/src/web"), PathBuf::from("/gone")],
            vec![PathBuf::from("/src/api-login"), PathBuf::from("/src/api")],
        )
        .await;

        // Assert
        let names: Vec<String> = projects
            .repositories()
            .into_iter()
            .map(|repository| repository.name)
            .collect();
        assert!(projects.is_cross_project());
        assert_eq!(names, vec!["web".to_string(), "api".to_string()]);
        assert_eq!(projects.current_root(), None);
        assert_eq!(projects.label(), "2 projects");
    }
}

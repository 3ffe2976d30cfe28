use std::path::{Path, PathBuf};

/// A git repository the dashboard can list worktrees for.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Repository {
    pub name: String,
    pub root: PathBuf,
}

impl Repository {
    /// Builds a repository whose display name is the basename of `root`.
    pub fn from_root(root: PathBuf) -> Self {
        let name = path_basename(&root);

        Self { name, root }
    }
}

/// Returns the final path component as a string, or the whole path when it
/// has no file name (for example `/`).
pub fn path_basename(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |name| name.to_string_lossy().into_owned(),
    )
}

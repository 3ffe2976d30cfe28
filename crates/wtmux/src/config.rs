//! User configuration loaded from `<config_dir>/wtmux/config.json`.
//!
//! Every field has a default so a partial (or missing) file is valid; CLI
//! flags are layered on top by [`Config::apply_overrides`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "wtmux";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// How canonical session names are derived from a worktree.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SessionNaming {
    /// Directory basename of the worktree path.
    #[default]
    Basename,
    /// Checked-out branch, falling back to the basename.
    Branch,
}

/// Where new worktrees are placed relative to the repository root.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WorktreeLayout {
    /// Next to the repository: `<parent>/<repo>-<name>`.
    #[default]
    Sibling,
    /// Inside the repository: `<root>/.worktrees/<name>`.
    Nested,
}

/// View shown on startup.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingView {
    #[default]
    List,
    Grid,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub commit_count: usize,
    pub enrichment_timeout_ms: u64,
    pub landing_view: LandingView,
    /// Default tracing filter when `WTMUX_LOG` is unset.
    pub log_level: String,
    pub preview_interval_ms: u64,
    pub preview_lines: usize,
    /// Extra repository roots offered in cross-project mode.
    pub projects: Vec<PathBuf>,
    pub recent_limit: usize,
    pub refresh_interval_ms: u64,
    pub session_naming: SessionNaming,
    pub worktree_layout: WorktreeLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commit_count: 3,
            enrichment_timeout_ms: 2_000,
            landing_view: LandingView::List,
            log_level: "info".to_string(),
            preview_interval_ms: 500,
            preview_lines: 40,
            projects: Vec::new(),
            recent_limit: 20,
            refresh_interval_ms: 3_000,
            session_naming: SessionNaming::Basename,
            worktree_layout: WorktreeLayout::Sibling,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub grid: bool,
    pub naming: Option<SessionNaming>,
    pub layout: Option<WorktreeLayout>,
}

impl Config {
    /// Loads the config from `path`, returning defaults when the file does
    /// not exist.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies command-line overrides in place.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if overrides.grid {
            self.landing_view = LandingView::Grid;
        }
        if let Some(naming) = overrides.naming {
            self.session_naming = naming;
        }
        if let Some(layout) = overrides.layout {
            self.worktree_layout = layout;
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }

    pub fn preview_interval(&self) -> Duration {
        Duration::from_millis(self.preview_interval_ms.max(1))
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }
}

/// Returns the wtmux config directory, `~/.config/wtmux` on Linux.
pub fn config_dir() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join(CONFIG_DIR_NAME);
    }

    PathBuf::from(format!(".{CONFIG_DIR_NAME}"))
}

/// Returns the default config file path.
pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("config.json");

        // Act
        let config = Config::load(&path).expect("failed to load config");

        // Assert
        assert_eq!(config, Config::default());
        assert_eq!(config.refresh_interval(), Duration::from_secs(3));
    }

    #[test]
    fn test_load_partial_file_fills_remaining_defaults() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"session_naming": "branch", "worktree_layout": "nested", "recent_limit": 5}"#,
        )
        .expect("failed to write config");

        // Act
        let config = Config::load(&path).expect("failed to load config");

        // Assert
        assert_eq!(config.session_naming, SessionNaming::Branch);
        assert_eq!(config.worktree_layout, WorktreeLayout::Nested);
        assert_eq!(config.recent_limit, 5);
        assert_eq!(config.preview_lines, 40);
        assert_eq!(config.landing_view, LandingView::List);
    }

    #[test]
    fn test_load_malformed_file_returns_parse_error() {
        // Arrange
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").expect("failed to write config");

        // Act
        let result = Config::load(&path);

        // Assert
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_apply_overrides_replaces_only_given_values() {
        // Arrange
        let mut config = Config::default();
        let overrides = ConfigOverrides {
            grid: true,
            naming: Some(SessionNaming::Branch),
            layout: None,
        };

        // Act
        config.apply_overrides(&overrides);

        // Assert
        assert_eq!(config.landing_view, LandingView::Grid);
        assert_eq!(config.session_naming, SessionNaming::Branch);
        assert_eq!(config.worktree_layout, WorktreeLayout::Sibling);
    }
}

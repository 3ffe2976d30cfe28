use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use wtmux::app::App;
use wtmux::app::reconcile::{ReconcileOptions, Reconciler};
use wtmux::config::{self, Config, ConfigOverrides, SessionNaming, WorktreeLayout};
use wtmux::infra::git::RealGitClient;
use wtmux::infra::logging;
use wtmux::infra::recent::RecentJournal;
use wtmux::infra::tmux::RealTmuxClient;
use wtmux::runtime::{self, RuntimeTimers};

/// Terminal dashboard that pairs git worktrees with tmux sessions.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file to load instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Start in the grid view.
    #[arg(long)]
    grid: bool,
    /// How canonical session names are derived.
    #[arg(long, value_enum)]
    naming: Option<SessionNaming>,
    /// Where new worktrees are created.
    #[arg(long, value_enum)]
    layout: Option<WorktreeLayout>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let mut config = Config::load(&config_path).map_err(io::Error::other)?;
    config.apply_overrides(&ConfigOverrides {
        grid: args.grid,
        naming: args.naming,
        layout: args.layout,
    });

    let config_dir = config::config_dir();
    let _log_guard = logging::init(&config_dir, &config.log_level)?;
    info!(config = %config_path.display(), "Starting wtmux");

    let journal = RecentJournal::load(&config_dir, config.recent_limit);
    let reconciler = Reconciler::new(
        Arc::new(RealGitClient),
        Arc::new(RealTmuxClient),
        ReconcileOptions {
            commit_count: config.commit_count,
            enrichment_timeout: config.enrichment_timeout(),
            layout: config.worktree_layout,
            naming: config.session_naming,
        },
    );
    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    let mut app = App::new(&config, reconciler, journal, working_dir).await;

    runtime::run(
        &mut app,
        RuntimeTimers {
            preview_interval: config.preview_interval(),
            refresh_interval: config.refresh_interval(),
        },
    )
    .await
}

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

/// Process plumbing and target helpers.
mod command;
/// Session lifecycle and inspection commands.
mod session;

pub use session::{
    capture_pane, has_session, kill_session, list_sessions, new_session, redirect_session,
    rename_session, running_processes, session_info, switch_client,
};

use crate::domain::session::SessionHandle;

/// Boxed async result used by [`TmuxClient`] trait methods.
pub type TmuxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Async tmux boundary used by the reconciliation service and preview
/// capture.
#[cfg_attr(test, mockall::automock)]
pub trait TmuxClient: Send + Sync {
    /// Returns whether a session named exactly `name` exists.
    fn has_session(&self, name: String) -> TmuxFuture<Result<bool, String>>;

    /// Starts a detached session named `name` rooted at `path`.
    fn new_session(&self, name: String, path: PathBuf) -> TmuxFuture<Result<(), String>>;

    fn kill_session(&self, name: String) -> TmuxFuture<Result<(), String>>;

    /// Points the current tmux client at session `name`.
    fn switch_client(&self, name: String) -> TmuxFuture<Result<(), String>>;

    fn rename_session(&self, old_name: String, new_name: String)
    -> TmuxFuture<Result<(), String>>;

    /// Moves the active pane of session `name` into `path`.
    fn redirect_session(&self, name: String, path: PathBuf) -> TmuxFuture<Result<(), String>>;

    /// Lists live session names.
    ///
    /// # Errors
    /// Fails when no tmux server is running; callers treat that as "no
    /// sessions".
    fn list_sessions(&self) -> TmuxFuture<Result<Vec<String>, String>>;

    fn session_info(&self, name: String) -> TmuxFuture<Result<SessionHandle, String>>;

    /// Captures the last `lines` lines of visible output from session `name`.
    fn capture_pane(&self, name: String, lines: usize) -> TmuxFuture<Result<String, String>>;

    /// Lists the foreground commands running in session `name`.
    fn running_processes(&self, name: String) -> TmuxFuture<Result<Vec<String>, String>>;
}

/// Production [`TmuxClient`] implementation backed by the `tmux` binary.
pub struct RealTmuxClient;

impl TmuxClient for RealTmuxClient {
    fn has_session(&self, name: String) -> TmuxFuture<Result<bool, String>> {
        Box::pin(async move { has_session(name).await })
    }

    fn new_session(&self, name: String, path: PathBuf) -> TmuxFuture<Result<(), String>> {
        Box::pin(async move { new_session(name, path).await })
    }

    fn kill_session(&self, name: String) -> TmuxFuture<Result<(), String>> {
        Box::pin(async move { kill_session(name).await })
    }

    fn switch_client(&self, name: String) -> TmuxFuture<Result<(), String>> {
        Box::pin(async move { switch_client(name).await })
    }

    fn rename_session(
        &self,
        old_name: String,
        new_name: String,
    ) -> TmuxFuture<Result<(), String>> {
        Box::pin(async move { rename_session(old_name, new_name).await })
    }

    fn redirect_session(&self, name: String, path: PathBuf) -> TmuxFuture<Result<(), String>> {
        Box::pin(async move { redirect_session(name, path).await })
    }

    fn list_sessions(&self) -> TmuxFuture<Result<Vec<String>, String>> {
        Box::pin(async move { list_sessions().await })
    }

    fn session_info(&self, name: String) -> TmuxFuture<Result<SessionHandle, String>> {
        Box::pin(async move { session_info(name).await })
    }

    fn capture_pane(&self, name: String, lines: usize) -> TmuxFuture<Result<String, String>> {
        Box::pin(async move { capture_pane(name, lines).await })
    }

    fn running_processes(&self, name: String) -> TmuxFuture<Result<Vec<String>, String>> {
        Box::pin(async move { running_processes(name).await })
    }
}

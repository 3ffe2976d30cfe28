use std::process::{Command, Output};

use tokio::task::spawn_blocking;

use crate::infra::git::command_output_detail;

/// Runs a tmux command on the blocking pool and returns stdout.
///
/// # Errors
/// Returns an error if spawning the command fails, the command exits with a
/// non-zero status, or the blocking task cannot be joined.
pub(super) async fn run_tmux_command(
    args: Vec<String>,
    error_context: String,
) -> Result<String, String> {
    let output = run_tmux_command_output(args).await?;
    if !output.status.success() {
        let detail = command_output_detail(&output.stdout, &output.stderr);

        return Err(format!("{error_context}: {detail}"));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Runs a tmux command on the blocking pool and returns raw process output,
/// leaving exit-status interpretation to the caller.
///
/// # Errors
/// Returns an error if spawning the command fails or the blocking task
/// cannot be joined.
pub(super) async fn run_tmux_command_output(args: Vec<String>) -> Result<Output, String> {
    spawn_blocking(move || {
        Command::new("tmux")
            .args(&args)
            .output()
            .map_err(|error| {
                format!(
                    "Failed to execute tmux{}: {error}",
                    tmux_command_suffix(&args)
                )
            })
    })
    .await
    .map_err(|error| format!("Join error: {error}"))?
}

/// Builds an exact-match session target so `feature` never resolves to
/// `feature-b` through tmux prefix matching.
pub(super) fn session_target(name: &str) -> String {
    format!("={name}")
}

/// Builds an exact-match target for the active pane of a session.
pub(super) fn pane_target(name: &str) -> String {
    format!("={name}:")
}

/// Quotes `value` for a POSIX shell so it survives `send-keys`.
pub(super) fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn tmux_command_suffix(args: &[String]) -> String {
    args.first()
        .map(|subcommand| format!(" {subcommand}"))
        .unwrap_or_default()
}

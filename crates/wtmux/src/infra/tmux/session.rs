use std::path::PathBuf;

use super::command::{
    pane_target, run_tmux_command, run_tmux_command_output, session_target, shell_quote,
};
use crate::domain::session::SessionHandle;

/// Field separator used in every `-F` format string below.
const FIELD_SEPARATOR: char = '\t';

const SESSION_FORMAT: &str =
    "#{session_name}\t#{session_windows}\t#{session_attached}\t#{session_activity}";

/// Interactive shells that are not worth listing as running processes.
const SHELL_NAMES: &[&str] = &["bash", "fish", "nu", "sh", "zsh"];

/// Returns whether a session named exactly `name` exists.
///
/// # Errors
/// Returns an error when tmux cannot be executed.
pub async fn has_session(name: String) -> Result<bool, String> {
    let output = run_tmux_command_output(vec![
        "has-session".to_string(),
        "-t".to_string(),
        session_target(&name),
    ])
    .await?;

    Ok(output.status.success())
}

/// Starts a detached session named `name` rooted at `path`.
///
/// # Errors
/// Returns an error when tmux refuses to create the session.
pub async fn new_session(name: String, path: PathBuf) -> Result<(), String> {
    run_tmux_command(
        vec![
            "new-session".to_string(),
            "-d".to_string(),
            "-s".to_string(),
            name.clone(),
            "-c".to_string(),
            path.to_string_lossy().to_string(),
        ],
        format!("Failed to create tmux session `{name}`"),
    )
    .await?;

    Ok(())
}

/// Kills the session named `name`.
///
/// # Errors
/// Returns an error when the session does not exist or tmux fails.
pub async fn kill_session(name: String) -> Result<(), String> {
    run_tmux_command(
        vec![
            "kill-session".to_string(),
            "-t".to_string(),
            session_target(&name),
        ],
        format!("Failed to kill tmux session `{name}`"),
    )
    .await?;

    Ok(())
}

/// Points the current tmux client at session `name`.
///
/// # Errors
/// Returns an error when there is no client to switch or the session is
/// missing.
pub async fn switch_client(name: String) -> Result<(), String> {
    run_tmux_command(
        vec![
            "switch-client".to_string(),
            "-t".to_string(),
            session_target(&name),
        ],
        format!("Failed to switch to tmux session `{name}`"),
    )
    .await?;

    Ok(())
}

/// Renames session `old_name` to `new_name`.
///
/// # Errors
/// Returns an error when the session is missing or the new name is taken.
pub async fn rename_session(old_name: String, new_name: String) -> Result<(), String> {
    run_tmux_command(
        vec![
            "rename-session".to_string(),
            "-t".to_string(),
            session_target(&old_name),
            new_name.clone(),
        ],
        format!("Failed to rename tmux session `{old_name}` to `{new_name}`"),
    )
    .await?;

    Ok(())
}

/// Changes the working directory of the active pane in session `name` by
/// typing a `cd` command into it.
///
/// # Errors
/// Returns an error when the session is missing.
pub async fn redirect_session(name: String, path: PathBuf) -> Result<(), String> {
    let change_directory = format!("cd {}", shell_quote(&path.to_string_lossy()));

    run_tmux_command(
        vec![
            "send-keys".to_string(),
            "-t".to_string(),
            pane_target(&name),
            change_directory,
            "Enter".to_string(),
        ],
        format!("Failed to redirect tmux session `{name}`"),
    )
    .await?;

    Ok(())
}

/// Lists live session names in tmux order.
///
/// # Errors
/// Returns an error when tmux fails, including when no server is running.
pub async fn list_sessions() -> Result<Vec<String>, String> {
    let stdout = run_tmux_command(
        vec![
            "list-sessions".to_string(),
            "-F".to_string(),
            "#{session_name}".to_string(),
        ],
        "Failed to list tmux sessions".to_string(),
    )
    .await?;

    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Reads window, pane, attachment, and activity details for session `name`.
///
/// # Errors
/// Returns an error when the session is missing or tmux output is malformed.
pub async fn session_info(name: String) -> Result<SessionHandle, String> {
    let stdout = run_tmux_command(
        vec![
            "list-sessions".to_string(),
            "-F".to_string(),
            SESSION_FORMAT.to_string(),
        ],
        "Failed to read tmux session info".to_string(),
    )
    .await?;
    let mut handle = stdout
        .lines()
        .filter_map(parse_session_line)
        .find(|handle| handle.name == name)
        .ok_or_else(|| format!("Tmux session `{name}` not found"))?;

    let panes = run_tmux_command(
        vec![
            "list-panes".to_string(),
            "-s".to_string(),
            "-t".to_string(),
            session_target(&name),
            "-F".to_string(),
            "#{pane_id}".to_string(),
        ],
        format!("Failed to list panes of tmux session `{name}`"),
    )
    .await?;
    handle.pane_count = u32::try_from(panes.lines().filter(|line| !line.is_empty()).count())
        .unwrap_or(u32::MAX);

    Ok(handle)
}

/// Captures the last `lines` lines of the active pane in session `name`.
///
/// # Errors
/// Returns an error when the session is missing.
pub async fn capture_pane(name: String, lines: usize) -> Result<String, String> {
    let stdout = run_tmux_command(
        vec![
            "capture-pane".to_string(),
            "-p".to_string(),
            "-t".to_string(),
            pane_target(&name),
            "-S".to_string(),
            format!("-{lines}"),
        ],
        format!("Failed to capture tmux session `{name}`"),
    )
    .await?;

    Ok(trim_trailing_blank_lines(&stdout))
}

/// Lists distinct non-shell foreground commands across all panes of session
/// `name`.
///
/// # Errors
/// Returns an error when the session is missing.
pub async fn running_processes(name: String) -> Result<Vec<String>, String> {
    let stdout = run_tmux_command(
        vec![
            "list-panes".to_string(),
            "-s".to_string(),
            "-t".to_string(),
            session_target(&name),
            "-F".to_string(),
            "#{pane_current_command}".to_string(),
        ],
        format!("Failed to list processes of tmux session `{name}`"),
    )
    .await?;

    Ok(parse_process_names(&stdout))
}

/// Parses one `SESSION_FORMAT` line. Pane count is filled in separately.
pub(crate) fn parse_session_line(line: &str) -> Option<SessionHandle> {
    let mut fields = line.rsplitn(4, FIELD_SEPARATOR);
    let last_activity = fields.next()?.trim().parse::<i64>().ok()?;
    let attached_clients = fields.next()?.trim().parse::<u32>().ok()?;
    let window_count = fields.next()?.trim().parse::<u32>().ok()?;
    let name = fields.next()?;
    if name.is_empty() {
        return None;
    }

    Some(SessionHandle {
        is_attached: attached_clients > 0,
        last_activity,
        name: name.to_string(),
        pane_count: 0,
        window_count,
    })
}

pub(crate) fn parse_process_names(stdout: &str) -> Vec<String> {
    let mut process_names: Vec<String> = Vec::new();

    for command in stdout.lines().map(str::trim) {
        let command = command.trim_start_matches('-');
        if command.is_empty() || SHELL_NAMES.contains(&command) {
            continue;
        }
        if !process_names.iter().any(|existing| existing == command) {
            process_names.push(command.to_string());
        }
    }

    process_names
}

fn trim_trailing_blank_lines(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |index| index + 1);

    lines[..end].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_line_reads_all_fields() {
        // Arrange
        let line = "feature-a\t3\t1\t1700000000";

        // Act
        let handle = parse_session_line(line).expect("failed to parse session line");

        // Assert
        assert_eq!(handle.name, "feature-a");
        assert_eq!(handle.window_count, 3);
        assert!(handle.is_attached);
        assert_eq!(handle.last_activity, 1_700_000_000);
        assert_eq!(handle.pane_count, 0);
    }

    #[test]
    fn test_parse_session_line_keeps_tabs_inside_name() {
        // Arrange
        let line = "odd\tname\t1\t0\t42";

        // Act
        let handle = parse_session_line(line).expect("failed to parse session line");

        // Assert
        assert_eq!(handle.name, "odd\tname");
        assert!(!handle.is_attached);
    }

    #[test]
    fn test_parse_session_line_rejects_malformed_input() {
        // Arrange
        let lines = ["", "name-only", "name\tx\t0\t1", "\t1\t0\t1"];

        // Act
        let parsed: Vec<Option<SessionHandle>> =
            lines.iter().map(|line| parse_session_line(line)).collect();

        // Assert
        assert!(parsed.iter().all(Option::is_none));
    }

    #[test]
    fn test_parse_process_names_skips_shells_and_duplicates() {
        // Arrange
        let stdout = "zsh\nnvim\n-bash\ncargo\nnvim\n\n";

        // Act
        let process_names = parse_process_names(stdout);

        // Assert
        assert_eq!(process_names, vec!["nvim".to_string(), "cargo".to_string()]);
    }

    #[test]
    fn test_trim_trailing_blank_lines_keeps_inner_blank_lines() {
        // Arrange
        let content = "line one\n\nline three\n   \n\n";

        // Act
        let trimmed = trim_trailing_blank_lines(content);

        // Assert
        assert_eq!(trimmed, "line one\n\nline three");
        assert_eq!(trim_trailing_blank_lines("\n\n"), "");
    }
}

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV_VAR: &str = "WTMUX_LOG";
const LOG_FILE_NAME: &str = "wtmux.log";

/// Installs a file-backed tracing subscriber under `log_dir`.
///
/// The terminal belongs to the TUI, so nothing is written to stdout or
/// stderr. Keep the returned guard alive until exit so buffered lines are
/// flushed.
///
/// # Errors
/// Returns an error when the log directory cannot be created.
pub fn init(log_dir: &Path, default_level: &str) -> io::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // A second init (tests, re-entry) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(log_filter(std::env::var(LOG_ENV_VAR).ok(), default_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init();

    Ok(guard)
}

fn log_filter(env_value: Option<String>, default_level: &str) -> EnvFilter {
    let level = env_value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_level.to_string());

    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_prefers_environment_value() {
        // Arrange
        let env_value = Some("debug".to_string());

        // Act
        let filter = log_filter(env_value, "info");

        // Assert
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_log_filter_ignores_blank_environment_value() {
        // Arrange
        let env_value = Some("  ".to_string());

        // Act
        let filter = log_filter(env_value, "info");

        // Assert
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn test_log_filter_falls_back_to_warn_for_invalid_directive() {
        // Arrange
        let default_level = "wtmux=loud";

        // Act
        let filter = log_filter(None, default_level);

        // Assert
        assert_eq!(filter.to_string(), "warn");
    }
}

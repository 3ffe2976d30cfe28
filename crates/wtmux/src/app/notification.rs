use std::time::{Duration, Instant};

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotificationLevel {
    Error,
    Info,
}

/// Transient message shown in the footer until it expires.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    expires_at: Instant,
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message.into(), Instant::now())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message.into(), Instant::now())
    }

    fn new(level: NotificationLevel, message: String, shown_at: Instant) -> Self {
        Self {
            expires_at: shown_at + NOTIFICATION_TTL,
            level,
            message,
        }
    }

    /// Returns whether the notification should no longer be shown at `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

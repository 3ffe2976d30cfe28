/// Live tmux session metadata, identified by `name`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SessionHandle {
    pub is_attached: bool,
    /// Unix timestamp (seconds) of the last activity tmux recorded.
    pub last_activity: i64,
    pub name: String,
    pub pane_count: u32,
    pub window_count: u32,
}

impl SessionHandle {
    /// Builds a handle that only knows the session name.
    ///
    /// Used when `session_info` fails and the session must still be listed.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

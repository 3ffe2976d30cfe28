//! Infrastructure adapters for git, tmux, on-disk state, and logging.

pub mod git;
pub mod logging;
pub mod recent;
pub mod tmux;

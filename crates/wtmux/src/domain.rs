//! Plain data types shared by reconciliation, navigation, and rendering.

pub mod panel;
pub mod recent;
pub mod repository;
pub mod session;
pub mod worktree;

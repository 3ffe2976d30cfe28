//! Full-screen UI page modules.

pub mod grid;
pub mod grid_detail;
pub mod worktree_list;

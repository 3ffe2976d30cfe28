//! View state shared by the runtime mode handlers and the renderer.

pub mod app_mode;
pub mod palette;
pub mod picker;

//! Reusable bars and overlays.

pub mod branch_picker_overlay;
pub mod choice_overlay;
pub mod command_palette;
pub mod footer_bar;
pub mod help_overlay;
pub mod name_input_overlay;
pub mod notification_toast;
pub mod preview_pane;
pub mod status_bar;

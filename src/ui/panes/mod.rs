//! TUI pane rendering modules
//!
//! Rendering logic for each visible pane, one module per pane:
//!
//! - [`source`]: script display with syntax highlighting and the current line
//! - [`array`]: the tracked array as boxed slots with a highlight
//! - [`vars`]: variables in declaration order with values and type tags
//! - [`log`]: the execution log transcript
//! - [`status`]: status bar with keybindings and run state
//!
//! Every pane renders from snapshot data handed down by the app; none of
//! them reach into the engine. Scrollable panes take a `&mut usize` offset
//! that they clamp against the content, so callers can push it to
//! `usize::MAX` to mean "bottom".

pub mod array;
pub mod log;
pub mod source;
pub mod status;
pub mod vars;

// Re-export render functions for convenience
pub use array::render_array_pane;
pub use log::render_log_pane;
pub use source::render_source_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use vars::render_vars_pane;

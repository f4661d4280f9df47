//! TUI widgets for the SQL playground.
//!
//! Contains reusable UI components.

pub mod editor;
pub mod header;
pub mod help;
pub mod history_list;
pub mod prompt;
pub mod saved_list;
pub mod spinner;
pub mod table;
pub mod tabs;
pub mod toast;
pub mod upload_panel;

//! Shared egui building blocks for the dashboard renderer
//!
//! Theme colors, card and status frames, widget-id helpers and the
//! application shell bar that selects which dashboard to render.

pub mod shell;
pub mod theme;
pub mod widget_utils;

/// Re-export commonly used types
pub use shell::{top_bar, ShellAction, ShellState};
pub use theme::{apply_theme, card_frame, status_message, StatusKind, Theme};
pub use widget_utils::{chart_widget_id, WidgetId};

// Common icon definitions
pub mod icons {
    pub const RELOAD: &str = "⟳";
    pub const DASHBOARD: &str = "📊";
    pub const TABLE: &str = "📋";
    pub const WARNING: &str = "⚠";
    pub const INFO: &str = "ℹ";
    pub const SORT_DESC: &str = "⏷";
    pub const SORT_ASC: &str = "⏶";
    pub const PREV: &str = "◀";
    pub const NEXT: &str = "▶";
}

//! Chart view abstraction - base trait for every rendered chart card

use dash_core::{ChartHandle, ChartKey, TableId};
use egui::Ui;

/// Requests a chart raises while drawing; handled by the owning dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartAction {
    /// Flip the persisted sort direction of a table and re-render
    ToggleSort(TableId),
}

/// Base trait for all chart views (plots, tables, word clouds, carousels).
///
/// Views are built once per render pass from their config and data, live in
/// the dashboard's instance registry, and are destroyed before replacement.
pub trait ChartView: ChartHandle + Send {
    /// Registry key, `"{dashboard_id}-{chart_id}"`
    fn key(&self) -> &ChartKey;

    /// Get the title of this view
    fn title(&self) -> &str;

    /// Draw the chart body
    fn ui(&mut self, ui: &mut Ui, actions: &mut Vec<ChartAction>);

    /// The container size settled after a resize
    fn on_resize(&mut self) {}

    /// Get as any for downcasting
    fn as_any(&self) -> &dyn std::any::Any;
}

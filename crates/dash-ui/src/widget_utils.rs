//! Widget ids derived from chart keys
//!
//! Several dashboards may be on screen at once and each renders many plots,
//! grids and scroll areas; ids are built from the chart key so they stay
//! unique and stable across re-renders.

use dash_core::ChartKey;
use egui::Id;
use std::fmt::Display;

/// Widget ID builder that joins components with `_`
pub struct WidgetId {
    components: Vec<String>,
}

impl WidgetId {
    pub fn new(base: impl Display) -> Self {
        Self {
            components: vec![base.to_string()],
        }
    }

    /// Start from a chart key
    pub fn chart(key: &ChartKey) -> Self {
        Self::new(key)
    }

    pub fn with(mut self, component: impl Display) -> Self {
        self.components.push(component.to_string());
        self
    }

    /// Add an index (useful in loops)
    pub fn index(self, idx: usize) -> Self {
        self.with(format!("idx_{}", idx))
    }

    pub fn build(&self) -> String {
        self.components.join("_")
    }

    pub fn id(&self) -> Id {
        Id::new(self.build())
    }
}

/// Id for one part (plot, table, scroll area) of a chart
pub fn chart_widget_id(key: &ChartKey, part: &str) -> Id {
    WidgetId::chart(key).with(part).id()
}

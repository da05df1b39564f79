//! Core functionality for the dashboard renderer
//!
//! This crate provides the declarative dashboard model consumed from the
//! backend plus the explicit render-time state every dashboard owns.

pub mod model;
pub mod registry;
pub mod state;
pub mod tasks;
pub mod values;

// Re-export commonly used types
pub use model::{
    ChartConfig, ChartData, ChartOptions, ChartType, ChartWidth, ColumnSpec, DashboardConfig,
    DashboardData, DashboardMeta, DashboardPayload, DashboardScope, DatasetSpec, LabelOverride,
    ListConfig, ListDisplay, MetricConfig, MetricFormat, Row, WordCloudData, WordGroup,
};
pub use registry::{ChartHandle, ChartInstanceRegistry};
pub use state::{ChartKey, SortDirection, SortState, SortStore, TableId};
pub use tasks::{Debouncer, Generation, GenerationCounter};
pub use values::NullPatterns;

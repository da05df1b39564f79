//! Rendering engines for declarative dashboards
//!
//! Each chart type maps to one engine through [`dispatcher::dispatch`]. Engines
//! turn a chart config plus its data into a [`ChartView`] that lives in the
//! dashboard's instance registry until the next render pass replaces it.

mod chart_view;
pub mod carousel;
pub mod dashboard;
pub mod dispatcher;
pub mod layout;
pub mod lists;
pub mod metrics;
pub mod plots;
pub mod tables;

pub use carousel::{parse_quote, Carousel, Quote, QuotesView};
pub use chart_view::{ChartAction, ChartView};
pub use dashboard::{Dashboard, RenderOutcome};
pub use dispatcher::{build_view, dispatch, Engine};
pub use plots::heatmap::{HeatmapLayout, HeatmapState, HeatmapView};
pub use plots::standard::{StandardChartView, StandardKind};
pub use plots::timeline::{aggregate_timeline, BucketUnit, Timeline};
pub use plots::word_cloud::{font_size_for_weight, LibraryError, LibraryLoader, WordCloudView};
pub use tables::{sort_rows, TableView};

use std::sync::Arc;

use dash_core::{ChartKey, SortStore};
use dash_data::RendererSettings;

/// Render-pass state handed to the engines while views are built.
///
/// Everything here is owned by one [`Dashboard`]; nothing is process-wide.
pub struct BuildContext<'a> {
    pub dashboard_id: &'a str,
    pub sort_store: &'a mut SortStore,
    pub library: &'a Arc<LibraryLoader>,
    pub runtime: &'a tokio::runtime::Handle,
    pub settings: &'a RendererSettings,
}

impl BuildContext<'_> {
    pub fn chart_key(&self, chart_id: &str) -> ChartKey {
        ChartKey::new(self.dashboard_id, chart_id)
    }
}

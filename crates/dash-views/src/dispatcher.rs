//! Chart type to engine dispatch


use dash_core::{ChartConfig, ChartData, ChartType};

use crate::carousel::{quotes_from_rows, quotes_from_value, QuotesView};
use crate::chart_view::ChartView;
use crate::plots::heatmap::{HeatmapOptions, HeatmapState, HeatmapView};
use crate::plots::standard::{StandardChartView, StandardKind};
use crate::plots::word_cloud::WordCloudView;
use crate::tables::TableView;
use crate::BuildContext;

/// The engine that renders a chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    Carousel,
    Table,
    Heatmap,
    WordCloud,
    Standard(StandardKind),
}

pub fn dispatch(chart_type: ChartType) -> Engine {
    match chart_type {
        ChartType::Quotes => Engine::Carousel,
        ChartType::Table => Engine::Table,
        ChartType::Heatmap => Engine::Heatmap,
        ChartType::WordCloud => Engine::WordCloud,
        ChartType::Bar
        | ChartType::Line
        | ChartType::Pie
        | ChartType::Doughnut
        | ChartType::Scatter
        | ChartType::HorizontalBar
        | ChartType::StackedBar
        | ChartType::StackedBarTimeline
        | ChartType::Area
        | ChartType::None
        | ChartType::Unknown => Engine::Standard(StandardKind::from_chart_type(chart_type)),
    }
}

/// Build the view for one chart.
///
/// Returns `None` when the data does not fit the engine, so the chart is
/// dropped from the grid instead of failing the dashboard.
pub fn build_view(chart: &ChartConfig, data: &ChartData, ctx: &mut BuildContext<'_>) -> Option<Box<dyn ChartView>> {
    let key = ctx.chart_key(&chart.id);
    let engine = dispatch(chart.chart_type);
    tracing::debug!("Chart {} ({}) -> {:?}", key, chart.chart_type.as_str(), engine);

    let view: Box<dyn ChartView> = match engine {
        Engine::Carousel => {
            let text_field = chart.value_field.as_deref().unwrap_or("text");
            let quotes = match data {
                ChartData::Rows(rows) => quotes_from_rows(rows, text_field),
                ChartData::Raw(value) => quotes_from_value(value, text_field),
                ChartData::WordCloud(_) => Vec::new(),
            };
            if quotes.is_empty() {
                return None;
            }
            Box::new(QuotesView::new(key, chart.title.clone(), quotes))
        }
        Engine::Table => {
            let rows = data.rows();
            if rows.is_empty() {
                return None;
            }
            Box::new(TableView::build(key, chart, rows, ctx.sort_store))
        }
        Engine::Heatmap => {
            let points = HeatmapState::points_from_rows(chart, data.rows());
            if points.is_empty() {
                return None;
            }
            let options = HeatmapOptions::from_chart(chart, ctx.settings.heatmap_min_col_width);
            let state = HeatmapState::build(&points, options);
            Box::new(HeatmapView::new(key, chart.title.clone(), state))
        }
        Engine::WordCloud => {
            let cloud = data.word_cloud()?.clone();
            Box::new(WordCloudView::new(
                key,
                chart.title.clone(),
                cloud,
                ctx.library,
                &ctx.settings.word_cloud_library_url,
                ctx.runtime,
            ))
        }
        Engine::Standard(kind) => {
            let view = StandardChartView::new(key, kind, chart, data.rows());
            if view.body().is_empty() {
                return None;
            }
            Box::new(view)
        }
    };

    Some(view)
}

//! Standard charts: bars, lines, areas, pies, scatter
//!
//! Chart data is prepared once when the view is built ([`prepare`]) and the
//! resulting [`ChartBody`] is drawn every frame with egui_plot, or with the
//! painter for pies.

use std::ops::RangeInclusive;

use dash_core::{values, ChartConfig, ChartHandle, ChartKey, ChartType, NullPatterns, Row};
use dash_ui::chart_widget_id;
use egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Corner, Legend, Line, Plot, PlotPoints, Points};

use super::pie::{self, PieSlice};
use super::timeline::{aggregate_timeline, parse_timestamp};
use super::utils::colors::{self, DEFAULT_COLOR};
use crate::chart_view::{ChartAction, ChartView};

const DEFAULT_HEIGHT: f32 = 260.0;
const MIN_AUTO_HEIGHT: f32 = 200.0;
const DEFAULT_POINT_RADIUS: f32 = 3.0;

/// Label of the synthetic item folding the truncated remainder
pub const OTHERS_LABEL: &str = "Others";

/// Chart types handled by the standard engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardKind {
    Bar,
    Line,
    Area,
    Pie,
    Doughnut,
    Scatter,
    HorizontalBar,
    StackedBar,
    StackedBarTimeline,
    /// Declared without a chart
    None,
    /// A tag this renderer does not know; renders nothing
    Unsupported,
}

impl StandardKind {
    pub fn from_chart_type(chart_type: ChartType) -> Self {
        match chart_type {
            ChartType::Bar => StandardKind::Bar,
            ChartType::Line => StandardKind::Line,
            ChartType::Area => StandardKind::Area,
            ChartType::Pie => StandardKind::Pie,
            ChartType::Doughnut => StandardKind::Doughnut,
            ChartType::Scatter => StandardKind::Scatter,
            ChartType::HorizontalBar => StandardKind::HorizontalBar,
            ChartType::StackedBar => StandardKind::StackedBar,
            ChartType::StackedBarTimeline => StandardKind::StackedBarTimeline,
            ChartType::None => StandardKind::None,
            ChartType::Heatmap
            | ChartType::WordCloud
            | ChartType::Table
            | ChartType::Quotes
            | ChartType::Unknown => StandardKind::Unsupported,
        }
    }
}

/// One category with its raw key, display label and value
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryItem {
    pub raw: String,
    pub label: String,
    pub value: f64,
    pub description: Option<String>,
}

/// A named numeric series
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    pub color: Color32,
    pub fill: bool,
}

/// Category labels plus aligned series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesData {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    /// Per-category bar colors for single-series charts; empty means series color
    pub bar_colors: Vec<Color32>,
}

impl SeriesData {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.series.is_empty()
    }
}

/// Prepared chart contents
#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Bars {
        data: SeriesData,
        stacked: bool,
        horizontal: bool,
    },
    Lines {
        data: SeriesData,
        area: bool,
    },
    Pie {
        slices: Vec<PieSlice>,
        cutout: f32,
    },
    Scatter {
        points: Vec<[f64; 2]>,
        color: Color32,
        radius: f32,
        hover_radius: f32,
    },
    Empty,
}

impl ChartBody {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartBody::Bars { data, .. } | ChartBody::Lines { data, .. } => data.is_empty(),
            ChartBody::Pie { slices, .. } => slices.is_empty(),
            ChartBody::Scatter { points, .. } => points.is_empty(),
            ChartBody::Empty => true,
        }
    }
}

/// Field holding the category label: explicit field, else `label`, else `value`
fn label_field<'a>(chart: &'a ChartConfig, rows: &[Row]) -> &'a str {
    if let Some(field) = chart.label_field.as_deref().or(chart.x_field.as_deref()) {
        return field;
    }
    if rows.first().map_or(false, |r| r.contains_key("label")) {
        "label"
    } else {
        "value"
    }
}

/// Field holding the numeric value: explicit field, else `count`, else `value`
fn value_field<'a>(chart: &'a ChartConfig, rows: &[Row], label_field: &str) -> &'a str {
    if let Some(field) = chart.value_field.as_deref().or(chart.y_field.as_deref()) {
        return field;
    }
    if label_field != "count" && rows.first().map_or(false, |r| r.contains_key("count")) {
        "count"
    } else {
        "value"
    }
}

/// Read `(label, value)` items from rows, dropping null labels when `exclude_null` is set
pub fn category_items(chart: &ChartConfig, rows: &[Row], nulls: &NullPatterns) -> Vec<CategoryItem> {
    let label_key = label_field(chart, rows);
    let value_key = value_field(chart, rows, label_key);
    let exclude_null = chart.options.exclude_null();

    let mut excluded = 0;
    let items: Vec<CategoryItem> = rows
        .iter()
        .filter_map(|row| {
            let raw_value = row.get(label_key);
            if exclude_null && nulls.is_null(raw_value) {
                excluded += 1;
                return None;
            }
            let raw = raw_value.map(values::display_text).unwrap_or_default();
            Some(CategoryItem {
                label: chart.label_for(&raw).to_string(),
                description: chart.description_for(&raw).map(str::to_string),
                value: values::number_or_zero(row.get(value_key)),
                raw,
            })
        })
        .collect();

    if excluded > 0 {
        tracing::debug!("Chart {} excluded {} null categories", chart.id, excluded);
    }
    items
}

/// Keep the first `max_items`; with `group_others` the remainder is summed into
/// one trailing item, added only when that sum is positive
pub fn truncate_items(mut items: Vec<CategoryItem>, max_items: Option<usize>, group_others: bool) -> Vec<CategoryItem> {
    let Some(max) = max_items else {
        return items;
    };
    if items.len() <= max {
        return items;
    }

    let rest = items.split_off(max);
    if group_others {
        let others: f64 = rest.iter().map(|i| i.value).sum();
        if others > 0.0 {
            items.push(CategoryItem {
                raw: "others".to_string(),
                label: OTHERS_LABEL.to_string(),
                value: others,
                description: None,
            });
        }
    }
    items
}

fn dataset_color(raw: &str, index: usize) -> Color32 {
    colors::parse_color(raw).unwrap_or_else(|| colors::categorical_color(index))
}

/// One series per configured dataset, categories taken from the label field
pub fn dataset_series(chart: &ChartConfig, rows: &[Row]) -> SeriesData {
    let label_key = label_field(chart, rows);
    let labels = rows
        .iter()
        .map(|row| {
            let raw = row.get(label_key).map(values::display_text).unwrap_or_default();
            chart.label_for(&raw).to_string()
        })
        .collect();

    let series = chart
        .datasets
        .iter()
        .enumerate()
        .map(|(i, ds)| Series {
            label: ds.display_label().to_string(),
            values: rows.iter().map(|row| values::number_or_zero(row.get(&ds.field))).collect(),
            color: dataset_color(&ds.color, i),
            fill: ds.fill,
        })
        .collect();

    SeriesData { labels, series, bar_colors: Vec::new() }
}

/// Calendar-bucketed series for time-based x values
pub fn timeline_series(chart: &ChartConfig, rows: &[Row]) -> Option<SeriesData> {
    let x_field = chart.x_field.as_deref()?;
    if chart.datasets.is_empty() {
        return None;
    }

    let fields: Vec<&str> = chart.datasets.iter().map(|d| d.field.as_str()).collect();
    let timeline = aggregate_timeline(rows, x_field, &fields, chart.options.percentage_mode());
    if timeline.is_empty() {
        return None;
    }

    let series = chart
        .datasets
        .iter()
        .enumerate()
        .map(|(i, ds)| Series {
            label: ds.display_label().to_string(),
            values: timeline.series(i),
            color: dataset_color(&ds.color, i),
            fill: ds.fill,
        })
        .collect();

    Some(SeriesData {
        labels: timeline.labels().into_iter().map(str::to_string).collect(),
        series,
        bar_colors: Vec::new(),
    })
}

/// Whether the chart's x values are timestamps rather than categories
fn has_time_axis(chart: &ChartConfig, rows: &[Row]) -> bool {
    let Some(x_field) = chart.x_field.as_deref() else {
        return false;
    };
    rows.first()
        .and_then(|row| row.get(x_field))
        .and_then(|v| v.as_str())
        .map_or(false, |s| parse_timestamp(s).is_some())
}

fn single_series(chart: &ChartConfig, items: &[CategoryItem]) -> SeriesData {
    let color = chart
        .datasets
        .first()
        .and_then(|d| colors::parse_color(&d.color))
        .unwrap_or(DEFAULT_COLOR);
    let bar_colors = if chart.colors.is_empty() {
        Vec::new()
    } else {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| colors::category_color(&chart.colors, &item.raw, i))
            .collect()
    };

    SeriesData {
        labels: items.iter().map(|i| i.label.clone()).collect(),
        series: vec![Series {
            label: if chart.title.is_empty() { chart.id.clone() } else { chart.title.clone() },
            values: items.iter().map(|i| i.value).collect(),
            color,
            fill: false,
        }],
        bar_colors,
    }
}

fn limited_items(chart: &ChartConfig, rows: &[Row], nulls: &NullPatterns) -> Vec<CategoryItem> {
    truncate_items(
        category_items(chart, rows, nulls),
        chart.options.max_items(),
        chart.options.group_others(),
    )
}

/// Finite `(x, y)` pairs from the x and y fields
pub fn scatter_points(chart: &ChartConfig, rows: &[Row]) -> Vec<[f64; 2]> {
    let x_field = chart.x_field.as_deref().unwrap_or("x");
    let y_field = chart.y_field.as_deref().unwrap_or("y");
    rows.iter()
        .filter_map(|row| {
            let x = row.get(x_field).and_then(values::as_number)?;
            let y = row.get(y_field).and_then(values::as_number)?;
            Some([x, y])
        })
        .collect()
}

/// Build the chart body for a kind from config and rows
pub fn prepare(kind: StandardKind, chart: &ChartConfig, rows: &[Row]) -> ChartBody {
    let nulls = NullPatterns::default();
    let has_datasets = !chart.datasets.is_empty();

    let body = match kind {
        StandardKind::Bar | StandardKind::StackedBar | StandardKind::HorizontalBar => {
            let data = if has_datasets {
                dataset_series(chart, rows)
            } else {
                single_series(chart, &limited_items(chart, rows, &nulls))
            };
            ChartBody::Bars {
                data,
                stacked: kind == StandardKind::StackedBar,
                horizontal: kind == StandardKind::HorizontalBar,
            }
        }
        StandardKind::StackedBarTimeline => match timeline_series(chart, rows) {
            Some(data) => ChartBody::Bars { data, stacked: true, horizontal: false },
            None => ChartBody::Empty,
        },
        StandardKind::Line | StandardKind::Area => {
            let data = if has_datasets && has_time_axis(chart, rows) {
                timeline_series(chart, rows).unwrap_or_default()
            } else if has_datasets {
                dataset_series(chart, rows)
            } else {
                single_series(chart, &limited_items(chart, rows, &nulls))
            };
            ChartBody::Lines { data, area: kind == StandardKind::Area }
        }
        StandardKind::Pie | StandardKind::Doughnut => {
            let default_cutout = if kind == StandardKind::Doughnut { 0.5 } else { 0.0 };
            let slices = limited_items(chart, rows, &nulls)
                .into_iter()
                .enumerate()
                .map(|(i, item)| PieSlice {
                    color: colors::category_color(&chart.colors, &item.raw, i),
                    label: item.label,
                    value: item.value,
                    description: item.description,
                })
                .collect();
            ChartBody::Pie {
                slices,
                cutout: chart.options.cutout().unwrap_or(default_cutout),
            }
        }
        StandardKind::Scatter => {
            let color = chart
                .datasets
                .first()
                .and_then(|d| colors::parse_color(&d.color))
                .unwrap_or(DEFAULT_COLOR);
            let radius = chart
                .options
                .number("point_radius")
                .map_or(DEFAULT_POINT_RADIUS, |r| r as f32);
            ChartBody::Scatter {
                points: scatter_points(chart, rows),
                color,
                radius,
                hover_radius: chart
                    .options
                    .number("point_hover_radius")
                    .map_or(radius + 2.0, |r| r as f32),
            }
        }
        StandardKind::None => ChartBody::Empty,
        StandardKind::Unsupported => {
            tracing::debug!("Chart {} has unsupported type {}", chart.id, chart.chart_type.as_str());
            ChartBody::Empty
        }
    };

    if body.is_empty() {
        ChartBody::Empty
    } else {
        body
    }
}

/// Where the legend goes, `None` when hidden
pub fn legend_corner(position: Option<&str>, series_count: usize) -> Option<Corner> {
    match position.map(|p| p.trim().to_ascii_lowercase()).as_deref() {
        Some("none") | Some("hidden") | Some("false") => None,
        Some("top") | Some("left") | Some("top-left") => Some(Corner::LeftTop),
        Some("bottom") | Some("bottom-left") => Some(Corner::LeftBottom),
        Some("bottom-right") => Some(Corner::RightBottom),
        Some(_) => Some(Corner::RightTop),
        None if series_count > 1 => Some(Corner::RightTop),
        None => None,
    }
}

/// Tick label that only shows whole numbers
pub fn integer_tick_label(value: f64) -> String {
    if (value - value.round()).abs() < 1e-6 {
        format!("{}", value.round() as i64)
    } else {
        String::new()
    }
}

/// Category name at a tick position, empty between categories
pub fn category_tick_label(labels: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Options that only affect drawing
#[derive(Debug, Clone, PartialEq)]
struct PlotStyle {
    height: Option<f32>,
    auto_height: bool,
    legend_position: Option<String>,
    show_percentages: bool,
    percentage_scale: bool,
    integer_scale: bool,
    y_max: Option<f64>,
}

impl PlotStyle {
    fn from_chart(chart: &ChartConfig) -> Self {
        let opts = &chart.options;
        Self {
            height: opts.height(),
            auto_height: opts.auto_height(),
            legend_position: opts.legend_position().map(str::to_string),
            show_percentages: opts.show_percentages(),
            percentage_scale: opts.percentage_scale(),
            integer_scale: opts.integer_scale(),
            y_max: opts.y_max(),
        }
    }

    fn height(&self, ui: &Ui) -> f32 {
        match self.height {
            Some(h) => h,
            None if self.auto_height => ui.available_height().max(MIN_AUTO_HEIGHT),
            None => DEFAULT_HEIGHT,
        }
    }
}

/// A chart drawn by the standard engine
pub struct StandardChartView {
    key: ChartKey,
    title: String,
    kind: StandardKind,
    body: ChartBody,
    style: PlotStyle,
}

impl StandardChartView {
    pub fn new(key: ChartKey, kind: StandardKind, chart: &ChartConfig, rows: &[Row]) -> Self {
        let body = prepare(kind, chart, rows);
        tracing::debug!("Built {:?} chart {}", kind, key);
        Self {
            key,
            title: chart.title.clone(),
            kind,
            body,
            style: PlotStyle::from_chart(chart),
        }
    }

    pub fn kind(&self) -> StandardKind {
        self.kind
    }

    pub fn body(&self) -> &ChartBody {
        &self.body
    }

    fn plot(&self, ui: &Ui, part: &str, series_count: usize) -> Plot {
        let mut plot = Plot::new(chart_widget_id(&self.key, part))
            .height(self.style.height(ui))
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_boxed_zoom(false);
        if let Some(corner) = legend_corner(self.style.legend_position.as_deref(), series_count) {
            plot = plot.legend(Legend::default().position(corner));
        }
        plot
    }

    fn bars_ui(&self, ui: &mut Ui, data: &SeriesData, stacked: bool, horizontal: bool) {
        let mut plot = self.plot(ui, "bars", data.series.len());

        let labels = data.labels.clone();
        let category_axis = move |value: f64, _n: usize, _range: &RangeInclusive<f64>| {
            category_tick_label(&labels, value)
        };

        if horizontal {
            plot = plot.y_axis_formatter(category_axis).include_x(0.0);
            if self.style.percentage_scale {
                plot = plot
                    .include_x(100.0)
                    .x_axis_formatter(|v, _n, _r| if v > 100.0 { String::new() } else { format!("{}%", v) });
            } else if self.style.integer_scale {
                plot = plot.x_axis_formatter(|v, _n, _r| integer_tick_label(v));
            }
        } else {
            plot = plot.x_axis_formatter(category_axis).include_y(0.0);
            if let Some(y_max) = self.style.y_max {
                plot = plot.include_y(y_max);
            }
            if self.style.integer_scale {
                plot = plot.y_axis_formatter(|v, _n, _r| integer_tick_label(v));
            }
        }

        let grouped = !stacked && data.series.len() > 1;
        let slot = if grouped { 0.8 / data.series.len() as f64 } else { 0.7 };
        let cap = if horizontal && self.style.percentage_scale { Some(100.0) } else { None };

        let mut charts: Vec<BarChart> = Vec::with_capacity(data.series.len());
        for (s, series) in data.series.iter().enumerate() {
            let offset = if grouped {
                (s as f64 - (data.series.len() as f64 - 1.0) / 2.0) * slot
            } else {
                0.0
            };
            let bars: Vec<Bar> = series
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let value = cap.map_or(*v, |c| v.min(c));
                    let fill = data.bar_colors.get(i).copied().unwrap_or(series.color);
                    let name = data.labels.get(i).map(String::as_str).unwrap_or_default();
                    Bar::new(i as f64 + offset, value).width(slot).name(name).fill(fill)
                })
                .collect();

            let mut chart = BarChart::new(bars).name(&series.label).color(series.color);
            if horizontal {
                chart = chart.horizontal();
            }
            if stacked {
                let below: Vec<&BarChart> = charts.iter().collect();
                chart = chart.stack_on(&below);
            }
            charts.push(chart);
        }

        plot.show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
    }

    fn lines_ui(&self, ui: &mut Ui, data: &SeriesData, area: bool) {
        let labels = data.labels.clone();
        let mut plot = self
            .plot(ui, "lines", data.series.len())
            .x_axis_formatter(move |v, _n, _r| category_tick_label(&labels, v))
            .include_y(0.0);
        if let Some(y_max) = self.style.y_max {
            plot = plot.include_y(y_max);
        }
        if self.style.integer_scale {
            plot = plot.y_axis_formatter(|v, _n, _r| integer_tick_label(v));
        }

        plot.show(ui, |plot_ui| {
            for series in &data.series {
                let points: PlotPoints = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| [i as f64, *v])
                    .collect();
                let mut line = Line::new(points).name(&series.label).color(series.color).width(2.0_f32);
                if area || series.fill {
                    line = line.fill(0.0_f32);
                }
                plot_ui.line(line);
            }
        });
    }

    fn scatter_ui(&self, ui: &mut Ui, points: &[[f64; 2]], color: Color32, radius: f32, hover_radius: f32) {
        let plot = self.plot(ui, "scatter", 1);
        plot.show(ui, |plot_ui| {
            plot_ui.points(Points::new(points.to_vec()).radius(radius).color(color));

            let Some(pointer) = plot_ui.pointer_coordinate() else {
                return;
            };
            let pointer = plot_ui.screen_from_plot(pointer);
            let nearest = points
                .iter()
                .map(|p| (p, plot_ui.screen_from_plot(egui_plot::PlotPoint::new(p[0], p[1])).distance(pointer)))
                .filter(|(_, d)| *d <= hover_radius * 2.0)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((p, _)) = nearest {
                plot_ui.points(Points::new(vec![*p]).radius(hover_radius).color(color));
            }
        });
    }
}

impl ChartHandle for StandardChartView {
    fn destroy(&mut self) {
        self.body = ChartBody::Empty;
    }
}

impl ChartView for StandardChartView {
    fn key(&self) -> &ChartKey {
        &self.key
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ui: &mut Ui, _actions: &mut Vec<ChartAction>) {
        match &self.body {
            ChartBody::Bars { data, stacked, horizontal } => self.bars_ui(ui, data, *stacked, *horizontal),
            ChartBody::Lines { data, area } => self.lines_ui(ui, data, *area),
            ChartBody::Pie { slices, cutout } => {
                let height = self.style.height(ui);
                pie::pie_ui(ui, slices, *cutout, self.style.show_percentages, height);
            }
            ChartBody::Scatter { points, color, radius, hover_radius } => {
                self.scatter_ui(ui, points, *color, *radius, *hover_radius)
            }
            ChartBody::Empty => {}
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn chart(value: Value) -> ChartConfig {
        serde_json::from_value(value).unwrap()
    }

    fn rows(value: Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    fn item(label: &str, value: f64) -> CategoryItem {
        CategoryItem {
            raw: label.to_string(),
            label: label.to_string(),
            value,
            description: None,
        }
    }

    #[test]
    fn test_category_field_fallbacks() {
        let config = chart(json!({ "id": "langs", "chart_type": "bar" }));
        let data = rows(json!([
            { "value": "rust", "count": 5 },
            { "value": "go", "count": "3" }
        ]));
        let items = category_items(&config, &data, &NullPatterns::default());
        assert_eq!(items, vec![item("rust", 5.0), item("go", 3.0)]);

        let data = rows(json!([{ "label": "a", "value": 2 }]));
        let items = category_items(&config, &data, &NullPatterns::default());
        assert_eq!(items, vec![item("a", 2.0)]);
    }

    #[test]
    fn test_exclude_null_and_label_overrides() {
        let config = chart(json!({
            "id": "models",
            "chart_type": "pie",
            "options": { "exclude_null": true },
            "labels": { "gpt-4o": { "label": "GPT-4o" } }
        }));
        let data = rows(json!([
            { "value": "gpt-4o", "count": 4 },
            { "value": null, "count": 9 },
            { "value": "Unknown", "count": 2 }
        ]));
        let items = category_items(&config, &data, &NullPatterns::default());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "GPT-4o");
        assert_eq!(items[0].raw, "gpt-4o");
    }

    #[test]
    fn test_truncate_groups_positive_remainder() {
        let items = vec![item("a", 5.0), item("b", 3.0), item("c", 2.0), item("d", 1.0)];

        let grouped = truncate_items(items.clone(), Some(2), true);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[2].label, OTHERS_LABEL);
        assert_eq!(grouped[2].value, 3.0);

        let plain = truncate_items(items.clone(), Some(2), false);
        assert_eq!(plain, vec![item("a", 5.0), item("b", 3.0)]);

        let zero_rest = vec![item("a", 5.0), item("b", 0.0)];
        assert_eq!(truncate_items(zero_rest, Some(1), true), vec![item("a", 5.0)]);

        assert_eq!(truncate_items(items.clone(), None, true), items);
    }

    #[test]
    fn test_stacked_bar_builds_one_series_per_dataset() {
        let config = chart(json!({
            "id": "churn",
            "chart_type": "stacked_bar",
            "x_field": "file",
            "datasets": [
                { "field": "added", "label": "Added", "color": "#22c55e" },
                { "field": "removed", "label": "Removed" }
            ]
        }));
        let data = rows(json!([
            { "file": "a.rs", "added": 10, "removed": 2 },
            { "file": "b.rs", "added": 4 }
        ]));

        match prepare(StandardKind::StackedBar, &config, &data) {
            ChartBody::Bars { data, stacked, horizontal } => {
                assert!(stacked);
                assert!(!horizontal);
                assert_eq!(data.labels, vec!["a.rs", "b.rs"]);
                assert_eq!(data.series.len(), 2);
                assert_eq!(data.series[0].values, vec![10.0, 4.0]);
                assert_eq!(data.series[1].values, vec![2.0, 0.0]);
                assert_eq!(data.series[0].color, Color32::from_rgb(0x22, 0xc5, 0x5e));
            }
            other => panic!("expected bars, got {:?}", other),
        }
    }

    #[test]
    fn test_stacked_bar_timeline_uses_percentage_buckets() {
        let config = chart(json!({
            "id": "mix",
            "chart_type": "stacked_bar_timeline",
            "x_field": "date",
            "datasets": [{ "field": "a" }, { "field": "b" }],
            "options": { "percentage_mode": true }
        }));
        let data = rows(json!([
            { "date": "2024-01-01", "a": 1, "b": 3 },
            { "date": "2024-01-03", "a": 2, "b": 2 },
            { "date": "not a date", "a": 50, "b": 50 }
        ]));

        match prepare(StandardKind::StackedBarTimeline, &config, &data) {
            ChartBody::Bars { data, stacked, .. } => {
                assert!(stacked);
                assert_eq!(data.labels, vec!["2024-01-01", "2024-01-03"]);
                for bucket in 0..2 {
                    let total: f64 = data.series.iter().map(|s| s.values[bucket]).sum();
                    assert!((total - 100.0).abs() <= 0.1);
                }
                assert_eq!(data.series[0].values[0], 25.0);
            }
            other => panic!("expected bars, got {:?}", other),
        }
    }

    #[test]
    fn test_line_with_dates_is_bucketed() {
        let config = chart(json!({
            "id": "activity",
            "chart_type": "line",
            "x_field": "ts",
            "datasets": [{ "field": "turns" }]
        }));
        let data = rows(json!([
            { "ts": "2024-01-01 10:15", "turns": 1 },
            { "ts": "2024-01-01 10:45", "turns": 2 },
            { "ts": "2024-01-01 12:00", "turns": 4 }
        ]));

        match prepare(StandardKind::Line, &config, &data) {
            ChartBody::Lines { data, area } => {
                assert!(!area);
                assert_eq!(data.labels, vec!["2024-01-01 10:00", "2024-01-01 12:00"]);
                assert_eq!(data.series[0].values, vec![3.0, 4.0]);
            }
            other => panic!("expected lines, got {:?}", other),
        }
    }

    #[test]
    fn test_scatter_keeps_finite_pairs() {
        let config = chart(json!({
            "id": "loc",
            "chart_type": "scatter",
            "x_field": "size",
            "y_field": "changes",
            "options": { "point_radius": 5 }
        }));
        let data = rows(json!([
            { "size": 10, "changes": 2 },
            { "size": "12", "changes": "x" },
            { "size": null, "changes": 1 },
            { "size": "7.5", "changes": 3 }
        ]));

        match prepare(StandardKind::Scatter, &config, &data) {
            ChartBody::Scatter { points, radius, hover_radius, .. } => {
                assert_eq!(points, vec![[10.0, 2.0], [7.5, 3.0]]);
                assert_eq!(radius, 5.0);
                assert_eq!(hover_radius, 7.0);
            }
            other => panic!("expected scatter, got {:?}", other),
        }
    }

    #[test]
    fn test_doughnut_cutout_and_colors() {
        let config = chart(json!({
            "id": "tools",
            "chart_type": "doughnut",
            "colors": { "edit": "#ff0000" },
            "options": { "max_items": 1, "group_others": true }
        }));
        let data = rows(json!([
            { "value": "edit", "count": 4 },
            { "value": "read", "count": 2 },
            { "value": "bash", "count": 1 }
        ]));

        match prepare(StandardKind::Doughnut, &config, &data) {
            ChartBody::Pie { slices, cutout } => {
                assert_eq!(cutout, 0.5);
                assert_eq!(slices.len(), 2);
                assert_eq!(slices[0].color, Color32::from_rgb(255, 0, 0));
                assert_eq!(slices[1].label, OTHERS_LABEL);
                assert_eq!(slices[1].value, 3.0);
            }
            other => panic!("expected pie, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_and_missing_fields_render_nothing() {
        let config = chart(json!({ "id": "x", "chart_type": "radar" }));
        let data = rows(json!([{ "value": "a", "count": 1 }]));
        assert_eq!(StandardKind::from_chart_type(config.chart_type), StandardKind::Unsupported);
        assert_eq!(prepare(StandardKind::Unsupported, &config, &data), ChartBody::Empty);

        let timeline = chart(json!({ "id": "t", "chart_type": "stacked_bar_timeline" }));
        assert_eq!(prepare(StandardKind::StackedBarTimeline, &timeline, &data), ChartBody::Empty);
    }

    #[test]
    fn test_tick_labels() {
        assert_eq!(integer_tick_label(3.0), "3");
        assert_eq!(integer_tick_label(2.5), "");
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_tick_label(&labels, 1.0), "b");
        assert_eq!(category_tick_label(&labels, 0.5), "");
        assert_eq!(category_tick_label(&labels, 4.0), "");
        assert_eq!(category_tick_label(&labels, -1.0), "");
    }

    #[test]
    fn test_legend_corner() {
        assert_eq!(legend_corner(None, 1), None);
        assert_eq!(legend_corner(None, 2), Some(Corner::RightTop));
        assert_eq!(legend_corner(Some("bottom"), 1), Some(Corner::LeftBottom));
        assert_eq!(legend_corner(Some("none"), 3), None);
    }
}

//! Heatmap for sparse (x, y, value) points
//!
//! The grid keeps only the most recent columns that fit the container width,
//! paints cells with a log-scaled alpha of one base color, and resolves hover
//! positions back to cells for the tooltip.

use ahash::AHashMap;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use dash_core::{values, ChartConfig, ChartHandle, ChartKey, Row};
use egui::{pos2, vec2, Align2, Color32, Pos2, Rect, Sense, Stroke, TextStyle, Ui, Vec2};
use indexmap::IndexSet;

use super::utils::colors::{self, DEFAULT_COLOR};
use crate::chart_view::{ChartAction, ChartView};

/// Height of the x-axis label strip under the grid
const X_LABEL_HEIGHT: f32 = 18.0;
/// Gutter for short numeric y labels such as hour of day
const NUMERIC_GUTTER: f32 = 32.0;
const MIN_CATEGORY_GUTTER: f32 = 60.0;
const MAX_CATEGORY_GUTTER: f32 = 160.0;

/// Display options read from the chart's `options`
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapOptions {
    pub min_alpha: f32,
    pub max_alpha: f32,
    pub color: Color32,
    pub row_height: f32,
    pub value_suffix: String,
    pub min_col_width: f32,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            min_alpha: 0.10,
            max_alpha: 0.90,
            color: DEFAULT_COLOR,
            row_height: 18.0,
            value_suffix: String::new(),
            min_col_width: 14.0,
        }
    }
}

impl HeatmapOptions {
    pub fn from_chart(chart: &ChartConfig, min_col_width: f32) -> Self {
        let defaults = Self::default();
        let opts = &chart.options;

        let min_alpha = opts.number("min_alpha").map_or(defaults.min_alpha, |a| a as f32).clamp(0.0, 1.0);
        let max_alpha = opts.number("max_alpha").map_or(defaults.max_alpha, |a| a as f32).clamp(min_alpha, 1.0);

        Self {
            min_alpha,
            max_alpha,
            color: opts.text("color").and_then(colors::parse_color).unwrap_or(defaults.color),
            row_height: opts
                .number("row_height")
                .filter(|h| *h > 0.0)
                .map_or(defaults.row_height, |h| h as f32),
            value_suffix: opts.text("value_suffix").unwrap_or_default().to_string(),
            min_col_width: opts
                .number("min_col_width")
                .filter(|w| *w > 0.0)
                .map_or(min_col_width, |w| w as f32),
        }
    }
}

/// One sparse input point
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapPoint {
    pub x: String,
    pub y: String,
    pub value: f64,
}

impl HeatmapPoint {
    pub fn new(x: impl Into<String>, y: impl Into<String>, value: f64) -> Self {
        Self { x: x.into(), y: y.into(), value }
    }
}

/// Key of a cell in the sparse value map
pub fn cell_key(x: &str, y: &str) -> String {
    format!("{}||{}", x, y)
}

/// Ordered labels and the sparse value map for one heatmap
#[derive(Debug, Clone)]
pub struct HeatmapState {
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    pub value_map: AHashMap<String, f64>,
    pub options: HeatmapOptions,
    /// Every y label is all digits
    pub all_numeric: bool,
    /// Every x label is a `YYYY-M-D` date
    pub is_date_axis: bool,
    pub max_value: f64,
}

impl HeatmapState {
    /// Read points from rows using the chart's x/y/value fields
    pub fn points_from_rows(chart: &ChartConfig, rows: &[Row]) -> Vec<HeatmapPoint> {
        let x_field = chart.x_field.as_deref().unwrap_or("x");
        let y_field = chart.y_field.as_deref().unwrap_or("y");
        let value_field = chart.value_field.as_deref().unwrap_or("value");

        rows.iter()
            .filter_map(|row| {
                let x = row.get(x_field).map(values::display_text)?;
                let y = row.get(y_field).map(values::display_text)?;
                if x.is_empty() || y.is_empty() {
                    return None;
                }
                Some(HeatmapPoint {
                    x,
                    y,
                    value: values::number_or_zero(row.get(value_field)),
                })
            })
            .collect()
    }

    pub fn build(points: &[HeatmapPoint], options: HeatmapOptions) -> Self {
        let mut value_map = AHashMap::with_capacity(points.len());
        let mut x_set: IndexSet<&str> = IndexSet::new();
        let mut y_set: IndexSet<&str> = IndexSet::new();

        for point in points {
            x_set.insert(&point.x);
            y_set.insert(&point.y);
            *value_map.entry(cell_key(&point.x, &point.y)).or_insert(0.0) += point.value;
        }

        let mut x_labels: Vec<String> = x_set.into_iter().map(str::to_string).collect();
        let mut y_labels: Vec<String> = y_set.into_iter().map(str::to_string).collect();

        let is_date_axis = !x_labels.is_empty() && x_labels.iter().all(|l| parse_date_label(l).is_some());
        let all_numeric = !y_labels.is_empty() && y_labels.iter().all(|l| is_all_digits(l));

        sort_x_labels(&mut x_labels);
        sort_y_labels(&mut y_labels);

        let max_value = value_map.values().copied().fold(0.0_f64, f64::max);

        Self {
            x_labels,
            y_labels,
            value_map,
            options,
            all_numeric,
            is_date_axis,
            max_value,
        }
    }

    /// Value of a cell, 0 when absent
    pub fn value(&self, x: &str, y: &str) -> f64 {
        self.value_map.get(&cell_key(x, y)).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.x_labels.is_empty() || self.y_labels.is_empty()
    }

    /// Date columns spaced in whole weeks represent week buckets
    pub fn is_weekly(&self) -> bool {
        if !self.is_date_axis || self.x_labels.len() < 2 {
            return false;
        }
        let dates: Vec<NaiveDate> = self.x_labels.iter().filter_map(|l| parse_date_label(l)).collect();
        dates.windows(2).all(|w| {
            let gap = (w[1] - w[0]).num_days();
            gap > 0 && gap % 7 == 0
        })
    }

    /// Tooltip text for a cell
    pub fn tooltip(&self, x: &str, y: &str) -> String {
        let value = self.value(x, y);
        let value = format!("{}{}", values::format_number(value, 2), self.options.value_suffix);

        let x_text = match parse_date_label(x) {
            Some(start) if self.is_weekly() => {
                let end = start + Duration::days(6);
                format!("Week of {} to {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
            }
            Some(date) => date.format("%a, %b %-d, %Y").to_string(),
            None => x.to_string(),
        };

        format!("{} · {}\n{}", x_text, y, value)
    }
}

fn is_all_digits(label: &str) -> bool {
    !label.is_empty() && label.chars().all(|c| c.is_ascii_digit())
}

/// `YYYY-M-D` with one- or two-digit month and day
pub fn parse_date_label(label: &str) -> Option<NaiveDate> {
    let mut parts = label.trim().split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some()
        || year.len() != 4
        || !(1..=2).contains(&month.len())
        || !(1..=2).contains(&day.len())
        || ![year, month, day].iter().all(|p| is_all_digits(p))
    {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn sort_x_labels(labels: &mut [String]) {
    if labels.iter().all(|l| is_all_digits(l)) {
        labels.sort_by_key(|l| l.parse::<u64>().unwrap_or(u64::MAX));
    } else if labels.iter().all(|l| parse_date_label(l).is_some()) {
        labels.sort_by_key(|l| parse_date_label(l));
    } else {
        labels.sort();
    }
}

fn sort_y_labels(labels: &mut [String]) {
    if labels.iter().all(|l| is_all_digits(l)) {
        labels.sort_by_key(|l| l.parse::<u64>().unwrap_or(u64::MAX));
    } else {
        labels.sort();
    }
}

/// Log-scaled intensity in `[0, 1]`
pub fn intensity(value: f64, max: f64) -> f32 {
    if value <= 0.0 || max <= 0.0 {
        return 0.0;
    }
    ((value + 1.0).ln() / (max + 1.0).ln()).min(1.0) as f32
}

/// Map intensity linearly onto `[min_alpha, max_alpha]`
pub fn cell_alpha(intensity: f32, min_alpha: f32, max_alpha: f32) -> f32 {
    let t = intensity.clamp(0.0, 1.0);
    min_alpha + t * (max_alpha - min_alpha)
}

/// Pixel geometry of the visible grid, relative to the widget's top-left
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapLayout {
    pub gutter: f32,
    pub col_width: f32,
    pub row_height: f32,
    /// Index into `x_labels` of the first visible column
    pub first_col: usize,
    pub visible_cols: usize,
    pub rows: usize,
    /// Width the layout was computed for
    pub width: f32,
}

impl HeatmapLayout {
    pub fn compute(state: &HeatmapState, width: f32) -> Self {
        let gutter = y_gutter(state);
        let available = (width - gutter).max(0.0);
        let total = state.x_labels.len();

        let capacity = (available / state.options.min_col_width).floor() as usize;
        let visible_cols = if total == 0 { 0 } else { capacity.clamp(1, total) };
        let first_col = total - visible_cols;

        let col_width = if visible_cols > 0 {
            (available / visible_cols as f32).max(state.options.min_col_width.min(available.max(1.0)))
        } else {
            0.0
        };

        if first_col > 0 {
            tracing::debug!("Heatmap shows the last {} of {} columns", visible_cols, total);
        }

        Self {
            gutter,
            col_width,
            row_height: state.options.row_height,
            first_col,
            visible_cols,
            rows: state.y_labels.len(),
            width,
        }
    }

    pub fn size(&self) -> Vec2 {
        vec2(
            self.gutter + self.col_width * self.visible_cols as f32,
            self.row_height * self.rows as f32 + X_LABEL_HEIGHT,
        )
    }

    /// Cell rectangle for a visible column offset and row, relative to the origin
    pub fn cell_rect(&self, visible_col: usize, row: usize) -> Rect {
        Rect::from_min_size(
            pos2(self.gutter + visible_col as f32 * self.col_width, row as f32 * self.row_height),
            vec2(self.col_width, self.row_height),
        )
    }

    /// Map a position relative to the origin to `(x label index, y label index)`
    pub fn hit_test(&self, pos: Vec2) -> Option<(usize, usize)> {
        let x = pos.x - self.gutter;
        let y = pos.y;
        if x < 0.0 || y < 0.0 || self.col_width <= 0.0 || self.row_height <= 0.0 {
            return None;
        }

        let col = (x / self.col_width).floor() as usize;
        let row = (y / self.row_height).floor() as usize;
        if col >= self.visible_cols || row >= self.rows {
            return None;
        }
        Some((self.first_col + col, row))
    }
}

fn y_gutter(state: &HeatmapState) -> f32 {
    if state.all_numeric {
        return NUMERIC_GUTTER;
    }
    let longest = state.y_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    (longest as f32 * 7.0 + 8.0).clamp(MIN_CATEGORY_GUTTER, MAX_CATEGORY_GUTTER)
}

/// Heatmap chart view
pub struct HeatmapView {
    key: ChartKey,
    title: String,
    state: HeatmapState,
    layout: Option<HeatmapLayout>,
}

impl HeatmapView {
    pub fn new(key: ChartKey, title: String, state: HeatmapState) -> Self {
        Self {
            key,
            title,
            state,
            layout: None,
        }
    }

    pub fn state(&self) -> &HeatmapState {
        &self.state
    }

    pub fn layout(&self) -> Option<&HeatmapLayout> {
        self.layout.as_ref()
    }

    fn paint(&self, ui: &Ui, painter: &egui::Painter, origin: Pos2, layout: &HeatmapLayout) {
        let state = &self.state;
        let visuals = ui.visuals();
        let grid_stroke = Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color.linear_multiply(0.5));
        let weekend_fill = visuals.text_color().linear_multiply(0.04);
        let small = TextStyle::Small.resolve(ui.style());
        let weekly = state.is_weekly();

        for visible_col in 0..layout.visible_cols {
            let x_label = &state.x_labels[layout.first_col + visible_col];

            if state.is_date_axis && !weekly {
                if let Some(date) = parse_date_label(x_label) {
                    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                        let column = Rect::from_min_size(
                            origin + vec2(layout.gutter + visible_col as f32 * layout.col_width, 0.0),
                            vec2(layout.col_width, layout.row_height * layout.rows as f32),
                        );
                        painter.rect_filled(column, 0.0, weekend_fill);
                    }
                }
            }

            for (row, y_label) in state.y_labels.iter().enumerate() {
                let rect = layout.cell_rect(visible_col, row).translate(origin.to_vec2());
                let value = state.value(x_label, y_label);
                if value > 0.0 {
                    let alpha = cell_alpha(
                        intensity(value, state.max_value),
                        state.options.min_alpha,
                        state.options.max_alpha,
                    );
                    painter.rect_filled(rect.shrink(0.5), 1.0, colors::with_alpha(state.options.color, alpha));
                } else {
                    painter.rect_stroke(rect.shrink(0.5), 0.0, grid_stroke);
                }
            }
        }

        // Y labels
        for (row, y_label) in state.y_labels.iter().enumerate() {
            let center_y = origin.y + (row as f32 + 0.5) * layout.row_height;
            painter.text(
                pos2(origin.x + layout.gutter - 4.0, center_y),
                Align2::RIGHT_CENTER,
                y_label,
                small.clone(),
                visuals.text_color(),
            );
        }

        // X labels, thinned so they do not overlap
        let label_every = ((48.0 / layout.col_width.max(1.0)).ceil() as usize).max(1);
        for visible_col in (0..layout.visible_cols).rev().step_by(label_every) {
            let x_label = &state.x_labels[layout.first_col + visible_col];
            let text = match parse_date_label(x_label) {
                Some(date) => date.format("%b %-d").to_string(),
                None => x_label.clone(),
            };
            painter.text(
                origin + vec2(
                    layout.gutter + (visible_col as f32 + 0.5) * layout.col_width,
                    layout.row_height * layout.rows as f32 + 2.0,
                ),
                Align2::CENTER_TOP,
                text,
                small.clone(),
                visuals.weak_text_color(),
            );
        }
    }
}

impl ChartHandle for HeatmapView {
    fn destroy(&mut self) {
        self.layout = None;
    }
}

impl ChartView for HeatmapView {
    fn key(&self) -> &ChartKey {
        &self.key
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ui: &mut Ui, _actions: &mut Vec<ChartAction>) {
        if self.state.is_empty() {
            ui.weak("No data to display");
            return;
        }

        if self.layout.is_none() {
            self.layout = Some(HeatmapLayout::compute(&self.state, ui.available_width()));
        }
        let Some(layout) = self.layout.clone() else {
            return;
        };

        let (response, painter) = ui.allocate_painter(layout.size(), Sense::hover());
        let origin = response.rect.min;
        self.paint(ui, &painter, origin, &layout);

        if let Some(pointer) = response.hover_pos() {
            if let Some((col, row)) = layout.hit_test(pointer - origin) {
                let text = self.state.tooltip(&self.state.x_labels[col], &self.state.y_labels[row]);
                let highlight = layout.cell_rect(col - layout.first_col, row).translate(origin.to_vec2());
                painter.rect_stroke(highlight, 1.0, Stroke::new(1.5, ui.visuals().strong_text_color()));
                response.on_hover_text_at_pointer(text);
            }
        }
    }

    fn on_resize(&mut self) {
        // Recomputed against the new width on the next frame
        self.layout = None;
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date_points(days: usize) -> Vec<HeatmapPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..days)
            .map(|i| {
                let date = start + Duration::days(i as i64);
                HeatmapPoint::new(date.format("%Y-%-m-%-d").to_string(), "9", (i + 1) as f64)
            })
            .collect()
    }

    #[test]
    fn test_label_ordering() {
        let points = vec![
            HeatmapPoint::new("10", "b", 1.0),
            HeatmapPoint::new("9", "a", 1.0),
            HeatmapPoint::new("23", "c", 1.0),
        ];
        let state = HeatmapState::build(&points, HeatmapOptions::default());
        assert_eq!(state.x_labels, vec!["9", "10", "23"]);
        assert!(!state.all_numeric);

        let points = vec![
            HeatmapPoint::new("2024-1-10", "14", 1.0),
            HeatmapPoint::new("2024-1-9", "2", 2.0),
            HeatmapPoint::new("2023-12-31", "2", 3.0),
        ];
        let state = HeatmapState::build(&points, HeatmapOptions::default());
        assert_eq!(state.x_labels, vec!["2023-12-31", "2024-1-9", "2024-1-10"]);
        assert_eq!(state.y_labels, vec!["2", "14"]);
        assert!(state.is_date_axis);
        assert!(state.all_numeric);
    }

    #[test]
    fn test_repeated_points_share_labels() {
        let points: Vec<HeatmapPoint> = (0..500)
            .map(|i| HeatmapPoint::new((i % 7).to_string(), (i % 24).to_string(), 1.0))
            .collect();
        let state = HeatmapState::build(&points, HeatmapOptions::default());
        assert_eq!(state.x_labels, vec!["0", "1", "2", "3", "4", "5", "6"]);
        assert_eq!(state.y_labels.len(), 24);
        let total: f64 = state.value_map.values().sum();
        assert_eq!(total, 500.0);
    }

    #[test]
    fn test_sparse_values_default_to_zero() {
        let points = vec![
            HeatmapPoint::new("a", "x", 2.0),
            HeatmapPoint::new("a", "x", 3.0),
            HeatmapPoint::new("b", "y", 1.0),
        ];
        let state = HeatmapState::build(&points, HeatmapOptions::default());
        assert_eq!(state.value("a", "x"), 5.0);
        assert_eq!(state.value("a", "y"), 0.0);
        assert_eq!(state.max_value, 5.0);
        assert!(state.value_map.contains_key("a||x"));
    }

    #[test]
    fn test_alpha_endpoints_and_monotonicity() {
        assert_eq!(cell_alpha(0.0, 0.1, 0.9), 0.1);
        assert_eq!(cell_alpha(1.0, 0.1, 0.9), 0.9);

        let mut previous = 0.0;
        for value in 0..=100 {
            let alpha = cell_alpha(intensity(value as f64, 100.0), 0.1, 0.9);
            assert!(alpha >= previous);
            previous = alpha;
        }
        assert_eq!(intensity(100.0, 100.0), 1.0);
        assert_eq!(intensity(0.0, 100.0), 0.0);
    }

    #[test]
    fn test_keeps_most_recent_columns() {
        let state = HeatmapState::build(&date_points(40), HeatmapOptions::default());
        let gutter = NUMERIC_GUTTER;
        let layout = HeatmapLayout::compute(&state, gutter + 10.0 * state.options.min_col_width);

        assert_eq!(layout.visible_cols, 10);
        assert_eq!(layout.first_col, 30);
        assert_eq!(state.x_labels[layout.first_col], "2024-1-31");
        assert_eq!(state.x_labels.last().unwrap(), "2024-2-9");
    }

    #[test]
    fn test_never_zero_columns_with_data() {
        let state = HeatmapState::build(&date_points(5), HeatmapOptions::default());
        let layout = HeatmapLayout::compute(&state, 10.0);
        assert_eq!(layout.visible_cols, 1);
        assert_eq!(layout.first_col, 4);

        let wide = HeatmapLayout::compute(&state, 2000.0);
        assert_eq!(wide.visible_cols, 5);
        assert_eq!(wide.first_col, 0);
    }

    #[test]
    fn test_categorical_gutter_is_wider() {
        let numeric = HeatmapState::build(&[HeatmapPoint::new("a", "12", 1.0)], HeatmapOptions::default());
        let named = HeatmapState::build(&[HeatmapPoint::new("a", "Wednesday", 1.0)], HeatmapOptions::default());
        assert!(HeatmapLayout::compute(&named, 400.0).gutter > HeatmapLayout::compute(&numeric, 400.0).gutter);
    }

    #[test]
    fn test_hit_test() {
        let state = HeatmapState::build(&date_points(40), HeatmapOptions::default());
        let layout = HeatmapLayout::compute(&state, NUMERIC_GUTTER + 10.0 * 14.0);

        // First visible cell
        assert_eq!(layout.hit_test(vec2(NUMERIC_GUTTER + 1.0, 1.0)), Some((30, 0)));
        // Last visible cell
        assert_eq!(
            layout.hit_test(vec2(NUMERIC_GUTTER + 10.0 * 14.0 - 1.0, 17.0)),
            Some((39, 0))
        );
        // Gutter, below the grid, past the right edge
        assert_eq!(layout.hit_test(vec2(5.0, 5.0)), None);
        assert_eq!(layout.hit_test(vec2(NUMERIC_GUTTER + 5.0, 19.0)), None);
        assert_eq!(layout.hit_test(vec2(NUMERIC_GUTTER + 141.0, 5.0)), None);
    }

    #[test]
    fn test_weekly_tooltip() {
        let points = vec![
            HeatmapPoint::new("2024-1-1", "3", 4.0),
            HeatmapPoint::new("2024-1-8", "3", 2.0),
            HeatmapPoint::new("2024-1-22", "3", 1.0),
        ];
        let mut options = HeatmapOptions::default();
        options.value_suffix = " turns".to_string();
        let state = HeatmapState::build(&points, options);

        assert!(state.is_weekly());
        assert_eq!(state.tooltip("2024-1-8", "3"), "Week of Jan 8 to Jan 14, 2024 · 3\n2 turns");

        let daily = HeatmapState::build(&date_points(3), HeatmapOptions::default());
        assert!(!daily.is_weekly());
        assert_eq!(daily.tooltip("2024-1-2", "9"), "Tue, Jan 2, 2024 · 9\n2");
    }

    #[test]
    fn test_points_and_options_from_chart() {
        let chart: ChartConfig = serde_json::from_value(json!({
            "id": "activity",
            "chart_type": "heatmap",
            "x_field": "day",
            "y_field": "hour",
            "value_field": "turns",
            "options": { "min_alpha": 0.2, "max_alpha": 0.1, "color": "#ff0000", "row_height": 12 }
        }))
        .unwrap();
        let rows: Vec<Row> = serde_json::from_value(json!([
            { "day": "2024-1-1", "hour": 9, "turns": 3 },
            { "day": "2024-1-1", "turns": 3 }
        ]))
        .unwrap();

        let points = HeatmapState::points_from_rows(&chart, &rows);
        assert_eq!(points, vec![HeatmapPoint::new("2024-1-1", "9", 3.0)]);

        let options = HeatmapOptions::from_chart(&chart, 14.0);
        assert_eq!(options.min_alpha, 0.2);
        // max_alpha never drops below min_alpha
        assert_eq!(options.max_alpha, 0.2);
        assert_eq!(options.color, Color32::from_rgb(255, 0, 0));
        assert_eq!(options.row_height, 12.0);
    }

    fn frame(ctx: &egui::Context, view: &mut HeatmapView, width: f32) {
        let input = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(width, 600.0))),
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| view.ui(ui, &mut Vec::new()));
        });
    }

    #[test]
    fn test_resize_redraws_from_kept_state() {
        let state = HeatmapState::build(&date_points(40), HeatmapOptions::default());
        let mut view = HeatmapView::new(ChartKey::new("d", "activity"), "Activity".to_string(), state);
        let ctx = egui::Context::default();

        frame(&ctx, &mut view, 300.0);
        let narrow = view.layout().unwrap().visible_cols;
        assert!(narrow < 40);

        // Width changes alone keep the layout until the resize settles
        frame(&ctx, &mut view, 1200.0);
        assert_eq!(view.layout().unwrap().visible_cols, narrow);

        view.on_resize();
        frame(&ctx, &mut view, 1200.0);
        assert_eq!(view.layout().unwrap().visible_cols, 40);
        assert_eq!(view.state().x_labels.len(), 40);
    }
}

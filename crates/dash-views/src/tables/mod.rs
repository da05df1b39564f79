//! Table engine
//!
//! Tables come in two shapes. With explicit `columns` the rows are sorted by a
//! persisted [`SortState`] and the user can flip the direction with a toggle.
//! Without columns the rows are `{value, count}` pairs shown with a share of
//! the total.

use std::cmp::Ordering;

use dash_core::{
    values, ChartConfig, ChartHandle, ChartKey, ColumnSpec, NullPatterns, Row, SortDirection, SortState,
    SortStore,
};
use dash_ui::{chart_widget_id, icons};
use egui::{Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use serde_json::Value;

use crate::chart_view::{ChartAction, ChartView};
use crate::plots::timeline::parse_timestamp;

/// Field names known to hold numbers
pub const NUMERIC_FIELDS: &[&str] = &[
    "count",
    "value",
    "locs",
    "change_count",
    "sessions",
    "session_count",
    "turn_count",
    "total_code_loc",
    "times_changed",
    "total_lines_added",
    "total_lines_removed",
    "total_changes",
    "minutes",
    "hours",
];

/// Row limit when `max_items` is not set
pub const DEFAULT_MAX_ROWS: usize = 15;

pub fn is_numeric_field(field: &str) -> bool {
    NUMERIC_FIELDS.contains(&field)
}

fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Compare two cells; missing values sort after everything in either direction
pub fn compare_values(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    match (is_missing(a), is_missing(b)) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return Ordering::Equal,
    };

    let ordering = match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
        _ => values::display_text(a)
            .to_lowercase()
            .cmp(&values::display_text(b).to_lowercase()),
    };

    if direction.is_ascending() {
        ordering
    } else {
        ordering.reverse()
    }
}

/// Stable sort by the state's key and direction
pub fn sort_rows(rows: &mut [Row], state: &SortState) {
    rows.sort_by(|a, b| compare_values(a.get(&state.key), b.get(&state.key), state.direction));
}

/// Initial sort: `sort_key` option, else the first numeric column, else the first column
pub fn default_sort(chart: &ChartConfig, columns: &[ColumnSpec]) -> SortState {
    let key = chart
        .options
        .text("sort_key")
        .map(str::to_string)
        .or_else(|| {
            columns
                .iter()
                .find(|c| is_numeric_field(&c.field))
                .or_else(|| columns.first())
                .map(|c| c.field.clone())
        })
        .unwrap_or_default();

    let direction = chart
        .options
        .text("sort_direction")
        .and_then(SortDirection::parse)
        .unwrap_or_default();

    SortState::new(key, direction)
}

/// A formatted cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub right_aligned: bool,
}

/// Numbers and dates are formatted and right-aligned; everything else is text.
///
/// Strings holding a plain number count as numbers.
pub fn format_cell(value: Option<&Value>) -> Cell {
    match value {
        None | Some(Value::Null) => Cell {
            text: "—".to_string(),
            right_aligned: false,
        },
        Some(Value::Number(n)) => Cell {
            text: values::format_number(n.as_f64().unwrap_or(0.0), 2),
            right_aligned: true,
        },
        Some(value @ Value::String(_)) if values::as_number(value).is_some() => Cell {
            text: values::format_number(values::number_or_zero(Some(value)), 2),
            right_aligned: true,
        },
        Some(Value::String(s)) => match parse_timestamp(s) {
            Some(at) if s.trim().len() > 10 => Cell {
                text: at.format("%Y-%m-%d %H:%M").to_string(),
                right_aligned: true,
            },
            Some(at) => Cell {
                text: at.format("%Y-%m-%d").to_string(),
                right_aligned: true,
            },
            None => Cell {
                text: s.clone(),
                right_aligned: false,
            },
        },
        Some(other) => Cell {
            text: values::display_text(other),
            right_aligned: false,
        },
    }
}

/// One row of a simple table
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleRow {
    pub label: String,
    pub count: f64,
    /// Share of the total in percent
    pub percent: f64,
}

/// `{value, count}` rows with their share of the total, truncated after the total is taken
pub fn simple_rows(chart: &ChartConfig, rows: &[Row], nulls: &NullPatterns, max_rows: usize) -> Vec<SimpleRow> {
    let label_key = chart.label_field.as_deref().unwrap_or("value");
    let value_key = chart.value_field.as_deref().unwrap_or("count");
    let exclude_null = chart.options.exclude_null();

    let kept: Vec<(String, f64)> = rows
        .iter()
        .filter(|row| !(exclude_null && nulls.is_null(row.get(label_key))))
        .map(|row| {
            let raw = row.get(label_key).map(values::display_text).unwrap_or_default();
            (chart.label_for(&raw).to_string(), values::number_or_zero(row.get(value_key)))
        })
        .collect();

    let total: f64 = kept.iter().map(|(_, c)| *c).sum();
    kept.into_iter()
        .take(max_rows)
        .map(|(label, count)| SimpleRow {
            percent: if total > 0.0 { count / total * 100.0 } else { 0.0 },
            label,
            count,
        })
        .collect()
}

#[derive(Debug, Clone)]
enum TableBody {
    Columnar { columns: Vec<ColumnSpec>, rows: Vec<Row> },
    Simple { rows: Vec<SimpleRow> },
}

/// Table chart view
pub struct TableView {
    key: ChartKey,
    title: String,
    body: TableBody,
    sort: Option<SortState>,
    sort_toggle: bool,
    sort_labels: Option<(String, String)>,
}

impl TableView {
    /// Build a table, reading (and on first use seeding) the sort state for its key
    pub fn build(key: ChartKey, chart: &ChartConfig, rows: &[Row], sort_store: &mut SortStore) -> Self {
        let max_rows = chart.options.max_items().unwrap_or(DEFAULT_MAX_ROWS);

        let (body, sort) = match chart.columns.as_ref().filter(|c| !c.is_empty()) {
            Some(columns) => {
                let state = sort_store.get_or_init(&key, || default_sort(chart, columns)).clone();
                let mut rows = rows.to_vec();
                sort_rows(&mut rows, &state);
                rows.truncate(max_rows);
                tracing::debug!(
                    "Table {} sorted by {} {}",
                    key,
                    state.key,
                    state.direction.as_str()
                );
                (
                    TableBody::Columnar {
                        columns: columns.clone(),
                        rows,
                    },
                    Some(state),
                )
            }
            None => (
                TableBody::Simple {
                    rows: simple_rows(chart, rows, &NullPatterns::default(), max_rows),
                },
                None,
            ),
        };

        Self {
            key,
            title: chart.title.clone(),
            body,
            sort,
            sort_toggle: chart.options.flag("sort_toggle"),
            sort_labels: chart.options.sort_labels(),
        }
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Displayed rows of a columnar table
    pub fn rows(&self) -> &[Row] {
        match &self.body {
            TableBody::Columnar { rows, .. } => rows,
            TableBody::Simple { .. } => &[],
        }
    }

    pub fn simple_rows(&self) -> &[SimpleRow] {
        match &self.body {
            TableBody::Simple { rows } => rows,
            TableBody::Columnar { .. } => &[],
        }
    }

    fn toggle_label(&self, direction: SortDirection) -> String {
        let (desc, asc) = self
            .sort_labels
            .clone()
            .unwrap_or_else(|| ("Highest first".to_string(), "Lowest first".to_string()));
        match direction {
            SortDirection::Desc => format!("{} {}", icons::SORT_DESC, desc),
            SortDirection::Asc => format!("{} {}", icons::SORT_ASC, asc),
        }
    }

    fn columnar_ui(&self, ui: &mut Ui, columns: &[ColumnSpec], rows: &[Row]) {
        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;
        let sort_key = self.sort.as_ref().map(|s| (s.key.as_str(), s.direction));

        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .min_scrolled_height(0.0)
            .vscroll(false);
        for (i, _) in columns.iter().enumerate() {
            let column = if i + 1 == columns.len() {
                Column::remainder().at_least(60.0)
            } else {
                Column::auto().at_least(60.0).clip(true)
            };
            builder = builder.column(column);
        }

        builder
            .header(20.0, |mut header| {
                for column in columns {
                    header.col(|ui| {
                        let mut title = column.display_title().to_string();
                        if let Some((key, direction)) = sort_key {
                            if key == column.field {
                                let icon = if direction.is_ascending() { icons::SORT_ASC } else { icons::SORT_DESC };
                                title = format!("{} {}", title, icon);
                            }
                        }
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(text_height, rows.len(), |row_index, mut row| {
                    let data = &rows[row_index];
                    for column in columns {
                        row.col(|ui| {
                            let cell = format_cell(data.get(&column.field));
                            if cell.right_aligned {
                                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                    ui.label(cell.text);
                                });
                            } else {
                                ui.label(cell.text);
                            }
                        });
                    }
                });
            });
    }

    fn simple_ui(&self, ui: &mut Ui, rows: &[SimpleRow]) {
        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;

        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .vscroll(false)
            .column(Column::remainder().at_least(100.0).clip(true))
            .column(Column::auto().at_least(60.0))
            .column(Column::auto().at_least(60.0))
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Value");
                });
                header.col(|ui| {
                    ui.strong("Count");
                });
                header.col(|ui| {
                    ui.strong("%");
                });
            })
            .body(|body| {
                body.rows(text_height, rows.len(), |row_index, mut row| {
                    let data = &rows[row_index];
                    row.col(|ui| {
                        ui.label(&data.label);
                    });
                    row.col(|ui| {
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            ui.label(values::format_number(data.count, 2));
                        });
                    });
                    row.col(|ui| {
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            ui.label(RichText::new(format!("{:.1}%", data.percent)).weak());
                        });
                    });
                });
            });
    }
}

impl ChartHandle for TableView {
    fn destroy(&mut self) {
        self.body = TableBody::Simple { rows: Vec::new() };
    }
}

impl ChartView for TableView {
    fn key(&self) -> &ChartKey {
        &self.key
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ui: &mut Ui, actions: &mut Vec<ChartAction>) {
        if self.sort_toggle {
            if let Some(state) = &self.sort {
                let label = self.toggle_label(state.direction);
                if ui.small_button(label).clicked() {
                    actions.push(ChartAction::ToggleSort(self.key.clone()));
                }
            }
        }

        ui.push_id(chart_widget_id(&self.key, "table"), |ui| match &self.body {
            TableBody::Columnar { columns, rows } => self.columnar_ui(ui, columns, rows),
            TableBody::Simple { rows } => self.simple_ui(ui, rows),
        });
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart(value: Value) -> ChartConfig {
        serde_json::from_value(value).unwrap()
    }

    fn rows(value: Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    fn files_table() -> ChartConfig {
        chart(json!({
            "id": "files",
            "chart_type": "table",
            "columns": [
                { "field": "path", "title": "File" },
                { "field": "times_changed", "title": "Changes" },
                { "field": "total_lines_added" }
            ],
            "options": { "sort_toggle": true }
        }))
    }

    fn file_rows() -> Vec<Row> {
        rows(json!([
            { "path": "b.rs", "times_changed": 3 },
            { "path": "a.rs", "times_changed": null },
            { "path": "C.rs", "times_changed": 10 },
            { "path": "d.rs" }
        ]))
    }

    fn paths(table: &TableView) -> Vec<String> {
        table.rows().iter().map(|r| values::display_text(&r["path"])).collect()
    }

    #[test]
    fn test_nulls_sort_last_in_both_directions() {
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            assert_eq!(compare_values(None, Some(&json!(1)), direction), Ordering::Greater);
            assert_eq!(compare_values(Some(&json!(1)), Some(&Value::Null), direction), Ordering::Less);
            assert_eq!(compare_values(None, Some(&Value::Null), direction), Ordering::Equal);
        }
    }

    #[test]
    fn test_numbers_and_strings_compare() {
        let asc = SortDirection::Asc;
        assert_eq!(compare_values(Some(&json!(9)), Some(&json!(10)), asc), Ordering::Less);
        assert_eq!(compare_values(Some(&json!("apple")), Some(&json!("Banana")), asc), Ordering::Less);
        assert_eq!(
            compare_values(Some(&json!("apple")), Some(&json!("Banana")), SortDirection::Desc),
            Ordering::Greater
        );
    }

    #[test]
    fn test_default_sort_prefers_known_numeric_column() {
        let config = files_table();
        let columns = config.columns.clone().unwrap();
        assert_eq!(default_sort(&config, &columns), SortState::new("times_changed", SortDirection::Desc));

        let config = chart(json!({
            "id": "t",
            "options": { "sort_key": "path", "sort_direction": "asc" }
        }));
        assert_eq!(default_sort(&config, &columns), SortState::new("path", SortDirection::Asc));

        let text_only = vec![ColumnSpec { field: "name".to_string(), title: None }];
        assert_eq!(default_sort(&chart(json!({ "id": "t" })), &text_only).key, "name");
    }

    #[test]
    fn test_toggle_is_observed_on_next_build() {
        let mut store = SortStore::new();
        let key = ChartKey::new("extraction", "files");
        let config = files_table();

        let first = TableView::build(key.clone(), &config, &file_rows(), &mut store);
        assert_eq!(paths(&first), vec!["C.rs", "b.rs", "a.rs", "d.rs"]);

        store.toggle(&key);
        let second = TableView::build(key.clone(), &config, &file_rows(), &mut store);
        assert_eq!(second.sort_state().map(|s| s.direction), Some(SortDirection::Asc));
        assert_eq!(paths(&second), vec!["b.rs", "C.rs", "a.rs", "d.rs"]);
    }

    #[test]
    fn test_rows_truncate_after_sorting() {
        let mut store = SortStore::new();
        let data: Vec<Row> = (0..20)
            .map(|i| rows(json!([{ "path": format!("f{}", i), "times_changed": i }])).remove(0))
            .collect();
        let table = TableView::build(ChartKey::new("d", "files"), &files_table(), &data, &mut store);
        assert_eq!(table.rows().len(), DEFAULT_MAX_ROWS);
        assert_eq!(values::display_text(&table.rows()[0]["path"]), "f19");
    }

    #[test]
    fn test_simple_rows_share_of_total() {
        let config = chart(json!({
            "id": "langs",
            "chart_type": "table",
            "options": { "exclude_null": true, "max_items": 2 }
        }));
        let data = rows(json!([
            { "value": "rust", "count": 6 },
            { "value": "go", "count": 3 },
            { "value": null, "count": 50 },
            { "value": "zig", "count": 1 }
        ]));

        let table = TableView::build(ChartKey::new("d", "langs"), &config, &data, &mut SortStore::new());
        let simple = table.simple_rows();
        assert_eq!(simple.len(), 2);
        assert_eq!(simple[0].label, "rust");
        assert_eq!(simple[0].percent, 60.0);
        assert_eq!(simple[1].percent, 30.0);
        assert!(table.sort_state().is_none());
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(
            format_cell(Some(&json!(1234.5))),
            Cell { text: "1,234.5".to_string(), right_aligned: true }
        );
        assert_eq!(format_cell(Some(&json!("2024-03-05"))).text, "2024-03-05");
        assert_eq!(format_cell(Some(&json!("2024-03-05 14:30:00"))).text, "2024-03-05 14:30");
        assert!(!format_cell(Some(&json!("src/main.rs"))).right_aligned);
        assert_eq!(
            format_cell(Some(&json!("1234"))),
            Cell { text: "1,234".to_string(), right_aligned: true }
        );
        assert_eq!(format_cell(Some(&json!(" 2.5 "))).text, "2.5");
        assert!(!format_cell(Some(&json!("v1.2"))).right_aligned);
        assert_eq!(format_cell(None).text, "—");
    }
}

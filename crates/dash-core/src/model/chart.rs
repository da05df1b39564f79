//! Chart configuration

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{nullable, ChartOptions};

/// The declarative tag selecting a rendering engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
    Scatter,
    HorizontalBar,
    StackedBar,
    StackedBarTimeline,
    Area,
    Heatmap,
    WordCloud,
    Table,
    Quotes,
    None,
    /// Any tag this renderer does not know
    #[serde(other)]
    Unknown,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Doughnut => "doughnut",
            ChartType::Scatter => "scatter",
            ChartType::HorizontalBar => "horizontal_bar",
            ChartType::StackedBar => "stacked_bar",
            ChartType::StackedBarTimeline => "stacked_bar_timeline",
            ChartType::Area => "area",
            ChartType::Heatmap => "heatmap",
            ChartType::WordCloud => "word_cloud",
            ChartType::Table => "table",
            ChartType::Quotes => "quotes",
            ChartType::None => "none",
            ChartType::Unknown => "unknown",
        }
    }
}

/// Grid width of a chart card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartWidth {
    #[default]
    Half,
    Full,
}

/// One named numeric series within a chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub field: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_dataset_color")]
    pub color: String,
    #[serde(default)]
    pub fill: bool,
}

impl DatasetSpec {
    /// Display label, falling back to the field name
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.field
        } else {
            &self.label
        }
    }
}

fn default_dataset_color() -> String {
    "#3b82f6".to_string()
}

/// Table column declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub field: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl ColumnSpec {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.field)
    }
}

/// Custom label and description for a category value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelOverride {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Configuration for a chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub chart_type: ChartType,

    #[serde(default, deserialize_with = "nullable")]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub width: ChartWidth,

    #[serde(default)]
    pub x_field: Option<String>,

    #[serde(default)]
    pub y_field: Option<String>,

    #[serde(default)]
    pub value_field: Option<String>,

    #[serde(default)]
    pub label_field: Option<String>,

    #[serde(default)]
    pub columns: Option<Vec<ColumnSpec>>,

    #[serde(default, deserialize_with = "nullable")]
    pub datasets: Vec<DatasetSpec>,

    /// Category value -> CSS-style color
    #[serde(default, deserialize_with = "nullable")]
    pub colors: IndexMap<String, String>,

    #[serde(default, deserialize_with = "nullable")]
    pub options: ChartOptions,

    #[serde(default)]
    pub labels: Option<IndexMap<String, LabelOverride>>,
}

impl ChartConfig {
    /// A minimal configuration, mostly useful for building charts in code
    pub fn new(id: impl Into<String>, chart_type: ChartType) -> Self {
        Self {
            id: id.into(),
            chart_type,
            title: String::new(),
            description: None,
            width: ChartWidth::Half,
            x_field: None,
            y_field: None,
            value_field: None,
            label_field: None,
            columns: None,
            datasets: Vec::new(),
            colors: IndexMap::new(),
            options: ChartOptions::default(),
            labels: None,
        }
    }

    /// Description text, ignoring the empty string the backend sends
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// Display label for a category value, honouring `labels` overrides
    pub fn label_for<'a>(&'a self, value: &'a str) -> &'a str {
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(value))
            .and_then(|o| o.label.as_deref())
            .unwrap_or(value)
    }

    /// Hover description for a category value
    pub fn description_for(&self, value: &str) -> Option<&str> {
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(value))
            .and_then(|o| o.description.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_and_missing_chart_types() {
        let known: ChartConfig =
            serde_json::from_value(json!({ "id": "a", "chart_type": "stacked_bar_timeline" })).unwrap();
        assert_eq!(known.chart_type, ChartType::StackedBarTimeline);

        let unknown: ChartConfig =
            serde_json::from_value(json!({ "id": "b", "chart_type": "radar" })).unwrap();
        assert_eq!(unknown.chart_type, ChartType::Unknown);

        let omitted: ChartConfig = serde_json::from_value(json!({ "id": "c" })).unwrap();
        assert_eq!(omitted.chart_type, ChartType::Bar);
        assert_eq!(omitted.width, ChartWidth::Half);
    }

    #[test]
    fn test_label_overrides() {
        let chart: ChartConfig = serde_json::from_value(json!({
            "id": "models",
            "chart_type": "pie",
            "description": "",
            "labels": { "gpt-4o": { "label": "GPT-4o", "description": "Omni model" } }
        }))
        .unwrap();

        assert_eq!(chart.label_for("gpt-4o"), "GPT-4o");
        assert_eq!(chart.label_for("other"), "other");
        assert_eq!(chart.description_for("gpt-4o"), Some("Omni model"));
        assert_eq!(chart.description(), None);
    }

    #[test]
    fn test_dataset_defaults() {
        let ds: DatasetSpec = serde_json::from_value(json!({ "field": "added" })).unwrap();
        assert_eq!(ds.color, "#3b82f6");
        assert_eq!(ds.display_label(), "added");
        assert!(!ds.fill);
    }
}

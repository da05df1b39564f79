//! Dashboard payload model
//!
//! Mirrors the JSON the backend returns for one dashboard: the declarative
//! configuration (metrics, charts, lists) and the matching data maps.

mod chart;
mod data;
mod options;

pub use chart::{ChartConfig, ChartType, ChartWidth, ColumnSpec, DatasetSpec, LabelOverride};
pub use data::{ChartData, DashboardData, Row, WordCloudData, WordGroup, WordList};
pub use options::ChartOptions;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Full response for one dashboard render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub is_available: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub dashboard_id: Option<String>,

    #[serde(default)]
    pub workspace_id: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub config: DashboardConfig,

    #[serde(default, deserialize_with = "nullable")]
    pub data: DashboardData,
}

impl DashboardPayload {
    /// An unavailable payload carrying only a message
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            is_available: false,
            message: Some(message.into()),
            dashboard_id: None,
            workspace_id: None,
            config: DashboardConfig::default(),
            data: DashboardData::default(),
        }
    }
}

/// Declarative dashboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub dashboard: Option<DashboardMeta>,

    #[serde(default, deserialize_with = "nullable")]
    pub metrics: Vec<MetricConfig>,

    #[serde(default, deserialize_with = "nullable")]
    pub charts: Vec<ChartConfig>,

    #[serde(default, deserialize_with = "nullable")]
    pub lists: Vec<ListConfig>,
}

impl DashboardConfig {
    /// Look up a chart configuration by id
    pub fn chart(&self, id: &str) -> Option<&ChartConfig> {
        self.charts.iter().find(|c| c.id == id)
    }
}

/// Dashboard metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardMeta {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub is_system_level: bool,
}

/// How a metric value is formatted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricFormat {
    #[default]
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "percent")]
    Percent,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "datetime")]
    Datetime,
    #[serde(rename = "datetime:split")]
    DatetimeSplit,
    #[serde(rename = "datetime:compact")]
    DatetimeCompact,
}

/// A single headline metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricConfig {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub format: MetricFormat,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub text_size: Option<String>,
    #[serde(default)]
    pub subtitle_field: Option<String>,
}

impl MetricConfig {
    /// Key under which the backend stores this metric's subtitle value
    pub fn subtitle_key(&self) -> String {
        format!("{}_subtitle", self.id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListDisplay {
    #[default]
    List,
    ProgressBar,
}

/// A ranked list rendered beside the charts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_label_field")]
    pub label_field: String,
    #[serde(default = "default_value_field")]
    pub value_field: String,
    #[serde(default = "default_list_items")]
    pub max_items: usize,
    #[serde(default)]
    pub display_type: ListDisplay,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub show_total: bool,
    #[serde(default)]
    pub columns: Option<Vec<ColumnSpec>>,
}

fn default_label_field() -> String {
    "label".to_string()
}

fn default_value_field() -> String {
    "value".to_string()
}

fn default_list_items() -> usize {
    10
}

/// The entity a dashboard's data is computed over
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DashboardScope {
    /// A single workspace
    Workspace(String),
    /// Cross-workspace system view
    System,
}

impl DashboardScope {
    /// Unescaped API path segments for a dashboard in this scope
    pub fn api_segments<'a>(&'a self, dashboard_id: &'a str) -> Vec<&'a str> {
        match self {
            DashboardScope::Workspace(workspace_id) => {
                vec!["api", "browse", "workspace", workspace_id.as_str(), "dashboards", dashboard_id]
            }
            DashboardScope::System => vec!["api", "system", "dashboards", dashboard_id],
        }
    }
}

impl fmt::Display for DashboardScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardScope::Workspace(id) => write!(f, "workspace:{}", id),
            DashboardScope::System => write!(f, "system"),
        }
    }
}

impl FromStr for DashboardScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("system") {
            return Ok(DashboardScope::System);
        }
        match s.split_once(':') {
            Some((kind, id)) if kind.eq_ignore_ascii_case("workspace") && !id.trim().is_empty() => {
                Ok(DashboardScope::Workspace(id.trim().to_string()))
            }
            _ => Err(format!("invalid dashboard scope '{}', expected 'system' or 'workspace:<id>'", s)),
        }
    }
}

/// Treat an explicit JSON `null` the same as a missing field
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unavailable_payload_parses_without_data() {
        let payload: DashboardPayload = serde_json::from_value(json!({
            "dashboard_id": "system",
            "is_available": false,
            "message": "No workspaces have been extracted yet.",
            "config": { "metrics": [], "charts": [] }
        }))
        .unwrap();

        assert!(!payload.is_available);
        assert_eq!(payload.message.as_deref(), Some("No workspaces have been extracted yet."));
        assert!(payload.data.charts.is_empty());
    }

    #[test]
    fn test_null_collections_default_to_empty() {
        let config: DashboardConfig = serde_json::from_value(json!({
            "metrics": null,
            "charts": [{ "id": "c1", "datasets": null, "colors": null, "options": null }]
        }))
        .unwrap();

        assert!(config.metrics.is_empty());
        assert!(config.lists.is_empty());
        let chart = config.chart("c1").unwrap();
        assert_eq!(chart.chart_type, ChartType::Bar);
        assert!(chart.datasets.is_empty());
        assert!(chart.options.is_empty());
    }

    #[test]
    fn test_metric_format_names() {
        let metric: MetricConfig = serde_json::from_value(json!({
            "id": "last_run",
            "title": "Last run",
            "format": "datetime:split"
        }))
        .unwrap();
        assert_eq!(metric.format, MetricFormat::DatetimeSplit);
        assert_eq!(metric.subtitle_key(), "last_run_subtitle");
    }

    #[test]
    fn test_scope_round_trip_and_paths() {
        let ws: DashboardScope = "workspace:abc123".parse().unwrap();
        assert_eq!(ws, DashboardScope::Workspace("abc123".to_string()));
        assert_eq!(
            ws.api_segments("extraction"),
            vec!["api", "browse", "workspace", "abc123", "dashboards", "extraction"]
        );
        assert_eq!(ws.to_string(), "workspace:abc123");

        let system: DashboardScope = "System".parse().unwrap();
        assert_eq!(system.api_segments("a/b"), vec!["api", "system", "dashboards", "a/b"]);

        assert!("workspace:".parse::<DashboardScope>().is_err());
        assert!("elsewhere".parse::<DashboardScope>().is_err());
    }
}

//! Data payload attached to a dashboard

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::nullable;

/// One row of chart data
pub type Row = Map<String, Value>;

/// Metric values and per-chart data, keyed by config id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default, deserialize_with = "nullable")]
    pub metrics: IndexMap<String, Value>,

    #[serde(default, deserialize_with = "nullable")]
    pub charts: IndexMap<String, ChartData>,

    #[serde(default)]
    pub lists: Option<IndexMap<String, ChartData>>,
}

impl DashboardData {
    /// Data for a chart id, `None` when missing or empty
    pub fn chart(&self, id: &str) -> Option<&ChartData> {
        self.charts.get(id).filter(|d| !d.is_empty())
    }

    /// List rows live under `lists` when the backend sends them, else under `charts`
    pub fn list(&self, id: &str) -> Option<&ChartData> {
        self.lists
            .as_ref()
            .and_then(|lists| lists.get(id))
            .or_else(|| self.charts.get(id))
            .filter(|d| !d.is_empty())
    }
}

/// Chart data is either a row array or a grouped word-cloud object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartData {
    Rows(Vec<Row>),
    WordCloud(WordCloudData),
    /// Anything else (string lists for quotes, scalars)
    Raw(Value),
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Rows(rows) => rows.is_empty(),
            ChartData::WordCloud(cloud) => cloud.is_empty(),
            ChartData::Raw(value) => match value {
                Value::Null => true,
                Value::Array(items) => items.is_empty(),
                Value::Object(map) => map.is_empty(),
                Value::String(s) => s.trim().is_empty(),
                _ => false,
            },
        }
    }

    pub fn rows(&self) -> &[Row] {
        match self {
            ChartData::Rows(rows) => rows,
            _ => &[],
        }
    }

    pub fn word_cloud(&self) -> Option<&WordCloudData> {
        match self {
            ChartData::WordCloud(cloud) => Some(cloud),
            _ => None,
        }
    }
}

impl From<Vec<Row>> for ChartData {
    fn from(rows: Vec<Row>) -> Self {
        ChartData::Rows(rows)
    }
}

/// A selectable word-cloud group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordGroup {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// Words of one group, split by text source.
///
/// A bare `[[word, weight], ...]` array is accepted as the response list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WordList {
    pub response: Vec<(String, f64)>,
    pub thinking: Vec<(String, f64)>,
}

impl<'de> Deserialize<'de> for WordList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Split {
            #[serde(default, deserialize_with = "nullable")]
            response: Vec<(String, f64)>,
            #[serde(default, deserialize_with = "nullable")]
            thinking: Vec<(String, f64)>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Split(Split),
            Flat(Vec<(String, f64)>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Split(s) => WordList { response: s.response, thinking: s.thinking },
            Repr::Flat(response) => WordList { response, thinking: Vec::new() },
        })
    }
}

/// Grouped word-cloud payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordCloudData {
    #[serde(default, deserialize_with = "nullable")]
    pub groups: Vec<WordGroup>,
    #[serde(default)]
    pub default_group_id: Option<String>,
    pub word_lists: IndexMap<String, WordList>,
}

impl WordCloudData {
    pub fn is_empty(&self) -> bool {
        self.word_lists
            .values()
            .all(|l| l.response.is_empty() && l.thinking.is_empty())
    }

    /// Groups to offer, falling back to the word-list keys when `groups` is absent
    pub fn effective_groups(&self) -> Vec<WordGroup> {
        if !self.groups.is_empty() {
            return self.groups.clone();
        }
        self.word_lists
            .keys()
            .map(|id| WordGroup { id: id.clone(), label: id.clone() })
            .collect()
    }

    /// The initially selected group id
    pub fn initial_group(&self) -> Option<String> {
        self.default_group_id
            .clone()
            .filter(|id| self.word_lists.contains_key(id))
            .or_else(|| self.effective_groups().first().map(|g| g.id.clone()))
    }
}

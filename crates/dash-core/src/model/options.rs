//! Loosely typed chart options bag

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::values;

/// Free-form `options` object attached to a chart.
///
/// The backend passes these through untouched, so accessors are tolerant:
/// numbers may arrive as strings and flags as `"true"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartOptions(Map<String, Value>);

impl ChartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Boolean flag, false when absent
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            Some(Value::Number(n)) => n.as_f64().map_or(false, |n| n != 0.0),
            _ => false,
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(values::as_number)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn usize(&self, key: &str) -> Option<usize> {
        self.number(key).filter(|n| *n >= 0.0).map(|n| n as usize)
    }

    /// Fixed pixel height (`height`)
    pub fn height(&self) -> Option<f32> {
        self.number("height").filter(|h| *h > 0.0).map(|h| h as f32)
    }

    /// Fill the parent instead of a fixed height (`auto_height`)
    pub fn auto_height(&self) -> bool {
        self.flag("auto_height")
    }

    /// Item truncation limit (`max_items`)
    pub fn max_items(&self) -> Option<usize> {
        self.usize("max_items").filter(|n| *n > 0)
    }

    pub fn group_others(&self) -> bool {
        self.flag("group_others")
    }

    pub fn exclude_null(&self) -> bool {
        self.flag("exclude_null")
    }

    pub fn show_percentages(&self) -> bool {
        self.flag("show_percentages")
    }

    pub fn percentage_scale(&self) -> bool {
        self.flag("percentage_scale")
    }

    pub fn integer_scale(&self) -> bool {
        self.flag("integer_scale")
    }

    pub fn percentage_mode(&self) -> bool {
        self.flag("percentage_mode")
    }

    pub fn y_max(&self) -> Option<f64> {
        self.number("y_max")
    }

    pub fn legend_position(&self) -> Option<&str> {
        self.text("legend_position")
    }

    /// Custom labels for the sort toggle as `(desc, asc)`
    pub fn sort_labels(&self) -> Option<(String, String)> {
        let labels = self.get("sort_labels")?;
        match labels {
            Value::Object(map) => {
                let desc = map.get("desc").and_then(Value::as_str)?;
                let asc = map.get("asc").and_then(Value::as_str)?;
                Some((desc.to_string(), asc.to_string()))
            }
            Value::Array(items) if items.len() == 2 => {
                let desc = items[0].as_str()?;
                let asc = items[1].as_str()?;
                Some((desc.to_string(), asc.to_string()))
            }
            _ => None,
        }
    }

    /// Doughnut cutout as a fraction of the radius; accepts `"60%"`, `60` or `0.6`
    pub fn cutout(&self) -> Option<f32> {
        let raw = self.get("cutout")?;
        let fraction = match raw {
            Value::String(s) => {
                let s = s.trim();
                match s.strip_suffix('%') {
                    Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0,
                    None => s.parse::<f64>().ok()?,
                }
            }
            other => values::as_number(other)?,
        };
        let fraction = if fraction > 1.0 { fraction / 100.0 } else { fraction };
        Some(fraction.clamp(0.0, 0.95) as f32)
    }
}

impl From<Map<String, Value>> for ChartOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

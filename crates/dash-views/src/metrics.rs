//! Headline metrics row

use dash_core::{values, MetricConfig, MetricFormat};
use dash_ui::card_frame;
use egui::{RichText, Ui};
use indexmap::IndexMap;
use serde_json::Value;

use crate::plots::timeline::parse_timestamp;
use crate::plots::utils::colors;

/// Shown for missing or null metric values
pub const NULL_METRIC: &str = "—";

/// Formatted metric text; `secondary` is the time line of a split datetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricText {
    pub primary: String,
    pub secondary: Option<String>,
}

impl MetricText {
    fn single(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
        }
    }
}

pub fn format_metric(value: Option<&Value>, format: MetricFormat) -> MetricText {
    let value = match value {
        None | Some(Value::Null) => return MetricText::single(NULL_METRIC),
        Some(v) => v,
    };

    match format {
        MetricFormat::Number => match values::as_number(value) {
            Some(n) => MetricText::single(values::format_number(n, 2)),
            None => MetricText::single(values::display_text(value)),
        },
        MetricFormat::Percent => match values::as_number(value) {
            Some(n) => MetricText::single(format!("{:.1}%", n)),
            None => MetricText::single(values::display_text(value)),
        },
        MetricFormat::Text => MetricText::single(values::display_text(value)),
        MetricFormat::Datetime | MetricFormat::DatetimeSplit | MetricFormat::DatetimeCompact => {
            let raw = values::display_text(value);
            let Some(at) = parse_timestamp(&raw) else {
                return MetricText::single(raw);
            };
            match format {
                MetricFormat::DatetimeSplit => MetricText {
                    primary: at.format("%Y-%m-%d").to_string(),
                    secondary: Some(at.format("%H:%M").to_string()),
                },
                MetricFormat::DatetimeCompact => MetricText::single(at.format("%b %-d, %H:%M").to_string()),
                _ => MetricText::single(at.format("%Y-%m-%d %H:%M").to_string()),
            }
        }
    }
}

/// One metric ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub large: bool,
    pub text: MetricText,
    pub subtitle: Option<String>,
}

impl MetricCard {
    pub fn build(config: &MetricConfig, metrics: &IndexMap<String, Value>) -> Self {
        let subtitle_key = config.subtitle_field.clone().unwrap_or_else(|| config.subtitle_key());
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            icon: config.icon.clone(),
            color: config.color.clone(),
            large: config.text_size.as_deref() != Some("small"),
            text: format_metric(metrics.get(&config.id), config.format),
            subtitle: metrics
                .get(&subtitle_key)
                .filter(|v| !v.is_null())
                .map(values::display_text)
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn ui(&self, ui: &mut Ui) {
        card_frame(ui).show(ui, |ui| {
            ui.set_min_width(140.0);
            ui.vertical(|ui| {
                let title = match &self.icon {
                    Some(icon) => format!("{} {}", icon, self.title),
                    None => self.title.clone(),
                };
                let response = ui.weak(title);
                if !self.description.is_empty() {
                    response.on_hover_text(&self.description);
                }

                let mut primary = RichText::new(&self.text.primary).strong();
                primary = primary.size(if self.large { 22.0 } else { 16.0 });
                if let Some(color) = self.color.as_deref().and_then(colors::parse_color) {
                    primary = primary.color(color);
                }
                ui.label(primary);

                if let Some(secondary) = &self.text.secondary {
                    ui.label(RichText::new(secondary).weak());
                }
                if let Some(subtitle) = &self.subtitle {
                    ui.small(subtitle);
                }
            });
        });
    }
}

/// Draw the metrics row; nothing when there are no metrics
pub fn metrics_row_ui(ui: &mut Ui, cards: &[MetricCard]) {
    if cards.is_empty() {
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for card in cards {
            card.ui(ui);
        }
    });
}

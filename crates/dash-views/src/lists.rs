//! Ranked lists shown under the chart grid

use dash_core::{values, ListConfig, ListDisplay, Row};
use dash_ui::card_frame;
use egui::{ProgressBar, RichText, Ui};

use crate::plots::utils::colors;

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub label: String,
    pub value: f64,
    /// Extra column values in declared column order
    pub extra: Vec<String>,
}

/// A list ready to draw
#[derive(Debug, Clone)]
pub struct ListView {
    pub config: ListConfig,
    pub items: Vec<ListItem>,
    /// Sum over every row, before truncation
    pub total: f64,
}

impl ListView {
    pub fn build(config: &ListConfig, rows: &[Row]) -> Self {
        let total: f64 = rows
            .iter()
            .map(|r| values::number_or_zero(r.get(&config.value_field)))
            .sum();

        let items = rows
            .iter()
            .take(config.max_items)
            .map(|row| ListItem {
                label: row.get(&config.label_field).map(values::display_text).unwrap_or_default(),
                value: values::number_or_zero(row.get(&config.value_field)),
                extra: config
                    .columns
                    .iter()
                    .flatten()
                    .map(|c| row.get(&c.field).map(values::display_text).unwrap_or_default())
                    .collect(),
            })
            .collect();

        Self {
            config: config.clone(),
            items,
            total,
        }
    }

    /// Largest shown value, the scale of progress bars
    pub fn max_value(&self) -> f64 {
        self.items.iter().map(|i| i.value).fold(0.0, f64::max)
    }

    pub fn ui(&self, ui: &mut Ui) {
        card_frame(ui).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.strong(&self.config.title);
            if !self.config.description.is_empty() {
                ui.weak(&self.config.description);
            }
            ui.add_space(4.0);

            let max = self.max_value();
            let fill = self.config.color.as_deref().and_then(colors::parse_color);

            for item in &self.items {
                match self.config.display_type {
                    ListDisplay::List => {
                        ui.horizontal(|ui| {
                            ui.label(&item.label);
                            for extra in &item.extra {
                                ui.weak(extra);
                            }
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(RichText::new(values::format_number(item.value, 2)).strong());
                            });
                        });
                    }
                    ListDisplay::ProgressBar => {
                        let fraction = if max > 0.0 { (item.value / max) as f32 } else { 0.0 };
                        let mut bar = ProgressBar::new(fraction)
                            .text(format!("{}  {}", item.label, values::format_number(item.value, 2)));
                        if let Some(color) = fill {
                            bar = bar.fill(color);
                        }
                        ui.add(bar);
                    }
                }
            }

            if self.config.show_total {
                ui.separator();
                ui.horizontal(|ui| {
                    ui.strong("Total");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.strong(values::format_number(self.total, 2));
                    });
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncates_but_totals_everything() {
        let config: ListConfig = serde_json::from_value(json!({
            "id": "top",
            "title": "Top",
            "max_items": 2,
            "show_total": true,
            "display_type": "progress_bar",
            "columns": [{ "field": "kind" }]
        }))
        .unwrap();
        let rows: Vec<Row> = serde_json::from_value(json!([
            { "label": "a", "value": 5, "kind": "x" },
            { "label": "b", "value": 3 },
            { "label": "c", "value": 2 }
        ]))
        .unwrap();

        let list = ListView::build(&config, &rows);
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.total, 10.0);
        assert_eq!(list.max_value(), 5.0);
        assert_eq!(list.items[0].extra, vec!["x".to_string()]);
        assert_eq!(list.items[1].extra, vec![String::new()]);
        assert_eq!(list.config.display_type, ListDisplay::ProgressBar);
    }
}

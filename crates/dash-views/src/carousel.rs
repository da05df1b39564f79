//! Quote carousel
//!
//! Quotes arrive as `"<speaker>: <text>"` strings. One slide is visible at a
//! time with prev/next buttons and a row of dots that jump to a slide.

use dash_core::{values, ChartHandle, ChartKey, Row};
use dash_ui::{chart_widget_id, icons};
use egui::{vec2, Align, Layout, RichText, Sense, Ui};
use serde_json::Value;

use crate::chart_view::{ChartAction, ChartView};

/// A parsed quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub speaker: String,
    pub icon: String,
    pub label: String,
    pub text: String,
}

fn speaker_style(speaker: &str) -> Option<(&'static str, &'static str)> {
    match speaker {
        "user" => Some(("👤", "User")),
        "assistant" => Some(("🤖", "Assistant")),
        _ => None,
    }
}

fn strip_matching_quotes(text: &str) -> &str {
    let text = text.trim();
    for quote in ['"', '\'', '“', '‘'] {
        let close = match quote {
            '“' => '”',
            '‘' => '’',
            q => q,
        };
        if let Some(inner) = text.strip_prefix(quote).and_then(|t| t.strip_suffix(close)) {
            return inner.trim();
        }
    }
    text
}

/// Parse `"<speaker>: <quote>"`, falling back to a generic quote with the raw text
pub fn parse_quote(raw: &str) -> Quote {
    if let Some((speaker, text)) = raw.split_once(':') {
        let speaker = speaker.trim().to_lowercase();
        if let Some((icon, label)) = speaker_style(&speaker) {
            return Quote {
                speaker,
                icon: icon.to_string(),
                label: label.to_string(),
                text: strip_matching_quotes(text).to_string(),
            };
        }
    }

    Quote {
        speaker: "quote".to_string(),
        icon: "💬".to_string(),
        label: "Quote".to_string(),
        text: raw.trim().to_string(),
    }
}

/// Cyclic slide index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
    }

    /// Jump to a slide; out-of-range indices are ignored
    pub fn go_to(&mut self, index: usize) {
        if index < self.len {
            self.current = index;
        }
    }
}

/// Quote strings from a string array or from rows with a text field
pub fn quotes_from_value(value: &Value, text_field: &str) -> Vec<Quote> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(row) => row.get(text_field).map(values::display_text),
                _ => None,
            })
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_quote(&s))
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![parse_quote(s)],
        _ => Vec::new(),
    }
}

pub fn quotes_from_rows(rows: &[Row], text_field: &str) -> Vec<Quote> {
    rows.iter()
        .filter_map(|row| row.get(text_field).map(values::display_text))
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_quote(&s))
        .collect()
}

/// Quote carousel view
pub struct QuotesView {
    key: ChartKey,
    title: String,
    quotes: Vec<Quote>,
    carousel: Carousel,
}

impl QuotesView {
    pub fn new(key: ChartKey, title: String, quotes: Vec<Quote>) -> Self {
        let carousel = Carousel::new(quotes.len());
        Self {
            key,
            title,
            quotes,
            carousel,
        }
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn current_quote(&self) -> Option<&Quote> {
        self.quotes.get(self.carousel.current())
    }
}

impl ChartHandle for QuotesView {
    fn destroy(&mut self) {
        self.quotes.clear();
        self.carousel = Carousel::new(0);
    }
}

impl ChartView for QuotesView {
    fn key(&self) -> &ChartKey {
        &self.key
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ui: &mut Ui, _actions: &mut Vec<ChartAction>) {
        let Some(quote) = self.current_quote().cloned() else {
            ui.weak("No quotes");
            return;
        };

        ui.push_id(chart_widget_id(&self.key, "carousel"), |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&quote.icon).size(18.0));
                ui.strong(&quote.label);
            });
            ui.add_space(4.0);
            ui.label(RichText::new(format!("“{}”", quote.text)).italics());
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                if ui.small_button(icons::PREV).clicked() {
                    self.carousel.prev();
                }

                let mut target = None;
                for i in 0..self.carousel.len() {
                    let (rect, response) = ui.allocate_exact_size(vec2(10.0, 10.0), Sense::click());
                    let color = if i == self.carousel.current() {
                        ui.visuals().strong_text_color()
                    } else {
                        ui.visuals().weak_text_color()
                    };
                    ui.painter().circle_filled(rect.center(), 3.5, color);
                    if response.clicked() {
                        target = Some(i);
                    }
                }
                if let Some(i) = target {
                    self.carousel.go_to(i);
                }

                if ui.small_button(icons::NEXT).clicked() {
                    self.carousel.next();
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.weak(format!("{} / {}", self.carousel.current() + 1, self.carousel.len()));
                });
            });
        });
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

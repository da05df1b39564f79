use egui::{Color32, Context, FontFamily, FontId, Frame, Margin, Rounding, Stroke, Style, TextStyle, Ui, Visuals};
use std::collections::BTreeMap;

/// Theme configuration
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Dashboard Dark".to_string(),
            dark_mode: true,
        }
    }
}

/// Apply the dashboard theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { Visuals::dark() } else { Visuals::light() };

    let accent = accent_color();

    if theme.dark_mode {
        let bg_color = Color32::from_rgb(17, 24, 39);
        let panel_bg = Color32::from_rgb(24, 32, 48);
        let widget_bg = Color32::from_rgb(31, 41, 55);

        visuals.window_fill = panel_bg;
        visuals.panel_fill = bg_color;
        visuals.extreme_bg_color = bg_color;
        visuals.faint_bg_color = widget_bg;

        visuals.widgets.noninteractive.bg_fill = panel_bg;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(55, 65, 81));
        visuals.widgets.inactive.bg_fill = widget_bg;
        visuals.widgets.hovered.bg_fill = Color32::from_rgb(55, 65, 81);
    }

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(6.0);
    }
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent);

    // Selection and highlighting
    visuals.selection.bg_fill = accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    // Font sizes
    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(20.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
    tracing::debug!("Applied theme '{}'", theme.name);
}

/// Get the accent color for the theme
pub fn accent_color() -> Color32 {
    Color32::from_rgb(59, 130, 246)
}

/// Get the error color for the theme
pub fn error_color() -> Color32 {
    Color32::from_rgb(239, 68, 68)
}

/// Get the warning color for the theme
pub fn warning_color() -> Color32 {
    Color32::from_rgb(245, 158, 11)
}

/// Get the success color for the theme
pub fn success_color() -> Color32 {
    Color32::from_rgb(16, 185, 129)
}

/// Frame around one chart, metric or list card
pub fn card_frame(ui: &Ui) -> Frame {
    let visuals = ui.visuals();
    Frame::none()
        .fill(visuals.window_fill)
        .stroke(visuals.widgets.noninteractive.bg_stroke)
        .rounding(8.0)
        .inner_margin(Margin::same(12.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

/// Full-width status banner used for loading, empty and failure states
pub fn status_message(ui: &mut Ui, kind: StatusKind, text: &str) {
    let (color, icon) = match kind {
        StatusKind::Info => (accent_color(), crate::icons::INFO),
        StatusKind::Warning => (warning_color(), crate::icons::WARNING),
        StatusKind::Error => (error_color(), crate::icons::WARNING),
    };

    Frame::none()
        .fill(color.linear_multiply(0.15))
        .stroke(Stroke::new(1.0, color))
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(icon).color(color));
                ui.label(text);
            });
        });
}

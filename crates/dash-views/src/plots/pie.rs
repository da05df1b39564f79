//! Pie and doughnut charts painted directly with the egui painter

use std::f32::consts::{FRAC_PI_2, TAU};

use egui::{vec2, Align2, Color32, Pos2, Rect, Sense, Shape, Stroke, TextStyle, Ui, Vec2};

/// One slice with its resolved color
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: Color32,
    pub description: Option<String>,
}

/// `(start, end)` angle of each slice in radians, clockwise from 12 o'clock.
///
/// Non-positive values get an empty span.
pub fn slice_angles(values: &[f64]) -> Vec<(f32, f32)> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let mut start = -FRAC_PI_2;
    values
        .iter()
        .map(|v| {
            let sweep = if total > 0.0 && *v > 0.0 { (*v / total) as f32 * TAU } else { 0.0 };
            let span = (start, start + sweep);
            start += sweep;
            span
        })
        .collect()
}

/// Slice under `pos`, honouring the doughnut hole
pub fn slice_at(angles: &[(f32, f32)], center: Pos2, inner: f32, outer: f32, pos: Pos2) -> Option<usize> {
    let delta = pos - center;
    let distance = delta.length();
    if distance < inner || distance > outer {
        return None;
    }

    let mut angle = delta.y.atan2(delta.x);
    if angle < -FRAC_PI_2 {
        angle += TAU;
    }
    angles.iter().position(|(start, end)| angle >= *start && angle < *end)
}

fn paint_arc(painter: &egui::Painter, center: Pos2, inner: f32, outer: f32, start: f32, end: f32, fill: Color32) {
    let segments = (((end - start).to_degrees() / 3.0).ceil() as usize).max(1);
    let point = |radius: f32, angle: f32| center + vec2(radius * angle.cos(), radius * angle.sin());

    for i in 0..segments {
        let a0 = start + (end - start) * (i as f32 / segments as f32);
        let a1 = start + (end - start) * ((i + 1) as f32 / segments as f32);
        let quad = if inner > 0.0 {
            vec![point(inner, a0), point(outer, a0), point(outer, a1), point(inner, a1)]
        } else {
            vec![center, point(outer, a0), point(outer, a1)]
        };
        painter.add(Shape::convex_polygon(quad, fill, Stroke::NONE));
    }
}

/// Draw a pie (or doughnut when `cutout > 0`) with a legend underneath
pub fn pie_ui(ui: &mut Ui, slices: &[PieSlice], cutout: f32, show_percentages: bool, height: f32) {
    let values: Vec<f64> = slices.iter().map(|s| s.value).collect();
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let angles = slice_angles(&values);

    let size = vec2(ui.available_width(), height);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let center = rect.center();
    let outer = (rect.width().min(rect.height()) / 2.0 - 4.0).max(1.0);
    let inner = outer * cutout.clamp(0.0, 0.95);

    let hovered = response
        .hover_pos()
        .and_then(|pos| slice_at(&angles, center, inner, outer, pos));

    for (i, (slice, (start, end))) in slices.iter().zip(&angles).enumerate() {
        if end <= start {
            continue;
        }
        let radius = if hovered == Some(i) { outer + 3.0 } else { outer };
        paint_arc(&painter, center, inner, radius, *start, *end, slice.color);

        if show_percentages && total > 0.0 {
            let share = slice.value / total * 100.0;
            if share >= 5.0 {
                let mid = (start + end) / 2.0;
                let label_radius = (inner + outer) / 2.0;
                painter.text(
                    center + vec2(label_radius * mid.cos(), label_radius * mid.sin()),
                    Align2::CENTER_CENTER,
                    format!("{:.1}%", share),
                    TextStyle::Small.resolve(ui.style()),
                    Color32::WHITE,
                );
            }
        }
    }

    if let Some(slice) = hovered.and_then(|i| slices.get(i)) {
        let share = if total > 0.0 { slice.value / total * 100.0 } else { 0.0 };
        let mut text = format!(
            "{}: {} ({:.1}%)",
            slice.label,
            dash_core::values::format_number(slice.value, 2),
            share
        );
        if let Some(description) = &slice.description {
            text.push('\n');
            text.push_str(description);
        }
        response.on_hover_text_at_pointer(text);
    }

    legend_ui(ui, slices);
}

fn legend_ui(ui: &mut Ui, slices: &[PieSlice]) {
    ui.horizontal_wrapped(|ui| {
        for slice in slices {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
            ui.painter()
                .rect_filled(Rect::from_center_size(rect.center(), Vec2::splat(10.0)), 2.0, slice.color);
            ui.small(&slice.label);
            ui.add_space(6.0);
        }
    });
}

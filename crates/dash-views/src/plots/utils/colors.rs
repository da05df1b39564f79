//! Color utilities for plots

use egui::Color32;

/// Fallback series color (`#3b82f6`)
pub const DEFAULT_COLOR: Color32 = Color32::from_rgb(59, 130, 246);

/// Get a categorical color from the Tableau 10 palette
pub fn categorical_color(index: usize) -> Color32 {
    let scheme = colorous::TABLEAU10;
    let c = scheme[index % scheme.len()];
    Color32::from_rgb(c.r, c.g, c.b)
}

/// Parse a CSS-style color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)` or `rgba(..)`
pub fn parse_color(raw: &str) -> Option<Color32> {
    let raw = raw.trim();

    if let Some(hex) = raw.strip_prefix('#') {
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return match hex.len() {
            3 => Some(Color32::from_rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
            6 => Some(Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color32::from_rgba_unmultiplied(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        };
    }

    let lower = raw.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    let alpha = match parts.get(3) {
        Some(a) => (a.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
        None => 255,
    };
    Some(Color32::from_rgba_unmultiplied(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

/// Same hue at the given opacity in `[0, 1]`
pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Color for a category: explicit mapping first, then the palette
pub fn category_color(colors: &indexmap::IndexMap<String, String>, label: &str, index: usize) -> Color32 {
    colors
        .get(label)
        .and_then(|c| parse_color(c))
        .unwrap_or_else(|| categorical_color(index))
}

//! Hex color parsing for link colors

use anyhow::{Context, Result};
use ratatui::style::Color;

/// Parse a CSS hex color to RGB Color
///
/// Accepts "#RRGGBB", "RRGGBB" and the short "#RGB" form.
pub fn hex_to_color(hex: &str) -> Result<Color> {
    let hex = hex.trim().trim_start_matches('#');

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        len => anyhow::bail!("Invalid hex color format: expected 3 or 6 characters, got {}", len),
    };

    let component = |range: std::ops::Range<usize>, name: &str| {
        u8::from_str_radix(&expanded[range], 16).with_context(|| format!("Failed to parse {} component", name))
    };

    Ok(Color::Rgb(component(0..2, "red")?, component(2..4, "green")?, component(4..6, "blue")?))
}

/// Like [`hex_to_color`] but falls back to `fallback` on malformed input
pub fn hex_or(hex: &str, fallback: Color) -> Color {
    hex_to_color(hex).unwrap_or(fallback)
}

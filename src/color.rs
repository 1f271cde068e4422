use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::table::CLASS_COLUMNS;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// One colour per output class, in [`CLASS_COLUMNS`] order.
pub fn class_colors() -> [Color32; CLASS_COLUMNS.len()] {
    let palette = generate_palette(CLASS_COLUMNS.len());
    [palette[0], palette[1], palette[2]]
}

use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed chart colours
// ---------------------------------------------------------------------------

pub const OFFENDER_AGE: Color32 = Color32::from_rgb(255, 192, 203); // pink
pub const VICTIM_AGE: Color32 = Color32::from_rgb(173, 216, 230); // light blue
pub const BAR_OUTLINE: Color32 = Color32::BLACK;

/// First / second slice of the donut charts.
pub const SPLIT: [Color32; 2] = [
    Color32::from_rgb(0x4C, 0xAF, 0x50),
    Color32::from_rgb(0xCD, 0x5C, 0x5C),
];
pub const DONUT_BACKGROUND: Color32 = Color32::BLACK;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Qualitative palettes used by the categorical charts.  Each one is a ring
/// of evenly spaced hues with its own starting hue, saturation and lightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKind {
    Pastel,
    Prism,
    Set2,
    Set3,
}

impl PaletteKind {
    fn params(self) -> (f32, f32, f32) {
        match self {
            PaletteKind::Pastel => (200.0, 0.60, 0.78),
            PaletteKind::Prism => (330.0, 0.70, 0.40),
            PaletteKind::Set2 => (160.0, 0.45, 0.62),
            PaletteKind::Set3 => (50.0, 0.55, 0.75),
        }
    }

    pub fn colors(self, n: usize) -> Vec<Color32> {
        let (offset, saturation, lightness) = self.params();
        generate_palette(n, offset, saturation, lightness)
    }
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize, hue_offset: f32, saturation: f32, lightness: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (hue_offset + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, saturation, lightness);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the values shown in one chart to distinct colours.  Values are
/// coloured in sorted order so a value keeps its colour when counts change.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(values: impl IntoIterator<Item = &'a str>, kind: PaletteKind) -> Self {
        let mut values: Vec<&str> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();

        let palette = kind.colors(values.len());
        let mapping = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

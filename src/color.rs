use std::collections::BTreeMap;

use eframe::egui::{self, Color32};
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Brand palette
// ---------------------------------------------------------------------------

/// The fixed SIX brand palette, in chart assignment order.
pub const SIX_PALETTE: [Color32; 11] = [
    Color32::from_rgb(0xF7, 0xDF, 0x0E),
    Color32::from_rgb(0xFF, 0xF4, 0x8B),
    Color32::from_rgb(0xFF, 0xF9, 0xC4),
    Color32::from_rgb(0xFF, 0xFD, 0xE7),
    Color32::from_rgb(0xC6, 0xB8, 0x0B),
    Color32::from_rgb(0x9B, 0x91, 0x08),
    Color32::from_rgb(0x9E, 0x93, 0x1D),
    Color32::from_rgb(0x3C, 0x52, 0xFF),
    Color32::from_rgb(0x73, 0x83, 0xFF),
    Color32::from_rgb(0x0E, 0xF7, 0xA0),
    Color32::from_rgb(0xF7, 0x0E, 0xCC),
];

pub const PRIMARY: Color32 = Color32::from_rgb(0xF7, 0xDF, 0x0E);
pub const ACCENT: Color32 = Color32::from_rgb(0xFF, 0xD7, 0x00);
pub const PIE_CURRENT: Color32 = Color32::from_rgb(0x3C, 0x52, 0xFF);
pub const PIE_DELINQUENT: Color32 = Color32::from_rgb(0xF7, 0x0E, 0xCC);

/// Generates `n` visually distinct colours using evenly spaced hues, for the
/// overflow case when there are more categories than brand colours.
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

/// First `n` chart colours: the brand palette, extended with generated hues
/// once it runs out.
pub fn chart_palette(n: usize) -> Vec<Color32> {
    let mut colors: Vec<Color32> = SIX_PALETTE.iter().copied().take(n).collect();
    if n > SIX_PALETTE.len() {
        colors.extend(generate_palette(n - SIX_PALETTE.len()));
    }
    colors
}

// ---------------------------------------------------------------------------
// Color mapping: unit → Color32
// ---------------------------------------------------------------------------

/// Maps each business unit to a stable chart colour.
#[derive(Debug, Clone, Default)]
pub struct UnitColors {
    mapping: BTreeMap<String, Color32>,
}

impl UnitColors {
    /// Assign palette colours to units in their sorted order.
    pub fn new(units: &[String]) -> Self {
        let palette = chart_palette(units.len());
        let mapping = units
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();
        UnitColors { mapping }
    }

    pub fn color_for(&self, unit: &str) -> Color32 {
        self.mapping.get(unit).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Dark theme with brand-yellow accents, applied once at startup.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.hyperlink_color = PRIMARY;
    visuals.selection.bg_fill = PRIMARY.linear_multiply(0.4);
    visuals.widgets.hovered.fg_stroke.color = ACCENT;
    visuals.widgets.active.fg_stroke.color = PRIMARY;
    ctx.set_visuals(visuals);
}

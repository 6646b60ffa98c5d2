use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Feature;

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

/// Fixed line colour per indicator so charts stay consistent across pages.
pub fn feature_color(feature: Feature) -> Color32 {
    let palette = generate_palette(Feature::ALL.len());
    Feature::ALL
        .iter()
        .position(|f| *f == feature)
        .and_then(|i| palette.get(i).copied())
        .unwrap_or(Color32::LIGHT_BLUE)
}

// ---------------------------------------------------------------------------
// Status colours: category → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct status values of a table to distinct colours.
#[derive(Debug, Clone)]
pub struct StatusColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl StatusColors {
    pub fn new(statuses: &BTreeSet<String>) -> Self {
        let palette = generate_palette(statuses.len());
        let mapping = statuses.iter().cloned().zip(palette).collect();
        StatusColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, status: &str) -> Color32 {
        self.mapping
            .get(status)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        let unique: BTreeSet<_> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 6);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_status_is_grey() {
        let statuses: BTreeSet<String> = ["Normal", "Upwelling"].map(String::from).into();
        let colors = StatusColors::new(&statuses);
        assert_ne!(colors.color_for("Normal"), colors.color_for("Upwelling"));
        assert_eq!(colors.color_for("?"), Color32::GRAY);
    }
}

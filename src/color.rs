use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

pub const PROFIT_GREEN: Color32 = Color32::from_rgb(46, 160, 67);
pub const LOSS_RED: Color32 = Color32::from_rgb(214, 57, 57);

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

/// Green for a profit, red for a loss.
pub fn profit_color(value: f64) -> Color32 {
    if value >= 0.0 {
        PROFIT_GREEN
    } else {
        LOSS_RED
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of one categorical column (markets, tiers) to distinct
/// colours, stable for the whole session.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(labels: &BTreeSet<String>) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        assert!(generate_palette(0).is_empty());
        let colours = generate_palette(3);
        assert_eq!(colours.len(), 3);
        assert_ne!(colours[0], colours[1]);
        assert_ne!(colours[1], colours[2]);
    }

    #[test]
    fn unknown_labels_fall_back_to_grey() {
        let labels: BTreeSet<String> = ["Away", "Draw", "Home"].iter().map(|s| s.to_string()).collect();
        let map = ColorMap::new(&labels);
        assert_ne!(map.color_for("Home"), map.color_for("Away"));
        assert_eq!(map.color_for("Over 2.5"), Color32::GRAY);
    }

    #[test]
    fn profit_sign_picks_colour() {
        assert_eq!(profit_color(0.5), PROFIT_GREEN);
        assert_eq!(profit_color(-0.01), LOSS_RED);
    }
}

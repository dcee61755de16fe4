use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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

// ---------------------------------------------------------------------------
// Entity colours: one distinct colour per compared entity
// ---------------------------------------------------------------------------

/// Stable entity → colour assignment for comparison charts.
#[derive(Debug, Clone, Default)]
pub struct EntityColors {
    mapping: BTreeMap<String, Color32>,
}

impl EntityColors {
    /// Assign colours in the given entity order.
    pub fn new(entities: &[String]) -> Self {
        let mapping = entities
            .iter()
            .cloned()
            .zip(generate_palette(entities.len()))
            .collect();
        EntityColors { mapping }
    }

    pub fn color_for(&self, entity: &str) -> Color32 {
        self.mapping
            .get(entity)
            .copied()
            .unwrap_or(Color32::LIGHT_BLUE)
    }
}

// ---------------------------------------------------------------------------
// Flight counts: quantized light-to-dark orange
// ---------------------------------------------------------------------------

const FLIGHT_STEPS: [[u8; 3]; 14] = [
    [0xff, 0xe0, 0xcc],
    [0xff, 0xd1, 0xb3],
    [0xff, 0xb3, 0x80],
    [0xff, 0xa3, 0x66],
    [0xff, 0x94, 0x4d],
    [0xff, 0x85, 0x33],
    [0xff, 0x75, 0x1a],
    [0xff, 0x66, 0x00],
    [0xe6, 0x5c, 0x00],
    [0xcc, 0x52, 0x00],
    [0xb3, 0x47, 0x00],
    [0x99, 0x3d, 0x00],
    [0x80, 0x33, 0x00],
    [0x99, 0x00, 0x00],
];

/// Splits `[0, max]` into equal buckets, one colour per bucket.
#[derive(Debug, Clone, Copy)]
pub struct FlightScale {
    max: f64,
}

impl FlightScale {
    pub fn new(max: u64) -> Self {
        Self { max: max as f64 }
    }

    pub fn color_for(&self, flights: u64) -> Color32 {
        let steps = FLIGHT_STEPS.len();
        let idx = if self.max <= 0.0 {
            0
        } else {
            ((flights as f64 / self.max) * steps as f64).floor() as usize
        };
        let [r, g, b] = FLIGHT_STEPS[idx.min(steps - 1)];
        Color32::from_rgb(r, g, b)
    }
}

// ---------------------------------------------------------------------------
// Ratio vs 2019: diverging red → white → blue, centred on 1.0
// ---------------------------------------------------------------------------

const RATIO_LOW: [u8; 3] = [0xb2, 0x18, 0x2b];
const RATIO_MID: [u8; 3] = [0xf7, 0xf7, 0xf7];
const RATIO_HIGH: [u8; 3] = [0x21, 0x66, 0xac];

/// Diverging scale over `[min, 1.0, max]`: below 2019 is red, above is blue.
#[derive(Debug, Clone, Copy)]
pub struct RatioScale {
    min: f64,
    max: f64,
}

impl RatioScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Position of `ratio` on the scale, 0.0 (min) .. 0.5 (parity) .. 1.0 (max).
    pub fn position(&self, ratio: f64) -> f64 {
        let t = if ratio < 1.0 {
            let span = 1.0 - self.min;
            if span <= 0.0 {
                0.5
            } else {
                0.5 * (ratio - self.min) / span
            }
        } else {
            let span = self.max - 1.0;
            if span <= 0.0 {
                0.5
            } else {
                0.5 + 0.5 * (ratio - 1.0) / span
            }
        };
        t.clamp(0.0, 1.0)
    }

    pub fn color_for(&self, ratio: f64) -> Color32 {
        let t = self.position(ratio) as f32;
        let (from, to, f) = if t < 0.5 {
            (RATIO_LOW, RATIO_MID, t * 2.0)
        } else {
            (RATIO_MID, RATIO_HIGH, (t - 0.5) * 2.0)
        };
        let mixed = linear(from).mix(linear(to), f);
        let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }
}

fn linear([r, g, b]: [u8; 3]) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
    }

    #[test]
    fn entity_colors_fall_back_for_unknown() {
        let colors = EntityColors::new(&["Spain".to_string(), "Italy".to_string()]);
        assert_ne!(colors.color_for("Spain"), colors.color_for("Italy"));
        assert_eq!(colors.color_for("Malta"), Color32::LIGHT_BLUE);
    }

    #[test]
    fn flight_scale_buckets() {
        let scale = FlightScale::new(1400);
        assert_eq!(scale.color_for(0), Color32::from_rgb(0xff, 0xe0, 0xcc));
        assert_eq!(scale.color_for(1400), Color32::from_rgb(0x99, 0x00, 0x00));
        assert_eq!(scale.color_for(150), Color32::from_rgb(0xff, 0xd1, 0xb3));
        assert_eq!(FlightScale::new(0).color_for(5), Color32::from_rgb(0xff, 0xe0, 0xcc));
    }

    #[test]
    fn ratio_scale_is_centred_on_parity() {
        let scale = RatioScale::new(0.2, 1.6);
        assert_eq!(scale.position(1.0), 0.5);
        assert_eq!(scale.position(0.2), 0.0);
        assert_eq!(scale.position(1.6), 1.0);
        assert_eq!(scale.position(5.0), 1.0);
        assert!((scale.position(0.6) - 0.25).abs() < 1e-9);

        let parity = scale.color_for(1.0);
        assert!(parity.r() > 0xf0 && parity.g() > 0xf0 && parity.b() > 0xf0);
        let low = scale.color_for(0.2);
        assert!(low.r() > low.b());
        let high = scale.color_for(1.6);
        assert!(high.b() > high.r());
    }

    #[test]
    fn degenerate_domain_stays_at_parity() {
        let scale = RatioScale::new(1.0, 1.0);
        assert_eq!(scale.position(0.5), 0.5);
        assert_eq!(scale.position(2.0), 0.5);
    }
}

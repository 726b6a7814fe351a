use eframe::egui::Color32;
use palette::{named, Hsl, IntoColor, Mix, Srgb};

use crate::data::model::SeismicRisk;

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Parse a `#RRGGBB` (or `#RGB`) string.
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let rgb: Srgb<u8> = hex.trim().parse().ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// Same colour with the given opacity in `[0, 1]`.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

/// Discrete colour per risk category, used by the slip-rate chart.
pub fn risk_color(risk: SeismicRisk) -> Color32 {
    match risk {
        SeismicRisk::Low => Color32::from_rgb(0x2E, 0xCC, 0x71),
        SeismicRisk::Moderate => Color32::from_rgb(0x34, 0x98, 0xDB),
        SeismicRisk::ModerateToHigh => Color32::from_rgb(0x9B, 0x59, 0xB6),
        SeismicRisk::High => Color32::from_rgb(0xF3, 0x9C, 0x12),
        SeismicRisk::VeryHigh => Color32::from_rgb(0xE7, 0x4C, 0x3C),
    }
}

// ---------------------------------------------------------------------------
// ColorScale – linear interpolation between colour stops
// ---------------------------------------------------------------------------

/// Maps a value in `[vmin, vmax]` onto a piecewise-linear gradient.
///
/// Stop positions are normalised to `[0, 1]`; values outside the domain
/// clamp to the end colours.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<(f32, Srgb)>,
    vmin: f64,
    vmax: f64,
}

impl ColorScale {
    /// Evenly spaced stops over `[vmin, vmax]`.
    pub fn evenly_spaced(colors: &[Srgb], vmin: f64, vmax: f64) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f32;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, c)| (i as f32 / last, *c))
            .collect();
        ColorScale { stops, vmin, vmax }
    }

    /// Stops at explicit positions in `[0, 1]`, given in ascending order.
    pub fn with_positions(stops: &[(f32, Srgb)], vmin: f64, vmax: f64) -> Self {
        ColorScale {
            stops: stops.to_vec(),
            vmin,
            vmax,
        }
    }

    pub fn vmin(&self) -> f64 {
        self.vmin
    }

    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    /// `(position, colour)` pairs for legends and renderers.
    pub fn stops(&self) -> Vec<(f32, Color32)> {
        self.stops
            .iter()
            .map(|(pos, c)| (*pos, to_color32(*c)))
            .collect()
    }

    /// Colour for `value`.
    pub fn color_at(&self, value: f64) -> Color32 {
        let Some(&(first_pos, first)) = self.stops.first() else {
            return Color32::GRAY;
        };
        let span = self.vmax - self.vmin;
        let t = if span > 0.0 && value.is_finite() {
            ((value - self.vmin) / span).clamp(0.0, 1.0) as f32
        } else {
            0.0
        };
        if t <= first_pos {
            return to_color32(first);
        }
        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if t <= p1 {
                let local = if p1 > p0 { (t - p0) / (p1 - p0) } else { 1.0 };
                return to_color32(c0.mix(c1, local));
            }
        }
        let (_, last) = self.stops[self.stops.len() - 1];
        to_color32(last)
    }
}

fn srgb(c: Srgb<u8>) -> Srgb {
    c.into_format()
}

/// Yellow → orange → red over the filtered magnitude range.
///
/// A single-valued range falls back to a two-colour yellow → red scale
/// widened by 0.1 on each side, so there is never a zero-width domain.
pub fn magnitude_gradient(min: f64, max: f64) -> ColorScale {
    if min == max {
        ColorScale::evenly_spaced(
            &[srgb(named::YELLOW), srgb(named::RED)],
            min - 0.1,
            max + 0.1,
        )
    } else {
        ColorScale::evenly_spaced(
            &[srgb(named::YELLOW), srgb(named::ORANGE), srgb(named::RED)],
            min,
            max,
        )
    }
}

/// Blue → lime → yellow → orange → red density gradient for the heatmap,
/// over normalised intensity `[0, 1]`.
pub fn heat_gradient() -> ColorScale {
    ColorScale::with_positions(
        &[
            (0.1, srgb(named::BLUE)),
            (0.3, srgb(named::LIME)),
            (0.5, srgb(named::YELLOW)),
            (0.7, srgb(named::ORANGE)),
            (1.0, srgb(named::RED)),
        ],
        0.0,
        1.0,
    )
}

/// Sequential orange-red scale used by the earthquake timeline.
pub fn orange_red_scale(vmin: f64, vmax: f64) -> ColorScale {
    const ORRD: [u32; 9] = [
        0xfff7ec, 0xfee8c8, 0xfdd49e, 0xfdbb84, 0xfc8d59, 0xef6548, 0xd7301f, 0xb30000, 0x7f0000,
    ];
    let colors: Vec<Srgb> = ORRD
        .iter()
        .map(|&hex| srgb(Srgb::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)))
        .collect();
    ColorScale::evenly_spaced(&colors, vmin, vmax)
}

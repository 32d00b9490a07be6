//! Color space conversion utilities
//!
//! Provides the conversions the detection pipeline needs:
//! - RGB (0-255) to HSV (hue in degrees, saturation/value in percent)
//! - HSV back to RGB for round-trip checks
//! - A luma/chroma approximation used only by learned-model features
//! - Hex color representation
//! - An optional 3x3 calibration matrix applied to single pixels

use palette::{FromColor, Hsv as PaletteHsv, Srgb};
use serde::{Deserialize, Serialize};

/// A sampled pixel or cluster centroid. Channels are in [0, 255] but kept as
/// floating point so centroids can carry fractional means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pixel {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64, g as f64, b as f64)
    }

    pub fn distance_squared(&self, other: &Pixel) -> f64 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        dr * dr + dg * dg + db * db
    }

    /// Euclidean distance in RGB space
    pub fn distance(&self, other: &Pixel) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Channels truncated toward zero and clamped into the byte range
    pub fn to_u8(&self) -> (u8, u8, u8) {
        (truncate_channel(self.r), truncate_channel(self.g), truncate_channel(self.b))
    }

    pub fn to_hsv(&self) -> Hsv {
        rgb_to_hsv(self.r, self.g, self.b)
    }

    /// Hex color string (e.g., "#FF0000")
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_u8();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Arithmetic mean of a pixel set, `None` when empty
    pub fn mean(pixels: &[Pixel]) -> Option<Pixel> {
        if pixels.is_empty() {
            return None;
        }
        let n = pixels.len() as f64;
        let (r, g, b) = pixels
            .iter()
            .fold((0.0, 0.0, 0.0), |(r, g, b), p| (r + p.r, g + p.g, b + p.b));
        Some(Pixel::new(r / n, g / n, b / n))
    }
}

fn truncate_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.trunc().clamp(0.0, 255.0) as u8
}

/// HSV triple: hue in degrees [0, 360), saturation and value in percent [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }
}

/// Convert RGB (0-255) to HSV
///
/// Uses the max-channel piecewise hue definition. Achromatic input (max == min)
/// yields hue 0 and saturation 0; black yields all zeros. Never fails.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> Hsv {
    let r_norm = r / 255.0;
    let g_norm = g / 255.0;
    let b_norm = b / 255.0;

    let max = r_norm.max(g_norm).max(b_norm);
    let min = r_norm.min(g_norm).min(b_norm);
    let delta = max - min;

    let mut hue = if delta == 0.0 || !delta.is_finite() {
        0.0
    } else if max == r_norm {
        60.0 * (((g_norm - b_norm) / delta) % 6.0)
    } else if max == g_norm {
        60.0 * (((b_norm - r_norm) / delta) + 2.0)
    } else {
        60.0 * (((r_norm - g_norm) / delta) + 4.0)
    };
    if hue < 0.0 {
        hue += 360.0;
    }
    // a tiny negative hue can round up to exactly 360 after wrapping
    if hue >= 360.0 {
        hue -= 360.0;
    }

    let saturation = if max <= 0.0 || !max.is_finite() {
        0.0
    } else {
        (delta / max) * 100.0
    };
    let value = if max.is_finite() { max * 100.0 } else { 0.0 };

    Hsv::new(hue, saturation.clamp(0.0, 100.0), value.clamp(0.0, 100.0))
}

/// Convert HSV (degrees / percent) back to RGB (0-255)
pub fn hsv_to_rgb(hsv: Hsv) -> Pixel {
    let color: PaletteHsv<palette::encoding::Srgb, f64> = PaletteHsv::new(
        hsv.h,
        (hsv.s / 100.0).clamp(0.0, 1.0),
        (hsv.v / 100.0).clamp(0.0, 1.0),
    );
    let rgb: Srgb<f64> = Srgb::from_color(color);
    Pixel::new(rgb.red * 255.0, rgb.green * 255.0, rgb.blue * 255.0)
}

/// Approximate perceptual lightness plus two chroma-like difference terms
///
/// Not CIE Lab: a luma-weighted lightness and half-differences of the
/// normalized channels. Only the learned feature path consumes this.
pub fn rgb_to_lab_approximation(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let r_norm = r / 255.0;
    let g_norm = g / 255.0;
    let b_norm = b / 255.0;

    let l = 0.2126 * r_norm + 0.7152 * g_norm + 0.0722 * b_norm;
    let a = (r_norm - g_norm) * 0.5;
    let b_lab = (g_norm - b_norm) * 0.5;

    (l, a, b_lab)
}

/// Linear 3x3 channel calibration
///
/// `out[i] = sum_j in[j] * m[j][i]`, clamped to [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationMatrix(pub [[f64; 3]; 3]);

impl CalibrationMatrix {
    pub const IDENTITY: CalibrationMatrix =
        CalibrationMatrix([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    pub fn apply(&self, pixel: Pixel) -> Pixel {
        let input = [pixel.r, pixel.g, pixel.b];
        let mut out = [0.0; 3];
        for (i, channel) in out.iter_mut().enumerate() {
            for (j, value) in input.iter().enumerate() {
                *channel += value * self.0[j][i];
            }
        }
        Pixel::new(
            out[0].clamp(0.0, 255.0),
            out[1].clamp(0.0, 255.0),
            out[2].clamp(0.0, 255.0),
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for CalibrationMatrix {
    /// Mild camera correction: slight channel gain with small cross-talk removal
    fn default() -> Self {
        CalibrationMatrix([
            [1.02, -0.01, 0.01],
            [-0.01, 1.03, -0.01],
            [0.01, -0.01, 1.02],
        ])
    }
}

use std::fs;
use std::path::Path;

use crate::core::color::{rgb_to_hsv, rgb_to_lab_approximation, Pixel};
use crate::error::{ColorError, Result};

/// Number of engineered features per color
pub const FEATURE_COUNT: usize = 15;

/// Build the 15-feature vector the classifier was trained on
///
/// Layout: normalized RGB (3), normalized HSV (3), lab approximation (3),
/// channel ratios (3), brightness and contrast (2), dominant channel (1).
pub fn engineer_features(pixel: Pixel) -> [f32; FEATURE_COUNT] {
    let r = pixel.r as f32;
    let g = pixel.g as f32;
    let b = pixel.b as f32;

    let hsv = rgb_to_hsv(pixel.r, pixel.g, pixel.b);
    let (l, a, b_lab) = rgb_to_lab_approximation(pixel.r, pixel.g, pixel.b);

    let total = r + g + b + 1.0;

    let brightness = (r + g + b) / 3.0;
    let contrast = (((r - brightness).powi(2) + (g - brightness).powi(2) + (b - brightness).powi(2)) / 3.0).sqrt();

    let dominant_channel = if r >= g && r >= b {
        0.0
    } else if g >= r && g >= b {
        1.0
    } else {
        2.0
    };

    [
        r / 255.0,
        g / 255.0,
        b / 255.0,
        hsv.h as f32 / 360.0,
        hsv.s as f32 / 100.0,
        hsv.v as f32 / 100.0,
        l as f32,
        a as f32,
        b_lab as f32,
        r / total,
        g / total,
        b / total,
        brightness / 255.0,
        contrast / 255.0,
        dominant_channel / 2.0,
    ]
}

/// Per-feature standardization parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScaler {
    means: Vec<f32>,
    stds: Vec<f32>,
}

impl Default for FeatureScaler {
    fn default() -> Self {
        Self {
            means: vec![0.5; FEATURE_COUNT],
            stds: vec![0.5; FEATURE_COUNT],
        }
    }
}

impl FeatureScaler {
    pub fn new(means: Vec<f32>, stds: Vec<f32>) -> Result<Self> {
        if means.len() != stds.len() {
            return Err(ColorError::model(format!(
                "scaler has {} means but {} standard deviations",
                means.len(),
                stds.len()
            )));
        }
        Ok(Self { means, stds })
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Parse the three-line text format: means CSV, stds CSV, feature count
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if lines.len() < 3 {
            return Err(ColorError::model(format!(
                "normalization params need 3 lines, found {}",
                lines.len()
            )));
        }

        let means = parse_csv(lines[0])?;
        let stds = parse_csv(lines[1])?;
        let count: usize = lines[2]
            .parse()
            .map_err(|e| ColorError::model(format!("invalid feature count {:?}: {}", lines[2], e)))?;

        if means.len() != count || stds.len() != count {
            return Err(ColorError::model(format!(
                "feature count {} does not match {} means / {} stds",
                count,
                means.len(),
                stds.len()
            )));
        }

        Self::new(means, stds)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Standardize features in place. Zero deviations only center the value.
    pub fn transform(&self, features: &mut [f32]) -> Result<()> {
        if features.len() != self.means.len() {
            return Err(ColorError::model(format!(
                "expected {} features, got {}",
                self.means.len(),
                features.len()
            )));
        }
        for ((value, mean), std) in features.iter_mut().zip(&self.means).zip(&self.stds) {
            *value -= mean;
            if std.abs() > f32::EPSILON {
                *value /= std;
            }
        }
        Ok(())
    }
}

fn parse_csv(line: &str) -> Result<Vec<f32>> {
    line.split(',')
        .map(|field| {
            field
                .trim()
                .parse::<f32>()
                .map_err(|e| ColorError::model(format!("invalid number {:?}: {}", field.trim(), e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_for_red() {
        let f = engineer_features(Pixel::new(255.0, 0.0, 0.0));
        assert_eq!(f.len(), FEATURE_COUNT);
        assert_eq!(f[0], 1.0);
        assert_eq!(f[1], 0.0);
        assert_eq!(f[3], 0.0); // hue
        assert_eq!(f[4], 1.0); // saturation
        assert!((f[9] - 255.0 / 256.0).abs() < 1e-6);
        assert!((f[12] - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(f[14], 0.0);
    }

    #[test]
    fn test_dominant_channel_feature() {
        assert_eq!(engineer_features(Pixel::new(0.0, 200.0, 10.0))[14], 0.5);
        assert_eq!(engineer_features(Pixel::new(0.0, 10.0, 200.0))[14], 1.0);
    }

    #[test]
    fn test_gray_has_zero_contrast() {
        let f = engineer_features(Pixel::new(90.0, 90.0, 90.0));
        assert_eq!(f[13], 0.0);
    }

    #[test]
    fn test_scaler_parse() {
        let text = "0.1, 0.2\n0.5,0.5\n\n2\n";
        let scaler = FeatureScaler::parse(text).unwrap();
        assert_eq!(scaler.len(), 2);

        let mut features = [0.6, 0.2];
        scaler.transform(&mut features).unwrap();
        assert!((features[0] - 1.0).abs() < 1e-6);
        assert!(features[1].abs() < 1e-6);
    }

    #[test]
    fn test_scaler_rejects_mismatched_count() {
        assert!(FeatureScaler::parse("0.1,0.2\n0.5,0.5\n3").is_err());
        assert!(FeatureScaler::parse("0.1\n0.5").is_err());
        assert!(FeatureScaler::parse("a,b\n0.5,0.5\n2").is_err());
    }

    #[test]
    fn test_scaler_rejects_wrong_feature_length() {
        let scaler = FeatureScaler::default();
        let mut short = [0.0; 3];
        assert!(scaler.transform(&mut short).is_err());
    }

    #[test]
    fn test_zero_std_only_centers() {
        let scaler = FeatureScaler::new(vec![1.0], vec![0.0]).unwrap();
        let mut features = [3.0];
        scaler.transform(&mut features).unwrap();
        assert_eq!(features[0], 2.0);
    }
}

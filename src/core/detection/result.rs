use serde::Serialize;

use crate::core::color::{ColorName, Pixel};

/// One dominant color found by clustering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorResult {
    pub name: ColorName,
    /// Cluster centroid
    pub rgb: Pixel,
    /// Share of the surviving clusters, in percent
    pub percentage: f64,
    pub consistency: f64,
    /// HSV saturation of the centroid, percent
    pub saturation: f64,
    /// HSV value of the centroid, percent
    pub value: f64,
    pub hex: String,
    pub description: String,
    /// Cluster confidence before any regime floor
    pub confidence: f64,
}

/// Condensed entry in a detection summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominantColor {
    pub name: ColorName,
    pub rgb: Pixel,
    pub percentage: f64,
}

impl From<&ColorResult> for DominantColor {
    fn from(result: &ColorResult) -> Self {
        Self {
            name: result.name,
            rgb: result.rgb,
            percentage: result.percentage,
        }
    }
}

/// Which step of the fallback chain produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    Clusters,
    SinglePixel,
    Unknown,
}

/// Final answer for one detection request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub primary: ColorName,
    /// Confidence of the primary color with its regime floor applied
    pub confidence: f64,
    /// Sorted by percentage, descending
    pub dominant_colors: Vec<DominantColor>,
    pub rgb: (u8, u8, u8),
    pub source: DetectionSource,
}

impl DetectionResult {
    /// Sentinel returned when every strategy failed
    pub fn unknown() -> Self {
        Self {
            primary: ColorName::Unknown,
            confidence: 0.0,
            dominant_colors: Vec::new(),
            rgb: (0, 0, 0),
            source: DetectionSource::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.source == DetectionSource::Unknown
    }
}

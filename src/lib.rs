//! Dominant color detection for assistive color identification
//!
//! Images are sampled, clustered with k-means, and each cluster is named on a
//! closed palette and scored for confidence. When clustering yields nothing
//! the detector falls back to a single pixel, and finally to an explicit
//! "unknown" result, so detection calls never fail.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use config::DetectorConfig;
pub use crate::core::color::{ColorName, Language};
pub use crate::core::detection::{
    describe_for_accessibility, load_image, ColorDetector, ColorResult, DetectionResult, DetectionSource,
    DominantColor,
};
pub use crate::core::model::LearnedColorModel;
pub use error::{ColorError, Result};

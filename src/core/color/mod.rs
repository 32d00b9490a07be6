//! Color space conversion and rule-based naming
//!
//! This module holds the pure, stateless pieces of the pipeline: RGB/HSV
//! conversion, hex formatting, calibration, and the HSV naming decision tree.

pub mod conversion;
pub mod naming;

pub use conversion::{hsv_to_rgb, rgb_to_hsv, rgb_to_lab_approximation, CalibrationMatrix, Hsv, Pixel};
pub use naming::{name_color, ColorName, ColorNamer, Language, NamingThresholds};

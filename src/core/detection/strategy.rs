//! Ordered fallbacks for detection and naming
//!
//! A detection request walks the strategy list until one produces a result.
//! Naming works the same way over a shorter list whose last step, the rule
//! namer, always answers.

use image::{DynamicImage, GenericImageView};

use super::engine::DetectionEngine;
use super::result::DetectionResult;
use crate::core::color::{ColorName, ColorNamer, Pixel};
use crate::core::model::LearnedColorModel;
use crate::error::Result;

/// What part of the image a request is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Whole,
    Region { center_x: i64, center_y: i64, size: u32 },
}

impl Target {
    /// Representative point: the image center or the region center
    pub fn anchor(&self, width: u32, height: u32) -> (i64, i64) {
        match *self {
            Target::Whole => ((width / 2) as i64, (height / 2) as i64),
            Target::Region { center_x, center_y, .. } => (center_x, center_y),
        }
    }
}

pub struct DetectionRequest<'a> {
    pub image: &'a DynamicImage,
    pub target: Target,
}

/// One link in the detection fallback chain
///
/// `Ok(None)` hands the request to the next strategy. `Err` aborts the chain
/// and the caller reports an unknown color.
pub trait DetectionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, engine: &DetectionEngine, request: &DetectionRequest<'_>) -> Result<Option<DetectionResult>>;
}

/// Sample, cluster and summarize
#[derive(Debug, Default, Clone, Copy)]
pub struct ClusterStrategy;

impl DetectionStrategy for ClusterStrategy {
    fn name(&self) -> &'static str {
        "clusters"
    }

    fn detect(&self, engine: &DetectionEngine, request: &DetectionRequest<'_>) -> Result<Option<DetectionResult>> {
        let colors = match request.target {
            Target::Whole => engine.dominant_colors(request.image),
            Target::Region {
                center_x,
                center_y,
                size,
            } => engine
                .region_color(request.image, center_x, center_y, size)
                .into_iter()
                .collect(),
        };
        Ok(engine.summarize(&colors))
    }
}

/// Name the representative pixel on its own
#[derive(Debug, Default, Clone, Copy)]
pub struct SinglePixelStrategy;

impl DetectionStrategy for SinglePixelStrategy {
    fn name(&self) -> &'static str {
        "single pixel"
    }

    fn detect(&self, engine: &DetectionEngine, request: &DetectionRequest<'_>) -> Result<Option<DetectionResult>> {
        let (width, height) = request.image.dimensions();
        let (x, y) = request.target.anchor(width, height);
        Ok(engine.single_pixel(request.image, x, y))
    }
}

/// Default chain: clusters first, then the single pixel
pub fn default_strategies() -> Vec<Box<dyn DetectionStrategy>> {
    vec![Box::new(ClusterStrategy), Box::new(SinglePixelStrategy)]
}

/// A naming step that may decline to answer
pub trait ColorNaming: Send + Sync {
    fn suggest(&self, pixel: Pixel) -> Option<ColorName>;
}

impl ColorNaming for ColorNamer {
    fn suggest(&self, pixel: Pixel) -> Option<ColorName> {
        Some(self.name_pixel(pixel))
    }
}

impl ColorNaming for LearnedColorModel {
    fn suggest(&self, pixel: Pixel) -> Option<ColorName> {
        self.classify(pixel)
    }
}

/// Learned model (when present) followed by the rule namer
pub struct NamingChain {
    steps: Vec<Box<dyn ColorNaming>>,
}

impl std::fmt::Debug for NamingChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamingChain").field("steps", &self.steps.len()).finish()
    }
}

impl NamingChain {
    pub fn new(rules: ColorNamer) -> Self {
        Self {
            steps: vec![Box::new(rules)],
        }
    }

    /// Consult `model` before the rules
    pub fn with_model(mut self, model: LearnedColorModel) -> Self {
        self.steps.insert(0, Box::new(model));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn name(&self, pixel: Pixel) -> ColorName {
        self.steps
            .iter()
            .find_map(|step| step.suggest(pixel))
            .unwrap_or(ColorName::Unknown)
    }
}

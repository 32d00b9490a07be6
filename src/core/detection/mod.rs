//! Detection orchestration: sampling, clustering, scoring and fallbacks

mod description;
mod detector;
mod engine;
mod result;
mod strategy;

pub use description::{describe_cluster, describe_color, describe_for_accessibility, format_percent};
pub use detector::{image_from_rgba, load_image, ColorDetector};
pub use engine::DetectionEngine;
pub use result::{ColorResult, DetectionResult, DetectionSource, DominantColor};
pub use strategy::{
    default_strategies, ClusterStrategy, ColorNaming, DetectionRequest, DetectionStrategy, NamingChain,
    SinglePixelStrategy, Target,
};

use std::path::Path;

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use tracing::{debug, error, info, warn};

use super::description::describe_for_accessibility;
use super::engine::DetectionEngine;
use super::result::{ColorResult, DetectionResult};
use super::strategy::{default_strategies, DetectionRequest, DetectionStrategy, Target};
use crate::config::DetectorConfig;
use crate::core::model::LearnedColorModel;
use crate::error::{ColorError, Result};

/// Open an image file
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| ColorError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Wrap a raw RGBA8 buffer, rejecting sizes that do not match
pub fn image_from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<RgbaImage> {
    let len = data.len();
    RgbaImage::from_raw(width, height, data).ok_or_else(|| {
        ColorError::invalid_image(format!(
            "{} bytes is not a {}x{} RGBA buffer",
            len, width, height
        ))
    })
}

/// Entry point for color detection
///
/// Every `detect*` call is self-contained: it never panics on bad input and
/// always returns a result, falling back to a single pixel and finally to
/// [`DetectionResult::unknown`].
pub struct ColorDetector {
    config: DetectorConfig,
    engine: DetectionEngine,
    strategies: Vec<Box<dyn DetectionStrategy>>,
}

impl std::fmt::Debug for ColorDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strategies: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("ColorDetector")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("strategies", &strategies)
            .finish()
    }
}

impl Default for ColorDetector {
    fn default() -> Self {
        Self::from_valid(DetectorConfig::default())
    }
}

impl ColorDetector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: DetectorConfig) -> Self {
        Self {
            engine: DetectionEngine::new(&config),
            strategies: default_strategies(),
            config,
        }
    }

    /// Let a learned model name single pixels before the rules do
    pub fn with_model(mut self, model: LearnedColorModel) -> Self {
        self.engine.set_model(model);
        self
    }

    /// Replace the fallback chain
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn DetectionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Dominant colors of the whole image, most dominant first
    pub fn detect_dominant_colors<I>(&self, image: &I) -> Vec<ColorResult>
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        self.engine.dominant_colors(image)
    }

    /// Most dominant color in the square around a point
    ///
    /// `size` defaults to the configured region size. Returns `None` when the
    /// region misses the image or no cluster survives.
    pub fn detect_color_in_region<I>(
        &self,
        image: &I,
        center_x: i64,
        center_y: i64,
        size: Option<u32>,
    ) -> Option<ColorResult>
    where
        I: GenericImageView<Pixel = Rgba<u8>> + 'static,
    {
        let size = size.unwrap_or(self.config.default_region_size);
        self.engine.region_color(image, center_x, center_y, size)
    }

    pub fn detect(&self, image: &DynamicImage) -> DetectionResult {
        self.run(&DetectionRequest {
            image,
            target: Target::Whole,
        })
    }

    pub fn detect_in_region(
        &self,
        image: &DynamicImage,
        center_x: i64,
        center_y: i64,
        size: Option<u32>,
    ) -> DetectionResult {
        self.run(&DetectionRequest {
            image,
            target: Target::Region {
                center_x,
                center_y,
                size: size.unwrap_or(self.config.default_region_size),
            },
        })
    }

    /// Detect on a raw RGBA8 buffer; a malformed buffer yields the unknown result
    pub fn detect_rgba(&self, width: u32, height: u32, data: Vec<u8>) -> DetectionResult {
        match image_from_rgba(width, height, data) {
            Ok(image) => self.detect(&DynamicImage::ImageRgba8(image)),
            Err(e) => {
                error!("Rejected frame: {}", e);
                DetectionResult::unknown()
            }
        }
    }

    /// Readable summary in the configured language
    pub fn describe(&self, result: &DetectionResult) -> String {
        describe_for_accessibility(result, self.engine.language())
    }

    fn run(&self, request: &DetectionRequest<'_>) -> DetectionResult {
        let (width, height) = request.image.dimensions();
        debug!("Detecting {:?} on {}x{} image", request.target, width, height);

        for strategy in &self.strategies {
            match strategy.detect(&self.engine, request) {
                Ok(Some(result)) => {
                    info!(
                        "Detected {} ({:.1}% confidence) via {}",
                        result.primary.english(),
                        result.confidence * 100.0,
                        strategy.name()
                    );
                    return result;
                }
                Ok(None) => warn!("{} detection produced nothing, falling back", strategy.name()),
                Err(e) => {
                    error!("{} detection failed: {}", strategy.name(), e);
                    return DetectionResult::unknown();
                }
            }
        }

        warn!("Every detection strategy failed, reporting unknown color");
        DetectionResult::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorName;
    use crate::core::detection::result::DetectionSource;
    use crate::core::detection::strategy::SinglePixelStrategy;

    fn detector() -> ColorDetector {
        ColorDetector::new(DetectorConfig {
            seed: Some(42),
            ..DetectorConfig::default()
        })
        .unwrap()
    }

    fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    struct Broken;

    impl DetectionStrategy for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn detect(&self, _engine: &DetectionEngine, _request: &DetectionRequest<'_>) -> Result<Option<DetectionResult>> {
            Err(ColorError::invalid_image("corrupt"))
        }
    }

    #[test]
    fn test_detect_solid_red() {
        let result = detector().detect(&solid(30, 30, [255, 0, 0, 255]));
        assert_eq!(result.primary, ColorName::Red);
        assert_eq!(result.source, DetectionSource::Clusters);
        assert_eq!(result.rgb, (255, 0, 0));
        assert_eq!(result.dominant_colors.len(), 1);
        assert!((result.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_transparent_image_falls_back_to_center_pixel() {
        let mut image = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 0]));
        image.put_pixel(5, 5, Rgba([255, 255, 0, 0]));
        let result = detector().detect(&DynamicImage::ImageRgba8(image));
        assert_eq!(result.source, DetectionSource::SinglePixel);
        assert_eq!(result.primary, ColorName::Yellow);
        assert_eq!(result.rgb, (255, 255, 0));
    }

    #[test]
    fn test_empty_image_is_unknown() {
        let result = detector().detect(&DynamicImage::ImageRgba8(RgbaImage::new(0, 0)));
        assert!(result.is_unknown());
        assert_eq!(result.primary, ColorName::Unknown);
    }

    #[test]
    fn test_region_outside_image_is_unknown() {
        let detector = detector();
        let image = solid(50, 50, [0, 255, 0, 255]);
        assert!(detector.detect_color_in_region(&image, 500, 500, None).is_none());
        assert!(detector.detect_in_region(&image, 500, 500, None).is_unknown());
    }

    #[test]
    fn test_region_detection() {
        let mut image = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        for y in 30..70 {
            for x in 30..70 {
                image.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }
        let image = DynamicImage::ImageRgba8(image);
        let detector = detector();

        let color = detector.detect_color_in_region(&image, 50, 50, Some(20)).unwrap();
        assert_eq!(color.name, ColorName::Blue);
        assert_eq!(color.percentage, 100.0);

        let result = detector.detect_in_region(&image, 50, 50, Some(20));
        assert_eq!(result.primary, ColorName::Blue);
        assert_eq!(result.dominant_colors.len(), 1);
    }

    #[test]
    fn test_detect_rgba() {
        let detector = detector();
        let data = [0u8, 0, 0, 255].repeat(16);
        assert_eq!(detector.detect_rgba(4, 4, data).primary, ColorName::Black);

        let short = vec![0u8; 10];
        assert!(detector.detect_rgba(4, 4, short).is_unknown());
    }

    #[test]
    fn test_strategy_error_reports_unknown() {
        let detector = detector().with_strategies(vec![Box::new(Broken), Box::new(SinglePixelStrategy)]);
        let result = detector.detect(&solid(5, 5, [255, 0, 0, 255]));
        assert!(result.is_unknown());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = DetectorConfig::default();
        config.clustering.k = 0;
        assert!(ColorDetector::new(config).is_err());
    }

    #[test]
    fn test_describe_uses_configured_language() {
        let detector = ColorDetector::new(DetectorConfig {
            seed: Some(1),
            language: crate::core::color::Language::English,
            ..DetectorConfig::default()
        })
        .unwrap();
        let text = detector.describe(&detector.detect(&solid(8, 8, [255, 255, 255, 255])));
        assert!(text.starts_with("🎨 Primary color: white"));
    }

    #[test]
    fn test_load_missing_image() {
        let err = load_image(Path::new("/nonexistent/picture.png")).unwrap_err();
        assert!(matches!(err, ColorError::ImageLoad { .. }));
    }
}

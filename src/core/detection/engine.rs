use image::{GenericImageView, Rgba};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use super::description::describe_cluster;
use super::result::{ColorResult, DetectionResult, DetectionSource, DominantColor};
use super::strategy::NamingChain;
use crate::config::DetectorConfig;
use crate::core::analysis::{ClusterStats, ConfidenceModel};
use crate::core::clustering::KMeans;
use crate::core::color::{CalibrationMatrix, ColorNamer, Language, Pixel};
use crate::core::model::LearnedColorModel;
use crate::core::sampling::{PixelSampler, Region};

/// Consistency assumed for a lone pixel
const SINGLE_PIXEL_CONSISTENCY: f64 = 0.8;

/// The components every detection strategy draws on
#[derive(Debug)]
pub struct DetectionEngine {
    sampler: PixelSampler,
    kmeans: KMeans,
    namer: ColorNamer,
    confidence: ConfidenceModel,
    calibration: CalibrationMatrix,
    naming: NamingChain,
    cutoff: f64,
    seed: Option<u64>,
    language: Language,
}

impl DetectionEngine {
    pub fn new(config: &DetectorConfig) -> Self {
        let namer = ColorNamer::new(config.naming);
        Self {
            sampler: PixelSampler::new(config.sampling),
            kmeans: KMeans::new(config.clustering),
            namer,
            confidence: config.confidence.clone(),
            calibration: config.calibration,
            naming: NamingChain::new(namer),
            cutoff: config.confidence_cutoff,
            seed: config.seed,
            language: config.language,
        }
    }

    pub fn set_model(&mut self, model: LearnedColorModel) {
        self.naming = NamingChain::new(self.namer).with_model(model);
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn confidence_model(&self) -> &ConfidenceModel {
        &self.confidence
    }

    /// Fresh generator for one request
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Dominant colors of a whole image, sorted by percentage
    pub fn dominant_colors<I>(&self, image: &I) -> Vec<ColorResult>
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        let pixels = self.sampler.sample(image);
        self.colors_from_pixels(&pixels)
    }

    /// Dominant colors of an already sampled pixel set
    ///
    /// Clusters scoring below the confidence cutoff are dropped before the
    /// remaining percentages are rescaled to sum to 100.
    pub fn colors_from_pixels(&self, pixels: &[Pixel]) -> Vec<ColorResult> {
        if pixels.is_empty() {
            debug!("No usable pixels to cluster");
            return Vec::new();
        }

        let mut rng = self.rng();
        let clusters = self.kmeans.cluster(pixels, &mut rng);
        let total = pixels.len();

        let mut results: Vec<ColorResult> = clusters
            .values()
            .filter_map(|members| ClusterStats::from_members(members))
            .map(|stats| self.score_cluster(&stats, total))
            .filter(|result| {
                let keep = result.confidence >= self.cutoff;
                if !keep {
                    trace!(
                        "Dropping {} cluster at {:.1}% with confidence {:.3}",
                        result.name.english(),
                        result.percentage,
                        result.confidence
                    );
                }
                keep
            })
            .collect();

        normalize_percentages(&mut results);
        for result in &mut results {
            result.description = describe_cluster(result.name, result.percentage, result.confidence, self.language);
        }
        results.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        debug!(
            "{} of {} clusters kept from {} pixels",
            results.len(),
            clusters.len(),
            total
        );
        results
    }

    fn score_cluster(&self, stats: &ClusterStats, total: usize) -> ColorResult {
        let dominance = stats.dominance(total);
        let confidence = self
            .confidence
            .confidence(dominance, stats.consistency, stats.hsv.s, stats.hsv.v);

        ColorResult {
            name: self.namer.name(stats.hsv),
            rgb: stats.centroid,
            percentage: dominance,
            consistency: stats.consistency,
            saturation: stats.hsv.s,
            value: stats.hsv.v,
            hex: stats.centroid.to_hex(),
            description: String::new(),
            confidence,
        }
    }

    /// Most dominant color inside the square region around a point
    pub fn region_color<I>(&self, image: &I, center_x: i64, center_y: i64, size: u32) -> Option<ColorResult>
    where
        I: GenericImageView<Pixel = Rgba<u8>> + 'static,
    {
        let (width, height) = image.dimensions();
        let region = Region::around(width, height, center_x, center_y, size)?;
        trace!("Region {:?} around ({}, {})", region, center_x, center_y);
        self.dominant_colors(&region.crop(image)).into_iter().next()
    }

    /// Condense sorted color results into a detection summary
    pub fn summarize(&self, colors: &[ColorResult]) -> Option<DetectionResult> {
        let primary = colors.first()?;
        let confidence = self.confidence.floored_confidence(
            primary.percentage,
            primary.consistency,
            primary.saturation,
            primary.value,
        );

        Some(DetectionResult {
            primary: primary.name,
            confidence,
            dominant_colors: colors.iter().map(DominantColor::from).collect(),
            rgb: primary.rgb.to_u8(),
            source: DetectionSource::Clusters,
        })
    }

    /// Name the single pixel at `(x, y)`; `None` when it lies outside the image
    pub fn single_pixel<I>(&self, image: &I, x: i64, y: i64) -> Option<DetectionResult>
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        let (width, height) = image.dimensions();
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return None;
        }

        let [r, g, b, _] = image.get_pixel(x as u32, y as u32).0;
        let raw = Pixel::from_u8(r, g, b);
        let name = self.naming.name(self.calibration.apply(raw));

        let hsv = raw.to_hsv();
        let confidence = self
            .confidence
            .floored_confidence(100.0, SINGLE_PIXEL_CONSISTENCY, hsv.s, hsv.v);

        Some(DetectionResult {
            primary: name,
            confidence,
            dominant_colors: vec![DominantColor {
                name,
                rgb: raw,
                percentage: 100.0,
            }],
            rgb: (r, g, b),
            source: DetectionSource::SinglePixel,
        })
    }
}

/// Rescale percentages to sum to 100, splitting evenly when they sum to zero
fn normalize_percentages(results: &mut [ColorResult]) {
    if results.is_empty() {
        return;
    }
    let total: f64 = results.iter().map(|r| r.percentage).sum();
    if total > 0.0 {
        for result in results.iter_mut() {
            result.percentage = result.percentage / total * 100.0;
        }
    } else {
        let even = 100.0 / results.len() as f64;
        for result in results.iter_mut() {
            result.percentage = even;
        }
    }
}

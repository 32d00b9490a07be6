use image::imageops::{self, FilterType};
use image::{GenericImageView, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::color::Pixel;

/// Sampling parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Upper bound on the number of pixels handed to the clusterer
    pub max_samples: usize,
    /// Pixels with alpha at or below this value are skipped
    pub alpha_threshold: u8,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_samples: 500,
            alpha_threshold: 50,
        }
    }
}

/// Axis-aligned rectangle inside an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Square region of `size` around a center point, clamped to the image
    ///
    /// Returns `None` when the clamped rectangle is empty, which covers
    /// centers lying entirely outside the image.
    pub fn around(image_width: u32, image_height: u32, center_x: i64, center_y: i64, size: u32) -> Option<Region> {
        let half = size as i64 / 2;
        let left = center_x.saturating_sub(half).max(0);
        let top = center_y.saturating_sub(half).max(0);
        let right = center_x.saturating_add(half).min(image_width as i64);
        let bottom = center_y.saturating_add(half).min(image_height as i64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(Region {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }

    /// Owned copy of the pixels inside this region
    pub fn crop<I>(&self, image: &I) -> RgbaImage
    where
        I: GenericImageView<Pixel = Rgba<u8>> + 'static,
    {
        imageops::crop_imm(image, self.x, self.y, self.width, self.height).to_image()
    }
}

/// Downscale factor so that roughly `max_samples` pixels remain
pub fn scale_factor(total_pixels: u64, max_samples: usize) -> f64 {
    if total_pixels == 0 {
        return 1.0;
    }
    (max_samples as f64 / total_pixels as f64).sqrt().min(1.0)
}

/// Grid step used to walk an image of `total_pixels`
pub fn grid_step(total_pixels: u64, max_samples: usize) -> usize {
    let sample_rate = (total_pixels / max_samples.max(1) as u64).max(1);
    ((sample_rate as f64).sqrt() as usize).max(1)
}

/// Extracts a bounded, representative pixel set from an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSampler {
    config: SamplingConfig,
}

impl Default for PixelSampler {
    fn default() -> Self {
        Self::new(SamplingConfig::default())
    }
}

impl PixelSampler {
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            config: SamplingConfig {
                max_samples: config.max_samples.max(1),
                ..config
            },
        }
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Sample an entire image
    ///
    /// Large images are first downscaled with a smoothing filter, then walked
    /// on a regular grid. Near-transparent pixels are skipped; nothing else is
    /// filtered so the clusterer sees the real distribution.
    pub fn sample<I>(&self, image: &I) -> Vec<Pixel>
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        let (width, height) = image.dimensions();
        let total = width as u64 * height as u64;
        if total == 0 {
            return Vec::new();
        }

        let scale = scale_factor(total, self.config.max_samples);
        let pixels = if scale < 1.0 {
            let scaled_width = ((width as f64 * scale) as u32).max(1);
            let scaled_height = ((height as f64 * scale) as u32).max(1);
            debug!(
                "Downscaling {}x{} to {}x{} before sampling",
                width, height, scaled_width, scaled_height
            );
            // the resized buffer is dropped when this branch returns
            let scaled = imageops::resize(image, scaled_width, scaled_height, FilterType::Triangle);
            self.walk_grid(&scaled)
        } else {
            self.walk_grid(image)
        };

        debug!("Extracted {} pixels from {}x{} image", pixels.len(), width, height);
        pixels
    }

    /// Sample the square region around a center point
    ///
    /// Returns `None` if the region clamped to the image bounds is empty.
    pub fn sample_region<I>(&self, image: &I, center_x: i64, center_y: i64, size: u32) -> Option<Vec<Pixel>>
    where
        I: GenericImageView<Pixel = Rgba<u8>> + 'static,
    {
        let (width, height) = image.dimensions();
        let region = Region::around(width, height, center_x, center_y, size)?;
        Some(self.sample(&region.crop(image)))
    }

    fn walk_grid<I>(&self, image: &I) -> Vec<Pixel>
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        let (width, height) = image.dimensions();
        let step = grid_step(width as u64 * height as u64, self.config.max_samples);

        let mut pixels = Vec::new();
        for y in (0..height).step_by(step) {
            for x in (0..width).step_by(step) {
                let [r, g, b, a] = image.get_pixel(x, y).0;
                if a > self.config.alpha_threshold {
                    pixels.push(Pixel::from_u8(r, g, b));
                }
            }
        }

        // very elongated images can still overshoot after the grid walk
        if pixels.len() > self.config.max_samples {
            let stride = pixels.len().div_ceil(self.config.max_samples);
            pixels = pixels.into_iter().step_by(stride).collect();
        }

        pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_scale_factor() {
        assert_eq!(scale_factor(100, 500), 1.0);
        assert!((scale_factor(2000, 500) - 0.5).abs() < 1e-12);
        assert_eq!(scale_factor(0, 500), 1.0);
    }

    #[test]
    fn test_grid_step_never_below_one() {
        assert_eq!(grid_step(10, 500), 1);
        assert_eq!(grid_step(500, 500), 1);
        assert_eq!(grid_step(2000, 500), 2);
        assert_eq!(grid_step(100, 0), 10);
    }

    #[test]
    fn test_small_image_samples_every_pixel() {
        let sampler = PixelSampler::default();
        let image = solid(10, 10, [255, 0, 0, 255]);
        let pixels = sampler.sample(&image);
        assert_eq!(pixels.len(), 100);
        assert!(pixels.iter().all(|p| *p == Pixel::new(255.0, 0.0, 0.0)));
    }

    #[test]
    fn test_large_image_is_bounded() {
        let sampler = PixelSampler::default();
        let image = solid(1000, 800, [0, 128, 0, 255]);
        let pixels = sampler.sample(&image);
        assert!(!pixels.is_empty());
        assert!(pixels.len() <= 500, "got {}", pixels.len());
    }

    #[test]
    fn test_elongated_image_is_bounded() {
        let sampler = PixelSampler::default();
        let image = solid(20_000, 1, [0, 0, 255, 255]);
        let pixels = sampler.sample(&image);
        assert!(!pixels.is_empty());
        assert!(pixels.len() <= 500, "got {}", pixels.len());
    }

    #[test]
    fn test_transparent_pixels_are_skipped() {
        let sampler = PixelSampler::default();
        let mut image = solid(4, 4, [10, 20, 30, 0]);
        image.put_pixel(1, 1, Rgba([200, 100, 50, 255]));
        image.put_pixel(2, 2, Rgba([200, 100, 50, 51]));
        image.put_pixel(3, 3, Rgba([200, 100, 50, 50]));
        let pixels = sampler.sample(&image);
        assert_eq!(pixels.len(), 2);
    }

    #[test]
    fn test_empty_image() {
        let sampler = PixelSampler::default();
        let image = RgbaImage::new(0, 0);
        assert!(sampler.sample(&image).is_empty());
    }

    #[test]
    fn test_region_clamped_to_bounds() {
        let region = Region::around(100, 100, 5, 5, 60).unwrap();
        assert_eq!(region, Region { x: 0, y: 0, width: 35, height: 35 });

        let region = Region::around(100, 100, 50, 50, 60).unwrap();
        assert_eq!(region, Region { x: 20, y: 20, width: 60, height: 60 });
    }

    #[test]
    fn test_region_outside_image_is_none() {
        assert!(Region::around(100, 100, 500, 500, 60).is_none());
        assert!(Region::around(100, 100, -40, 50, 60).is_none());
        assert!(Region::around(100, 100, 50, 50, 0).is_none());
    }

    #[test]
    fn test_region_extreme_centers() {
        assert!(Region::around(100, 100, i64::MAX, 50, 60).is_none());
        assert!(Region::around(100, 100, i64::MIN, 50, 60).is_none());
        assert!(Region::around(100, 100, 50, i64::MAX, u32::MAX).is_none());
        assert!(Region::around(100, 100, i64::MIN, i64::MIN, u32::MAX).is_none());
    }

    #[test]
    fn test_sample_region() {
        let sampler = PixelSampler::default();
        let mut image = solid(100, 100, [0, 0, 0, 255]);
        for y in 40..60 {
            for x in 40..60 {
                image.put_pixel(x, y, Rgba([255, 255, 0, 255]));
            }
        }
        let pixels = sampler.sample_region(&image, 50, 50, 20).unwrap();
        assert_eq!(pixels.len(), 400);
        assert!(pixels.iter().all(|p| *p == Pixel::new(255.0, 255.0, 0.0)));

        assert!(sampler.sample_region(&image, 1000, 1000, 20).is_none());
    }
}

//! Pixel sampling from whole images and regions of interest

mod sampler;

pub use sampler::{grid_step, scale_factor, PixelSampler, Region, SamplingConfig};

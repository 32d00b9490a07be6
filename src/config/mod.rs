mod detector_config;

pub use detector_config::DetectorConfig;

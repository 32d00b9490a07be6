use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::analysis::ConfidenceModel;
use crate::core::clustering::ClusteringConfig;
use crate::core::color::{CalibrationMatrix, Language, NamingThresholds};
use crate::core::sampling::SamplingConfig;
use crate::error::{ColorError, Result};

const CONFIG_FILE: &str = "config.json";

/// Every tunable of the detection pipeline
///
/// All fields fall back to their defaults when absent, so a config file
/// only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub clustering: ClusteringConfig,
    pub sampling: SamplingConfig,
    /// Clusters scoring below this confidence are discarded
    pub confidence_cutoff: f64,
    /// Side of the square used by region detection when none is given
    pub default_region_size: u32,
    /// Fixed RNG seed for reproducible clustering; entropy when unset
    pub seed: Option<u64>,
    pub naming: NamingThresholds,
    pub confidence: ConfidenceModel,
    /// Applied to single-pixel lookups before naming
    pub calibration: CalibrationMatrix,
    pub language: Language,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            clustering: ClusteringConfig::default(),
            sampling: SamplingConfig::default(),
            confidence_cutoff: 0.5,
            default_region_size: 60,
            seed: None,
            naming: NamingThresholds::default(),
            confidence: ConfidenceModel::default(),
            calibration: CalibrationMatrix::default(),
            language: Language::default(),
        }
    }
}

impl DetectorConfig {
    /// Platform config location, e.g. `~/.config/colormate/config.json`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "colormate").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: DetectorConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        info!("Loaded detector config from {:?}", path);
        Ok(config)
    }

    /// Load from the platform config location, or return defaults if the
    /// file doesn't exist or is unusable
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("Could not determine config directory. Using defaults.");
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => config,
            Err(ColorError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config file at {:?}. Using defaults.", path);
                Self::default()
            }
            Err(e) => {
                warn!("Failed to load config {:?}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        info!("Detector config saved to {:?}", path);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.clustering.k == 0 {
            return Err(ColorError::config("clustering.k", self.clustering.k));
        }
        if self.clustering.max_iterations == 0 {
            return Err(ColorError::config(
                "clustering.max_iterations",
                self.clustering.max_iterations,
            ));
        }
        if self.clustering.runs == 0 {
            return Err(ColorError::config("clustering.runs", self.clustering.runs));
        }
        if !self.clustering.epsilon.is_finite() || self.clustering.epsilon < 0.0 {
            return Err(ColorError::config("clustering.epsilon", self.clustering.epsilon));
        }
        if self.sampling.max_samples == 0 {
            return Err(ColorError::config("sampling.max_samples", self.sampling.max_samples));
        }
        if !self.confidence_cutoff.is_finite() {
            return Err(ColorError::config("confidence_cutoff", self.confidence_cutoff));
        }

        let weights = &self.confidence.weights;
        for (name, weight) in [
            ("confidence.weights.dominance", weights.dominance),
            ("confidence.weights.consistency", weights.consistency),
            ("confidence.weights.saturation", weights.saturation),
            ("confidence.weights.brightness", weights.brightness),
            ("confidence.boost", self.confidence.boost),
        ] {
            if !weight.is_finite() {
                return Err(ColorError::config(name, weight));
            }
        }

        if self.calibration.0.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ColorError::config("calibration", format!("{:?}", self.calibration.0)));
        }

        Ok(())
    }
}

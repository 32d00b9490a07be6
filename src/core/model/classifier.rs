use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::assets::{ClusterMapping, LabelTable, LABELS_FILE, MAPPING_FILE, NORMALIZATION_FILE, WEIGHTS_FILE};
use super::features::{engineer_features, FeatureScaler, FEATURE_COUNT};
use crate::core::color::{ColorName, Pixel};
use crate::error::{ColorError, Result};

/// Probability the top class must exceed before its label is used
pub const MIN_PROBABILITY: f32 = 0.4;

/// Anything that maps a standardized feature vector to class probabilities
pub trait ColorClassifier: Send + Sync {
    fn predict(&self, features: &[f32]) -> Result<Vec<f32>>;
}

/// Single-layer softmax classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// One row of input weights per class
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl LinearClassifier {
    pub fn new(weights: Vec<Vec<f32>>, bias: Vec<f32>) -> Result<Self> {
        let classifier = Self { weights, bias };
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let classifier: Self = serde_json::from_str(json)?;
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn classes(&self) -> usize {
        self.weights.len()
    }

    fn validate(&self) -> Result<()> {
        if self.weights.is_empty() {
            return Err(ColorError::model("classifier has no classes"));
        }
        if self.bias.len() != self.weights.len() {
            return Err(ColorError::model(format!(
                "classifier has {} weight rows but {} biases",
                self.weights.len(),
                self.bias.len()
            )));
        }
        if let Some(row) = self.weights.iter().find(|row| row.len() != FEATURE_COUNT) {
            return Err(ColorError::model(format!(
                "weight row has {} inputs, expected {}",
                row.len(),
                FEATURE_COUNT
            )));
        }
        Ok(())
    }
}

impl ColorClassifier for LinearClassifier {
    fn predict(&self, features: &[f32]) -> Result<Vec<f32>> {
        if features.len() != FEATURE_COUNT {
            return Err(ColorError::model(format!(
                "expected {} features, got {}",
                FEATURE_COUNT,
                features.len()
            )));
        }

        let logits: Vec<f32> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f32>() + bias)
            .collect();

        Ok(softmax(&logits))
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        exps.iter().map(|e| e / sum).collect()
    } else {
        vec![0.0; logits.len()]
    }
}

/// Optional learned namer for single colors
///
/// Advisory only: whenever the prediction is weak, unmapped or fails, the
/// caller is expected to fall back to the rule namer.
pub struct LearnedColorModel {
    classifier: Box<dyn ColorClassifier>,
    scaler: FeatureScaler,
    mapping: ClusterMapping,
    min_probability: f32,
}

impl std::fmt::Debug for LearnedColorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearnedColorModel")
            .field("scaler", &self.scaler)
            .field("mapping", &self.mapping)
            .field("min_probability", &self.min_probability)
            .finish_non_exhaustive()
    }
}

impl LearnedColorModel {
    pub fn new(classifier: Box<dyn ColorClassifier>, scaler: FeatureScaler, mapping: ClusterMapping) -> Self {
        Self {
            classifier,
            scaler,
            mapping,
            min_probability: MIN_PROBABILITY,
        }
    }

    /// Load a model directory
    ///
    /// The weights file is required. Labels, mapping and normalization
    /// parameters fall back to their defaults when missing or unreadable.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let classifier = LinearClassifier::load(&dir.join(WEIGHTS_FILE))?;
        let outputs = classifier.classes();

        let labels = LabelTable::load_or_default(&dir.join(LABELS_FILE));
        let mapping = ClusterMapping::load_or_identity(&dir.join(MAPPING_FILE), &labels, outputs);
        let scaler = match FeatureScaler::load(&dir.join(NORMALIZATION_FILE)) {
            Ok(scaler) if scaler.len() == FEATURE_COUNT => scaler,
            Ok(scaler) => {
                warn!(
                    "Normalization params describe {} features, expected {}; using defaults",
                    scaler.len(),
                    FEATURE_COUNT
                );
                FeatureScaler::default()
            }
            Err(e) => {
                warn!("Using default normalization: {}", e);
                FeatureScaler::default()
            }
        };

        info!("Loaded color model from {} ({} classes)", dir.display(), outputs);
        Ok(Self::new(Box::new(classifier), scaler, mapping))
    }

    pub fn with_min_probability(mut self, min_probability: f32) -> Self {
        self.min_probability = min_probability;
        self
    }

    /// Top class index and its probability
    pub fn predict(&self, pixel: Pixel) -> Result<(usize, f32)> {
        let mut features = engineer_features(pixel);
        self.scaler.transform(&mut features)?;
        let probabilities = self.classifier.predict(&features)?;

        probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| ColorError::model("classifier returned no probabilities"))
    }

    /// Name a color if the model is confident, `None` otherwise
    pub fn classify(&self, pixel: Pixel) -> Option<ColorName> {
        let (index, probability) = match self.predict(pixel) {
            Ok(top) => top,
            Err(e) => {
                warn!("Color model prediction failed: {}", e);
                return None;
            }
        };

        if probability <= self.min_probability {
            debug!("Model confidence {:.3} too low for class {}", probability, index);
            return None;
        }

        let label = self.mapping.label(index)?;
        match label.parse::<ColorName>() {
            Ok(name) => Some(name),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always answers with fixed probabilities
    struct Fixed(Vec<f32>);

    impl ColorClassifier for Fixed {
        fn predict(&self, _features: &[f32]) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl ColorClassifier for Failing {
        fn predict(&self, _features: &[f32]) -> Result<Vec<f32>> {
            Err(ColorError::model("boom"))
        }
    }

    fn model(classifier: Box<dyn ColorClassifier>) -> LearnedColorModel {
        let labels = LabelTable::default();
        LearnedColorModel::new(classifier, FeatureScaler::default(), ClusterMapping::identity(&labels, 25))
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = p.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn test_confident_prediction_is_used() {
        let m = model(Box::new(Fixed(vec![0.1, 0.0, 0.9])));
        assert_eq!(m.classify(Pixel::new(0.0, 0.0, 255.0)), Some(ColorName::Blue));
    }

    #[test]
    fn test_weak_prediction_is_ignored() {
        let m = model(Box::new(Fixed(vec![0.35, 0.3, 0.35])));
        assert_eq!(m.classify(Pixel::BLACK), None);

        let exact = model(Box::new(Fixed(vec![0.4, 0.6])));
        assert_eq!(exact.with_min_probability(0.6).classify(Pixel::BLACK), None);
    }

    #[test]
    fn test_unmapped_class_is_ignored() {
        let mut probabilities = vec![0.0; 30];
        probabilities[28] = 1.0;
        let m = model(Box::new(Fixed(probabilities)));
        assert_eq!(m.classify(Pixel::BLACK), None);
    }

    #[test]
    fn test_errors_become_none() {
        let m = model(Box::new(Failing));
        assert_eq!(m.classify(Pixel::BLACK), None);
        assert!(m.predict(Pixel::BLACK).is_err());
    }

    #[test]
    fn test_linear_classifier_from_json() {
        let mut weights = vec![vec![0.0; FEATURE_COUNT]; 2];
        weights[1][0] = 10.0;
        let json = serde_json::to_string(&LinearClassifier { weights, bias: vec![0.0, 0.0] }).unwrap();
        let classifier = LinearClassifier::from_json(&json).unwrap();
        assert_eq!(classifier.classes(), 2);

        let mut features = [0.0; FEATURE_COUNT];
        features[0] = 1.0;
        let p = classifier.predict(&features).unwrap();
        assert!(p[1] > 0.99);
    }

    #[test]
    fn test_linear_classifier_validation() {
        assert!(LinearClassifier::new(vec![], vec![]).is_err());
        assert!(LinearClassifier::new(vec![vec![0.0; FEATURE_COUNT]], vec![]).is_err());
        assert!(LinearClassifier::new(vec![vec![0.0; 3]], vec![0.0]).is_err());
        assert!(LinearClassifier::from_json("{not json").is_err());
    }

    #[test]
    fn test_load_dir_requires_weights() {
        assert!(LearnedColorModel::load_dir(Path::new("/nonexistent/colormate-model")).is_err());
    }
}

//! Optional learned color namer and its on-disk assets

mod assets;
mod classifier;
mod features;

pub use assets::{ClusterMapping, LabelTable, DEFAULT_LABELS, LABELS_FILE, MAPPING_FILE, NORMALIZATION_FILE, WEIGHTS_FILE};
pub use classifier::{ColorClassifier, LearnedColorModel, LinearClassifier, MIN_PROBABILITY};
pub use features::{engineer_features, FeatureScaler, FEATURE_COUNT};

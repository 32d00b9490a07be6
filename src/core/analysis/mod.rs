//! Cluster statistics and confidence scoring

mod cluster_stats;
mod confidence;

pub use cluster_stats::{consistency, ClusterStats};
pub use confidence::{ConfidenceModel, FactorWeights, Ladder, RegimeFloors};

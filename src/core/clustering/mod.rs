//! K-means color clustering

mod kmeans;

pub use kmeans::{Clustering, ClusteringConfig, KMeans};

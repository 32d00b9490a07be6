use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;

/// Labels the bundled classifier was trained with, in output order
pub const DEFAULT_LABELS: [&str; 25] = [
    "Merah",
    "Hijau",
    "Biru",
    "Kuning",
    "Ungu",
    "Jingga",
    "Merah Muda",
    "Cokelat",
    "Hitam",
    "Putih",
    "Abu-abu",
    "Abu-abu Gelap",
    "Abu-abu Terang",
    "Krem",
    "Cyan",
    "Magenta",
    "Hijau Gelap",
    "Biru Tua",
    "Kuning Hijau",
    "Cokelat Muda",
    "Merah Tua",
    "Hijau Pucat",
    "Biru Pucat",
    "Ungu Pucat",
    "Merah Muda Pucat",
];

pub const LABELS_FILE: &str = "label_encoder_classes.txt";
pub const MAPPING_FILE: &str = "cluster_mapping.txt";
pub const NORMALIZATION_FILE: &str = "enhanced_normalization_params.txt";
pub const WEIGHTS_FILE: &str = "classifier.json";

/// Ordered class labels, one per classifier output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl Default for LabelTable {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl LabelTable {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// One label per non-blank line
    pub fn parse(text: &str) -> Self {
        Self {
            labels: text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    /// Load from `path`, falling back to the bundled labels
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => {
                debug!("Labels loaded: {} items", table.len());
                table
            }
            Err(e) => {
                warn!("Using default labels, could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Maps classifier output indices to label text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClusterMapping {
    entries: BTreeMap<usize, String>,
}

impl ClusterMapping {
    /// Each output index maps to the label at the same position
    pub fn identity(labels: &LabelTable, outputs: usize) -> Self {
        let entries = (0..outputs.min(labels.len()))
            .filter_map(|i| labels.get(i).map(|l| (i, l.to_string())))
            .collect();
        Self { entries }
    }

    /// Parse `cluster:labelIndex` lines; malformed or out-of-range lines are skipped
    pub fn parse(text: &str, labels: &LabelTable) -> Self {
        let mut entries = BTreeMap::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some((cluster, index)) = line.split_once(':') else {
                continue;
            };
            let (Ok(cluster), Ok(index)) = (cluster.trim().parse::<usize>(), index.trim().parse::<usize>()) else {
                continue;
            };
            if let Some(label) = labels.get(index) {
                entries.insert(cluster, label.to_string());
            }
        }
        Self { entries }
    }

    pub fn load(path: &Path, labels: &LabelTable) -> Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?, labels))
    }

    pub fn load_or_identity(path: &Path, labels: &LabelTable, outputs: usize) -> Self {
        match Self::load(path, labels) {
            Ok(mapping) => {
                debug!("Cluster mapping loaded: {} mappings", mapping.len());
                mapping
            }
            Err(e) => {
                warn!("Using identity cluster mapping, could not read {}: {}", path.display(), e);
                Self::identity(labels, outputs)
            }
        }
    }

    pub fn label(&self, cluster: usize) -> Option<&str> {
        self.entries.get(&cluster).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorName;

    #[test]
    fn test_default_labels_are_known_colors() {
        for label in DEFAULT_LABELS {
            assert!(label.parse::<ColorName>().is_ok(), "{} should parse", label);
        }
    }

    #[test]
    fn test_label_table_skips_blank_lines() {
        let table = LabelTable::parse("Merah\n\n  Biru \n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), Some("Biru"));
        assert_eq!(table.get(2), None);
    }

    #[test]
    fn test_mapping_parse() {
        let labels = LabelTable::parse("Merah\nHijau\nBiru");
        let mapping = ClusterMapping::parse("0:2\n1: 0\nbad\n2:9\nx:1\n3:1:4\n", &labels);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.label(0), Some("Biru"));
        assert_eq!(mapping.label(1), Some("Merah"));
        assert_eq!(mapping.label(2), None);
    }

    #[test]
    fn test_identity_mapping() {
        let labels = LabelTable::default();
        let mapping = ClusterMapping::identity(&labels, 10);
        assert_eq!(mapping.len(), 10);
        assert_eq!(mapping.label(5), Some("Jingga"));

        let all = ClusterMapping::identity(&labels, 100);
        assert_eq!(all.len(), 25);
    }

    #[test]
    fn test_missing_files_fall_back() {
        let dir = Path::new("/nonexistent/colormate-assets");
        let labels = LabelTable::load_or_default(&dir.join(LABELS_FILE));
        assert_eq!(labels.len(), 25);
        let mapping = ClusterMapping::load_or_identity(&dir.join(MAPPING_FILE), &labels, 3);
        assert_eq!(mapping.len(), 3);
    }
}

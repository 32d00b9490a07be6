use crate::core::color::{Hsv, Pixel};

/// Summary of one cluster's members
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterStats {
    pub centroid: Pixel,
    pub size: usize,
    /// 1 - mean/max distance to the centroid; 1.0 when all members coincide
    pub consistency: f64,
    pub hsv: Hsv,
}

impl ClusterStats {
    pub fn from_members(members: &[Pixel]) -> Option<Self> {
        let centroid = Pixel::mean(members)?;
        Some(Self {
            centroid,
            size: members.len(),
            consistency: consistency(members, &centroid),
            hsv: centroid.to_hsv(),
        })
    }

    /// Percentage of `total` sampled pixels that fell into this cluster
    pub fn dominance(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        self.size as f64 / total as f64 * 100.0
    }
}

/// How tightly the members agree around `centroid`, in [0, 1]
pub fn consistency(members: &[Pixel], centroid: &Pixel) -> f64 {
    if members.is_empty() {
        return 1.0;
    }
    let distances: Vec<f64> = members.iter().map(|p| p.distance(centroid)).collect();
    let average = distances.iter().sum::<f64>() / distances.len() as f64;
    let max = distances.iter().copied().fold(0.0, f64::max);

    if max > 0.0 {
        (1.0 - average / max).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

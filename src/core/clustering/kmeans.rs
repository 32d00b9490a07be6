use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::core::color::Pixel;

/// Tunables for the k-means clusterer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Number of clusters, at least 1
    pub k: usize,
    /// Iteration cap per run
    pub max_iterations: usize,
    /// Converge when the summed center movement drops below this
    pub epsilon: f64,
    /// Independent seeded runs; the lowest-inertia run wins
    pub runs: usize,
    /// Unchanged assignments only end a run after this many iterations
    pub min_stable_iterations: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            k: 6,
            max_iterations: 30,
            epsilon: 0.5,
            runs: 3,
            min_stable_iterations: 5,
        }
    }
}

/// Outcome of clustering a pixel set
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Centers of the winning run. May hold fewer than k entries when the
    /// input has fewer distinct colors than k.
    pub centers: Vec<Pixel>,
    /// Cluster index for every input pixel, from the final assignment pass
    pub assignments: Vec<usize>,
    /// Sum of squared distances to the assigned centers
    pub inertia: f64,
    /// Iterations the winning run took
    pub iterations: usize,
}

impl Clustering {
    pub fn empty() -> Self {
        Self {
            centers: Vec::new(),
            assignments: Vec::new(),
            inertia: 0.0,
            iterations: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Group the clustered pixels by cluster index. Only non-empty clusters appear.
    pub fn clusters(&self, pixels: &[Pixel]) -> BTreeMap<usize, Vec<Pixel>> {
        let mut clusters: BTreeMap<usize, Vec<Pixel>> = BTreeMap::new();
        for (pixel, &cluster) in pixels.iter().zip(&self.assignments) {
            clusters.entry(cluster).or_default().push(*pixel);
        }
        clusters
    }
}

struct RunOutcome {
    centers: Vec<Pixel>,
    inertia: f64,
    iterations: usize,
}

/// K-means over RGB pixels with k-means++ seeding and best-of-N runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    config: ClusteringConfig,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(ClusteringConfig::default())
    }
}

impl KMeans {
    pub fn new(config: ClusteringConfig) -> Self {
        Self {
            config: ClusteringConfig {
                k: config.k.max(1),
                max_iterations: config.max_iterations.max(1),
                runs: config.runs.max(1),
                ..config
            },
        }
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Cluster `pixels` and return the members of each non-empty cluster
    pub fn cluster<R: Rng + ?Sized>(&self, pixels: &[Pixel], rng: &mut R) -> BTreeMap<usize, Vec<Pixel>> {
        self.fit(pixels, rng).clusters(pixels)
    }

    /// Run the full clustering and keep the lowest-inertia run
    pub fn fit<R: Rng + ?Sized>(&self, pixels: &[Pixel], rng: &mut R) -> Clustering {
        if pixels.is_empty() {
            return Clustering::empty();
        }

        let mut best: Option<RunOutcome> = None;
        for run in 0..self.config.runs {
            let outcome = self.run(pixels, rng);
            trace!(
                "k-means run {} finished after {} iterations, inertia {:.2}",
                run,
                outcome.iterations,
                outcome.inertia
            );
            let better = best.as_ref().map_or(true, |b| outcome.inertia < b.inertia);
            if better {
                best = Some(outcome);
            }
        }

        let Some(best) = best else {
            return Clustering::empty();
        };

        // final pass so memberships match the returned centers exactly
        let mut assignments = vec![0; pixels.len()];
        assign(pixels, &best.centers, &mut assignments);
        let inertia = inertia(pixels, &best.centers, &assignments);

        debug!(
            "Clustered {} pixels into {} centers (inertia {:.2}, {} iterations)",
            pixels.len(),
            best.centers.len(),
            inertia,
            best.iterations
        );

        Clustering {
            centers: best.centers,
            assignments,
            inertia,
            iterations: best.iterations,
        }
    }

    fn run<R: Rng + ?Sized>(&self, pixels: &[Pixel], rng: &mut R) -> RunOutcome {
        let mut centers = self.seed_centers(pixels, rng);
        let mut assignments = vec![usize::MAX; pixels.len()];
        let mut iterations = 0;

        for iteration in 0..self.config.max_iterations {
            iterations = iteration + 1;

            let changed = assign(pixels, &centers, &mut assignments);
            let previous = centers.clone();
            update_centers(pixels, &assignments, &mut centers);

            let shift: f64 = centers
                .iter()
                .zip(&previous)
                .map(|(new, old)| new.distance(old))
                .sum();

            if shift < self.config.epsilon {
                break;
            }
            if !changed && iteration > self.config.min_stable_iterations {
                break;
            }
        }

        let inertia = inertia(pixels, &centers, &assignments);
        RunOutcome {
            centers,
            inertia,
            iterations,
        }
    }

    /// k-means++ seeding
    ///
    /// The first center is uniform; each further center is drawn with
    /// probability proportional to its squared distance from the nearest chosen
    /// center. Stops early when every pixel coincides with a chosen center.
    pub fn seed_centers<R: Rng + ?Sized>(&self, pixels: &[Pixel], rng: &mut R) -> Vec<Pixel> {
        if pixels.is_empty() {
            return Vec::new();
        }

        let mut centers = Vec::with_capacity(self.config.k);
        centers.push(pixels[rng.gen_range(0..pixels.len())]);

        while centers.len() < self.config.k {
            let distances: Vec<f64> = pixels
                .iter()
                .map(|pixel| {
                    centers
                        .iter()
                        .map(|center| center.distance_squared(pixel))
                        .fold(f64::INFINITY, f64::min)
                })
                .collect();

            let total: f64 = distances.iter().sum();
            if total <= 0.0 || !total.is_finite() {
                break;
            }

            let target: f64 = rng.gen();
            let mut cumulative = 0.0;
            let selected = distances
                .iter()
                .position(|distance| {
                    cumulative += distance / total;
                    cumulative >= target
                })
                .unwrap_or(pixels.len() - 1);

            centers.push(pixels[selected]);
        }

        centers
    }
}

/// Index of the nearest center; ties go to the lowest index
fn nearest(pixel: &Pixel, centers: &[Pixel]) -> usize {
    let mut best_index = 0;
    let mut best_distance = f64::INFINITY;
    for (index, center) in centers.iter().enumerate() {
        let distance = center.distance_squared(pixel);
        if distance < best_distance {
            best_distance = distance;
            best_index = index;
        }
    }
    best_index
}

/// Assign every pixel to its nearest center, reporting whether anything moved
fn assign(pixels: &[Pixel], centers: &[Pixel], assignments: &mut [usize]) -> bool {
    let mut changed = false;
    for (pixel, slot) in pixels.iter().zip(assignments.iter_mut()) {
        let closest = nearest(pixel, centers);
        if *slot != closest {
            *slot = closest;
            changed = true;
        }
    }
    changed
}

/// Move each non-empty cluster's center to the mean of its members.
/// Empty clusters keep their previous center.
fn update_centers(pixels: &[Pixel], assignments: &[usize], centers: &mut [Pixel]) {
    let mut sums = vec![(0.0, 0.0, 0.0); centers.len()];
    let mut counts = vec![0usize; centers.len()];

    for (pixel, &cluster) in pixels.iter().zip(assignments) {
        if let Some(sum) = sums.get_mut(cluster) {
            sum.0 += pixel.r;
            sum.1 += pixel.g;
            sum.2 += pixel.b;
            counts[cluster] += 1;
        }
    }

    for ((center, (r, g, b)), count) in centers.iter_mut().zip(sums).zip(counts) {
        if count > 0 {
            let n = count as f64;
            *center = Pixel::new(r / n, g / n, b / n);
        }
    }
}

fn inertia(pixels: &[Pixel], centers: &[Pixel], assignments: &[usize]) -> f64 {
    pixels
        .iter()
        .zip(assignments)
        .filter_map(|(pixel, &cluster)| centers.get(cluster).map(|c| c.distance_squared(pixel)))
        .sum()
}

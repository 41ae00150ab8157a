//! K-means clustering of request feature vectors.
//!
//! Partitions data into k clusters by minimizing within-cluster sum of
//! squares. Centroids are seeded with k-means++ and refined with Lloyd's
//! alternating assign/update loop.
//!
//! # Lloyd's Algorithm
//!
//! 1. Seed k centroids via k-means++
//! 2. **Assign**: each point → nearest centroid; the lowest centroid index
//!    wins exact ties
//! 3. **Update**: each centroid → componentwise mean of its points; a
//!    cluster left empty is re-seeded from a uniformly random input row so
//!    the slot stays alive for the next pass
//! 4. Repeat until a full assignment pass changes no label, or the
//!    iteration cap is reached
//!
//! Convergence is decided by label changes alone. There is no
//! centroid-shift tolerance; exact floating-point comparison decides both
//! the nearest-centroid tie-break and the stopping check. The cap is a
//! safety valve and is reported as [`Termination::IterationCapped`] rather
//! than silently passing for convergence.
//!
//! # Seeding
//!
//! The k-means++ selection weights here are plain (non-squared) Euclidean
//! distances to the nearest already-chosen centroid. The spreading pull is
//! milder than the textbook D² weighting, with the same intent: push
//! initial centroids apart. Chosen centroids are copies of input rows,
//! never averaged and never deduplicated, so `k` above the number of
//! distinct points is legal and simply repeats rows.
//!
//! # Randomness
//!
//! Initialization and empty-cluster re-seeding draw from one generator:
//! process-seeded by default, or pinned via [`Kmeans::with_seed`], which
//! makes an entire fit bit-reproducible.

use super::traits::Clustering;
use crate::error::{Error, Result};
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum refinement iterations.
    max_iter: usize,
    /// Random seed.
    seed: Option<u64>,
}

/// How a fit stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// A full assignment pass changed no label.
    Converged {
        /// Assign/update cycles completed before the stable pass.
        iterations: usize,
    },
    /// The iteration cap was reached before the labels stabilized.
    IterationCapped {
        /// Assign/update cycles completed.
        iterations: usize,
    },
}

impl Termination {
    /// Whether the fit reached a stable labeling.
    pub fn converged(&self) -> bool {
        matches!(self, Termination::Converged { .. })
    }

    /// Assign/update cycles completed.
    pub fn iterations(&self) -> usize {
        match *self {
            Termination::Converged { iterations }
            | Termination::IterationCapped { iterations } => iterations,
        }
    }
}

/// Output of [`Kmeans::fit`].
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Cluster label per input row, index-aligned.
    pub labels: Vec<usize>,
    /// Final centroids, one per requested cluster slot. Slots that ended
    /// empty hold whatever the last update left in them.
    pub centroids: Vec<Vec<f64>>,
    /// How refinement stopped.
    pub termination: Termination,
}

impl Kmeans {
    /// Create a new K-means clusterer with the default cap of 100
    /// iterations.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            seed: None,
        }
    }

    /// Set maximum refinement iterations. A cap of 0 stops after a single
    /// assignment pass against the initial centroids.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Initialize centroids using k-means++ selection.
    fn init_centroids(&self, data: &Array2<f64>, rng: &mut impl Rng) -> Array2<f64> {
        let n = data.nrows();
        let d = data.ncols();
        let mut centroids = Array2::zeros((self.k, d));

        // First centroid: random row.
        let first = rng.random_range(0..n);
        centroids.row_mut(0).assign(&data.row(first));

        for i in 1..self.k {
            // Weight: plain Euclidean distance to the nearest chosen centroid.
            let mut distances: Vec<f64> = Vec::with_capacity(n);
            for j in 0..n {
                let point = data.row(j);
                let min_dist = (0..i)
                    .map(|c| Self::distance(&point, &centroids.row(c)))
                    .fold(f64::MAX, f64::min);
                distances.push(min_dist);
            }

            // No mass to walk when every row coincides with a chosen
            // centroid; fall back to a uniform draw.
            let total: f64 = distances.iter().sum();
            if total == 0.0 {
                let idx = rng.random_range(0..n);
                centroids.row_mut(i).assign(&data.row(idx));
                continue;
            }

            // Cumulative-threshold draw proportional to distance.
            let threshold = rng.random::<f64>() * total;
            let mut cumsum = 0.0;
            let mut selected = 0;
            for (j, &dist) in distances.iter().enumerate() {
                cumsum += dist;
                if cumsum >= threshold {
                    selected = j;
                    break;
                }
            }

            centroids.row_mut(i).assign(&data.row(selected));
        }

        centroids
    }

    /// Euclidean distance between a point and a centroid row.
    #[inline]
    fn distance(a: &ndarray::ArrayView1<'_, f64>, b: &ndarray::ArrayView1<'_, f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Index of the closest centroid; the lowest index wins exact ties.
    fn nearest(point: &ndarray::ArrayView1<'_, f64>, centroids: &Array2<f64>) -> usize {
        let mut best_cluster = 0;
        let mut best_dist = f64::MAX;
        for c in 0..centroids.nrows() {
            let dist = Self::distance(point, &centroids.row(c));
            if dist < best_dist {
                best_dist = dist;
                best_cluster = c;
            }
        }
        best_cluster
    }

    /// One full assignment pass. Returns whether any label changed.
    fn assign(data: &Array2<f64>, centroids: &Array2<f64>, labels: &mut [usize]) -> bool {
        #[cfg(feature = "parallel")]
        {
            labels
                .par_iter_mut()
                .enumerate()
                .map(|(i, label)| {
                    let best = Self::nearest(&data.row(i), centroids);
                    let changed = *label != best;
                    *label = best;
                    changed
                })
                .reduce(|| false, |a, b| a || b)
        }

        #[cfg(not(feature = "parallel"))]
        {
            let mut changed = false;
            for (i, label) in labels.iter_mut().enumerate() {
                let best = Self::nearest(&data.row(i), centroids);
                if *label != best {
                    *label = best;
                    changed = true;
                }
            }
            changed
        }
    }

    /// Run the full fit: k-means++ seeding, then Lloyd refinement.
    ///
    /// Returns labels index-aligned with `data`, the final centroids for
    /// all `k` requested slots, and how the loop stopped.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] for empty data,
    /// [`Error::InvalidClusterCount`] for `k == 0`, and
    /// [`Error::DimensionMismatch`] for ragged rows. `k` greater than the
    /// number of rows is not an error: seeding samples with replacement.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KmeansFit> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 {
            return Err(Error::InvalidClusterCount { requested: self.k });
        }

        let n = data.len();
        let d = data[0].len();

        let mut flat: Vec<f64> = Vec::with_capacity(n * d);
        for point in data {
            if point.len() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: point.len(),
                });
            }
            flat.extend(point);
        }
        let data_arr =
            Array2::from_shape_vec((n, d), flat).map_err(|e| Error::Other(e.to_string()))?;

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut centroids = self.init_centroids(&data_arr, &mut rng);

        // usize::MAX marks "no pass has labeled this row yet"; the first
        // assignment always overwrites it.
        let mut labels = vec![usize::MAX; n];
        let mut iterations = 0;

        let termination = loop {
            let changed = Self::assign(&data_arr, &centroids, &mut labels);

            if !changed {
                break Termination::Converged { iterations };
            }
            if iterations >= self.max_iter {
                break Termination::IterationCapped { iterations };
            }

            // Update step.
            let mut new_centroids = Array2::zeros((self.k, d));
            let mut counts = vec![0usize; self.k];

            for i in 0..n {
                let c = labels[i];
                for j in 0..d {
                    new_centroids[[c, j]] += data_arr[[i, j]];
                }
                counts[c] += 1;
            }

            for c in 0..self.k {
                if counts[c] > 0 {
                    for j in 0..d {
                        new_centroids[[c, j]] /= counts[c] as f64;
                    }
                } else {
                    // Empty cluster: re-seed from a random row.
                    let idx = rng.random_range(0..n);
                    new_centroids.row_mut(c).assign(&data_arr.row(idx));
                }
            }

            centroids = new_centroids;
            iterations += 1;
        };

        debug!(
            k = self.k,
            n,
            iterations = termination.iterations(),
            converged = termination.converged(),
            "k-means refinement finished"
        );

        let centroids = (0..self.k).map(|c| centroids.row(c).to_vec()).collect();

        Ok(KmeansFit {
            labels,
            centroids,
            termination,
        })
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn two_groups() -> Vec<Vec<f64>> {
        vec![
            vec![0.10, 0.10, 0.10, 0.10, 0.10, 0.10],
            vec![0.12, 0.09, 0.11, 0.10, 0.08, 0.10],
            vec![0.09, 0.11, 0.10, 0.12, 0.10, 0.09],
            vec![0.90, 0.90, 0.90, 0.90, 0.90, 0.90],
            vec![0.88, 0.91, 0.90, 0.89, 0.92, 0.90],
            vec![0.91, 0.89, 0.88, 0.90, 0.90, 0.91],
        ]
    }

    #[test]
    fn test_kmeans_two_groups_converge_for_any_seed() {
        for seed in 0..10 {
            let fit = Kmeans::new(2).with_seed(seed).fit(&two_groups()).unwrap();

            assert!(fit.termination.converged(), "seed {seed} did not converge");
            assert_eq!(fit.labels[0], fit.labels[1]);
            assert_eq!(fit.labels[1], fit.labels[2]);
            assert_eq!(fit.labels[3], fit.labels[4]);
            assert_eq!(fit.labels[4], fit.labels[5]);
            assert_ne!(fit.labels[0], fit.labels[3], "seed {seed} merged the groups");
        }
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let data = two_groups();

        let fit1 = Kmeans::new(2).with_seed(42).fit(&data).unwrap();
        let fit2 = Kmeans::new(2).with_seed(42).fit(&data).unwrap();

        assert_eq!(fit1.labels, fit2.labels);
        assert_eq!(fit1.centroids, fit2.centroids);
        assert_eq!(fit1.termination, fit2.termination);
    }

    #[test]
    fn test_kmeans_returns_requested_centroid_slots() {
        // k = 4 over 6 points in two tight groups: at most 2..4 slots end
        // populated, but all 4 are returned.
        let fit = Kmeans::new(4).with_seed(7).fit(&two_groups()).unwrap();

        assert_eq!(fit.centroids.len(), 4);
        assert_eq!(fit.labels.len(), 6);
        assert!(fit.labels.iter().all(|&l| l < 4));
    }

    #[test]
    fn test_kmeans_k_exceeding_distinct_points() {
        // Three identical rows, k = 2: must terminate without failure and
        // populate at most one cluster.
        let data = vec![vec![0.5, 0.5]; 3];

        let fit = Kmeans::new(2).with_seed(1).fit(&data).unwrap();

        let populated: HashSet<usize> = fit.labels.iter().copied().collect();
        assert_eq!(populated.len(), 1);
        assert!(fit.termination.converged());
    }

    #[test]
    fn test_kmeans_max_iter_zero_skips_update() {
        let data = two_groups();
        let fit = Kmeans::new(2).with_seed(3).with_max_iter(0).fit(&data).unwrap();

        assert_eq!(fit.termination, Termination::IterationCapped { iterations: 0 });
        // No update ran, so every centroid is still a copy of an input row.
        for centroid in &fit.centroids {
            assert!(
                data.iter().any(|row| row == centroid),
                "centroid {centroid:?} is not an input row"
            );
        }
        assert!(fit.labels.iter().all(|&l| l < 2));
    }

    #[test]
    fn test_kmeans_converged_labels_are_assignment_fixed_point() {
        let data = two_groups();
        let fit = Kmeans::new(2).with_seed(11).fit(&data).unwrap();
        assert!(fit.termination.converged());

        // Re-run the assignment step alone against the reported centroids.
        for (i, point) in data.iter().enumerate() {
            let mut best = 0;
            let mut best_dist = f64::MAX;
            for (c, centroid) in fit.centroids.iter().enumerate() {
                let dist = point
                    .iter()
                    .zip(centroid.iter())
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt();
                if dist < best_dist {
                    best_dist = dist;
                    best = c;
                }
            }
            assert_eq!(best, fit.labels[i], "label {i} moved on reassignment");
        }
    }

    #[test]
    fn test_kmeans_empty_input_error() {
        let data: Vec<Vec<f64>> = vec![];
        let err = Kmeans::new(2).fit(&data).unwrap_err();
        assert_eq!(err, Error::EmptyInput);
    }

    #[test]
    fn test_kmeans_zero_k_error() {
        let data = vec![vec![0.0, 0.0]];
        let err = Kmeans::new(0).fit(&data).unwrap_err();
        assert_eq!(err, Error::InvalidClusterCount { requested: 0 });
    }

    #[test]
    fn test_kmeans_ragged_rows_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0]];
        let err = Kmeans::new(1).fit(&data).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_fit_predict_matches_fit_labels() {
        let data = two_groups();
        let model = Kmeans::new(2).with_seed(5);

        let labels = model.fit_predict(&data).unwrap();
        let fit = model.fit(&data).unwrap();

        assert_eq!(labels, fit.labels);
        assert_eq!(model.n_clusters(), 2);
    }
}

//! Partition quality metrics.
//!
//! Two views of a finished partition:
//!
//! | Metric | Range | Best | Needs ground truth |
//! |--------|-------|------|--------------------|
//! | [`silhouette`] | [0, 1] | 1 | no |
//! | [`purity`] | (0, 1] | 1 | yes |
//!
//! [`silhouette`] is the internal quality gate: cohesion against
//! separation, no outside information. [`purity`] compares discovered
//! groups against the attack labels recorded with the traffic, which is
//! how an analyst sanity-checks a clustering against what the capture
//! already knew.
//!
//! The silhouette here floors per-point contributions at zero instead of
//! letting a point that sits closer to a foreign cluster go negative; see
//! [`silhouette`] for the exact rule.

use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Euclidean distance between two vectors.
///
/// ```rust
/// use sift::metrics::euclidean;
///
/// assert_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
/// ```
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Mean silhouette of a partition.
///
/// For point `i` in cluster `c`, with `a` the mean distance to the other
/// members of `c` (0 when `i` is alone) and `b` the smallest mean distance
/// to any other populated cluster:
///
/// ```text
/// s(i) = (b - a) / max(a, b)   when b > a, else 0
/// ```
///
/// The `else 0` arm floors the textbook formula: a point sitting closer to
/// a foreign cluster contributes nothing rather than a negative score, so
/// the aggregate stays in [0, 1]. Clusters that ended empty never appear
/// in the label set and are not candidates for `b`.
///
/// The caller must supply at least two distinct labels; the degenerate
/// single-cluster partition is scored 0 by convention upstream, not here.
/// O(n²) in the number of points, the dominant cost of the pipeline.
pub fn silhouette(features: &[Vec<f64>], labels: &[usize]) -> f64 {
    let clusters: BTreeSet<usize> = labels.iter().copied().collect();

    let point_score = |i: usize| -> f64 {
        let own = labels[i];

        let a = mean_distance(features, labels, i, own);
        let b = clusters
            .iter()
            .filter(|&&c| c != own)
            .map(|&c| mean_distance(features, labels, i, c))
            .fold(f64::INFINITY, f64::min);

        if b > a {
            (b - a) / a.max(b)
        } else {
            0.0
        }
    };

    #[cfg(feature = "parallel")]
    let total: f64 = (0..features.len()).into_par_iter().map(point_score).sum();

    #[cfg(not(feature = "parallel"))]
    let total: f64 = (0..features.len()).map(point_score).sum();

    total / features.len() as f64
}

/// Mean distance from point `i` to the members of cluster `c`, excluding
/// `i` itself. 0 when the cluster has no other members.
fn mean_distance(features: &[Vec<f64>], labels: &[usize], i: usize, c: usize) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (j, &label) in labels.iter().enumerate() {
        if j != i && label == c {
            sum += euclidean(&features[i], &features[j]);
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Purity of a partition against ground-truth classes.
///
/// Each cluster is credited with its most frequent class; purity is the
/// credited fraction of all points. Biased toward many small clusters, but
/// it maps directly onto the "dominant attack type per behavioral group"
/// reading used in triage.
///
/// Returns 0.0 when the inputs are empty or their lengths differ.
///
/// ```rust
/// use sift::metrics::purity;
///
/// let labels = [0, 0, 1, 1];
/// let truth = [7, 7, 7, 9];
/// assert_eq!(purity(&labels, &truth), 0.75);
/// ```
pub fn purity(labels: &[usize], truth: &[u32]) -> f64 {
    if labels.len() != truth.len() || labels.is_empty() {
        return 0.0;
    }

    let mut by_cluster: HashMap<usize, HashMap<u32, usize>> = HashMap::new();
    for (&label, &class) in labels.iter().zip(truth.iter()) {
        *by_cluster.entry(label).or_default().entry(class).or_insert(0) += 1;
    }

    let credited: usize = by_cluster
        .values()
        .map(|classes| classes.values().copied().max().unwrap_or(0))
        .sum();

    credited as f64 / labels.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_known_value() {
        assert_eq!(euclidean(&[1.0, 2.0], &[4.0, 6.0]), 5.0);
        assert_eq!(euclidean(&[0.5, 0.5], &[0.5, 0.5]), 0.0);
    }

    #[test]
    fn test_silhouette_perfect_separation() {
        // Two coincident points in one cluster, a singleton far away:
        // a = 0 everywhere, b > 0, so every point scores 1.
        let features = vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![10.0, 10.0]];
        let labels = vec![0, 0, 1];

        assert_eq!(silhouette(&features, &labels), 1.0);
    }

    #[test]
    fn test_silhouette_two_tight_groups() {
        let features = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![0.1, 0.0],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
            vec![10.0, 10.1],
        ];
        let labels = vec![0, 0, 0, 1, 1, 1];

        let score = silhouette(&features, &labels);
        assert!(score > 0.7, "expected strong separation, got {score}");
        assert!(score <= 1.0);
    }

    #[test]
    fn test_silhouette_floors_misassigned_point() {
        // p0 and p2 share a cluster despite being far apart, so a exceeds
        // b for both and they floor to 0 instead of going negative. Only
        // the singleton p1 scores.
        let features = vec![vec![0.0, 0.0], vec![0.1, 0.0], vec![10.0, 10.0]];
        let labels = vec![0, 1, 0];

        let score = silhouette(&features, &labels);

        // Hand-computed: s(p0) = 0 (a = 14.142, b = 0.1), s(p1) = 1
        // (a = 0, b = 7.086), s(p2) = 0 (a = 14.142, b = 14.072).
        assert!((score - 1.0 / 3.0).abs() < 1e-12, "got {score}");
        assert!(score >= 0.0);
    }

    #[test]
    fn test_silhouette_identical_points_two_labels() {
        // All distances are 0, so b > a never holds and the score is 0.
        let features = vec![vec![0.5, 0.5]; 4];
        let labels = vec![0, 0, 1, 1];

        assert_eq!(silhouette(&features, &labels), 0.0);
    }

    #[test]
    fn test_purity_perfect_partition() {
        let labels = [0, 0, 1, 1];
        let truth = [3, 3, 5, 5];
        assert_eq!(purity(&labels, &truth), 1.0);
    }

    #[test]
    fn test_purity_length_mismatch_scores_zero() {
        assert_eq!(purity(&[0, 1], &[1]), 0.0);
        assert_eq!(purity(&[], &[]), 0.0);
    }
}

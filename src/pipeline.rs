//! The clustering pipeline: records in, scored partition out.
//!
//! Wires the stages end to end: normalize → seed → refine → score →
//! assemble. [`cluster`] is the single entry contract (default cap of 100
//! refinement iterations, process-seeded randomness); [`cluster_with`]
//! takes a configured [`Kmeans`] for a custom cap or a pinned seed.
//!
//! Parsing and validating uploads, storage, identity, charts, and tables
//! all live outside; those collaborators invoke the pipeline and consume
//! the [`ClusterResult`] as an opaque value. The pipeline
//! runs synchronously to completion; a caller that needs a latency bound
//! must bound `n` and the iteration cap itself.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cluster::{Clustering, Kmeans, Termination};
use crate::error::{Error, Result};
use crate::features::{extract_features, FEATURE_NAMES};
use crate::metrics::silhouette;
use crate::record::{LabeledRecord, RequestRecord};

/// A cluster representative in normalized feature space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    /// Cluster id this centroid represents.
    pub cluster: i32,
    /// Centroid position, one value per feature.
    pub values: Vec<f64>,
    /// Attribute names aligned with `values`, so a consumer can label axes
    /// without knowing the normalization constants.
    pub features: Vec<String>,
}

/// Root output of one clustering call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    /// Number of clusters that ended up populated. May be below the
    /// requested k when slots finished empty.
    pub clusters: usize,
    /// Mean silhouette of the partition; exactly 0 when fewer than two
    /// clusters are populated.
    pub silhouette: f64,
    /// How refinement stopped.
    pub termination: Termination,
    /// Representatives of the populated clusters only.
    pub centroids: Vec<Centroid>,
    /// The input records, unchanged, merged with their cluster ids.
    pub records: Vec<LabeledRecord>,
}

/// Partition records into `k` behavioral groups.
///
/// # Errors
///
/// [`Error::EmptyInput`] when `records` is empty and
/// [`Error::InvalidClusterCount`] when `k` is zero; both are checked
/// before any other stage runs.
pub fn cluster(records: &[RequestRecord], k: usize) -> Result<ClusterResult> {
    cluster_with(records, Kmeans::new(k))
}

/// Partition records with a configured [`Kmeans`] model.
pub fn cluster_with(records: &[RequestRecord], model: Kmeans) -> Result<ClusterResult> {
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }
    if model.n_clusters() == 0 {
        return Err(Error::InvalidClusterCount { requested: 0 });
    }

    let features = extract_features(records);
    let fit = model.fit(&features)?;

    let populated: BTreeSet<usize> = fit.labels.iter().copied().collect();

    // Separation is undefined below two populated clusters; score 0 by
    // convention without running the O(n²) scorer.
    let score = if populated.len() > 1 {
        silhouette(&features, &fit.labels)
    } else {
        0.0
    };

    debug!(
        requested = model.n_clusters(),
        populated = populated.len(),
        silhouette = score,
        "assembled cluster result"
    );

    let centroids = populated
        .iter()
        .map(|&c| Centroid {
            cluster: c as i32,
            values: fit.centroids[c].clone(),
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        })
        .collect();

    let labeled = records
        .iter()
        .zip(fit.labels.iter())
        .map(|(record, &label)| LabeledRecord {
            record: record.clone(),
            cluster: label as i32,
        })
        .collect();

    Ok(ClusterResult {
        clusters: populated.len(),
        silhouette: score,
        termination: fit.termination,
        centroids,
        records: labeled,
    })
}

//! # sift
//!
//! Behavioral grouping of recorded web requests for security triage.
//!
//! The pipeline normalizes each record's six numeric attributes against
//! fixed ceilings, seeds centroids with k-means++, refines the partition
//! with Lloyd's algorithm, and judges the result with a floored silhouette
//! score. Everything arrives and leaves in memory: parsing, storage,
//! identity, and rendering live elsewhere and consume the
//! [`ClusterResult`] as an opaque value.
//!
//! Initialization is probabilistic by default; pin a seed through
//! [`Kmeans::with_seed`] and [`cluster_with`] for reproducible runs.

pub mod cluster;
/// Error types used across `sift`.
pub mod error;
pub mod features;
pub mod metrics;
pub mod pipeline;
pub mod record;
pub mod stats;


pub use cluster::{Clustering, Kmeans, KmeansFit, Termination};
pub use error::{Error, Result};
pub use features::{extract_features, feature_vector, FEATURE_CEILINGS, FEATURE_NAMES};
pub use metrics::{euclidean, purity, silhouette};
pub use pipeline::{cluster, cluster_with, Centroid, ClusterResult};
pub use record::{LabeledRecord, RequestRecord, UNASSIGNED};
pub use stats::{summarize, ClusterSummary, SeparationGrade};

//! Partitioning of normalized request features.
//!
//! One algorithm lives here: k-means with k-means++ seeding and Lloyd
//! refinement. It assumes roughly spherical groups of similar size and a
//! caller-chosen k, which fits the triage use case: the analyst asks for a
//! handful of behavioral buckets and inspects them, rather than trusting
//! the algorithm to discover structure on its own.
//!
//! ```rust
//! use sift::cluster::{Clustering, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

mod kmeans;
mod traits;

pub use kmeans::{Kmeans, KmeansFit, Termination};
pub use traits::Clustering;

//! Triage analytics over a clustered partition.
//!
//! Aggregates a labeled partition into the figures an analyst scans first:
//! group sizes, the attack label dominating each group, and mean traffic
//! shape. Downstream dashboards consume these instead of re-deriving them
//! from raw rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::LabeledRecord;

/// Aggregate view of one populated cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Cluster id.
    pub cluster: i32,
    /// Number of records in the cluster.
    pub count: usize,
    /// Fraction of all records that landed here.
    pub share: f64,
    /// Most frequent attack label; the lexicographically first label wins
    /// ties so output is deterministic.
    pub dominant_attack: String,
    /// Occurrences of the dominant attack label.
    pub dominant_attack_count: usize,
    /// Mean response time over the cluster, milliseconds.
    pub mean_response_time: f64,
    /// Mean request size over the cluster, bytes.
    pub mean_request_size: f64,
}

/// Summarize a labeled partition: one entry per populated cluster,
/// ordered by cluster id.
pub fn summarize(records: &[LabeledRecord]) -> Vec<ClusterSummary> {
    let mut groups: BTreeMap<i32, Vec<&LabeledRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.cluster).or_default().push(record);
    }

    let total = records.len();
    groups
        .into_iter()
        .map(|(cluster, members)| {
            let mut attacks: BTreeMap<&str, usize> = BTreeMap::new();
            for member in &members {
                *attacks.entry(member.record.attack_type.as_str()).or_insert(0) += 1;
            }
            // Ordered iteration plus strict `>` keeps the first label
            // among equals.
            let (dominant_attack, dominant_attack_count) =
                attacks.into_iter().fold(("", 0usize), |best, (name, count)| {
                    if count > best.1 {
                        (name, count)
                    } else {
                        best
                    }
                });

            let count = members.len();
            let mean_response_time =
                members.iter().map(|m| m.record.response_time).sum::<f64>() / count as f64;
            let mean_request_size =
                members.iter().map(|m| m.record.request_size).sum::<f64>() / count as f64;

            ClusterSummary {
                cluster,
                count,
                share: count as f64 / total as f64,
                dominant_attack: dominant_attack.to_string(),
                dominant_attack_count,
                mean_response_time,
                mean_request_size,
            }
        })
        .collect()
}

/// Qualitative reading of a silhouette score.
///
/// The bands follow the usual rule of thumb: above 0.7 strong structure,
/// above 0.5 reasonable separation, above 0.25 weak boundaries, anything
/// else no substantial clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeparationGrade {
    /// Dense, clearly separated groups.
    Strong,
    /// Distinct groups with some overlap.
    Reasonable,
    /// Boundaries too soft to trust on their own.
    Weak,
    /// No meaningful grouping.
    None,
}

impl SeparationGrade {
    /// Grade a silhouette score.
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            SeparationGrade::Strong
        } else if score > 0.5 {
            SeparationGrade::Reasonable
        } else if score > 0.25 {
            SeparationGrade::Weak
        } else {
            SeparationGrade::None
        }
    }
}

//! Fixed-ceiling feature normalization.
//!
//! Each record maps to a 6-dimensional vector by dividing every numeric
//! attribute by a hardcoded ceiling. Fixed ceilings keep distances
//! comparable across independent calls and datasets without a min/max pass
//! over the data; the cost is that an outlier record can exceed 1.0 in a
//! component, which is accepted and never clamped.

use crate::record::RequestRecord;

/// Attribute names, in feature-vector order.
pub const FEATURE_NAMES: [&str; 6] = [
    "request_size",
    "response_size",
    "response_time",
    "url_length",
    "param_count",
    "user_agent_length",
];

/// Normalization ceilings, index-aligned with [`FEATURE_NAMES`].
pub const FEATURE_CEILINGS: [f64; 6] = [10_000.0, 50_000.0, 10_000.0, 2_000.0, 50.0, 500.0];

/// Map one record to its normalized feature vector.
pub fn feature_vector(record: &RequestRecord) -> Vec<f64> {
    vec![
        record.request_size / FEATURE_CEILINGS[0],
        record.response_size / FEATURE_CEILINGS[1],
        record.response_time / FEATURE_CEILINGS[2],
        record.url_length / FEATURE_CEILINGS[3],
        record.param_count / FEATURE_CEILINGS[4],
        record.user_agent_length / FEATURE_CEILINGS[5],
    ]
}

/// Map records to feature vectors, index-aligned with the input.
pub fn extract_features(records: &[RequestRecord]) -> Vec<Vec<f64>> {
    records.iter().map(feature_vector).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(request_size: f64, response_size: f64, response_time: f64) -> RequestRecord {
        RequestRecord {
            id: 1,
            request_size,
            response_size,
            response_time,
            http_method: "GET".to_string(),
            status_code: 200,
            url_length: 100.0,
            param_count: 5.0,
            user_agent_length: 250.0,
            is_ajax: false,
            attack_type_id: 0,
            attack_type: "benign".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_feature_vector_divides_by_ceilings() {
        let v = feature_vector(&record(2500.0, 25_000.0, 5000.0));

        assert_eq!(v, vec![0.25, 0.5, 0.5, 0.05, 0.1, 0.5]);
    }

    #[test]
    fn test_feature_vector_over_ceiling_not_clamped() {
        // 20000 bytes against a 10000 ceiling: 2.0, kept as-is.
        let v = feature_vector(&record(20_000.0, 0.0, 0.0));

        assert_eq!(v[0], 2.0);
        assert_eq!(v[1], 0.0);
    }

    #[test]
    fn test_extract_features_index_aligned() {
        let records = vec![
            record(1000.0, 0.0, 0.0),
            record(2000.0, 0.0, 0.0),
            record(3000.0, 0.0, 0.0),
        ];

        let features = extract_features(&records);

        assert_eq!(features.len(), 3);
        assert_eq!(features[0][0], 0.1);
        assert_eq!(features[1][0], 0.2);
        assert_eq!(features[2][0], 0.3);
    }

    #[test]
    fn test_names_and_ceilings_aligned() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_CEILINGS.len());
        assert!(FEATURE_CEILINGS.iter().all(|&c| c > 0.0));
    }
}

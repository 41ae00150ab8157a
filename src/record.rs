//! Web request records and their labeled output form.

use serde::{Deserialize, Serialize};

/// Cluster id reserved for rows no clustering pass has labeled yet.
///
/// The pipeline itself labels every record it is given; the sentinel exists
/// for downstream tables that render partially processed data.
pub const UNASSIGNED: i32 = -1;

/// One recorded web request/response.
///
/// The six numeric attributes drive clustering. Everything else is
/// descriptive metadata that is carried through to the output unchanged and
/// never read by the algorithm. Numeric attributes are non-negative;
/// validation happens before records reach this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Record identifier.
    pub id: u64,
    /// Request body size in bytes.
    pub request_size: f64,
    /// Response body size in bytes.
    pub response_size: f64,
    /// Server response time in milliseconds.
    pub response_time: f64,
    /// HTTP method.
    pub http_method: String,
    /// HTTP status code.
    pub status_code: u16,
    /// Length of the requested URL.
    pub url_length: f64,
    /// Number of query/body parameters.
    pub param_count: f64,
    /// Length of the User-Agent header.
    pub user_agent_length: f64,
    /// Whether the request was an XHR call.
    pub is_ajax: bool,
    /// Numeric id of the labeled attack class.
    pub attack_type_id: u32,
    /// Human-readable attack label.
    pub attack_type: String,
    /// Free-text description.
    pub description: String,
}

/// A record merged with the cluster id it was assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    /// The original record, unchanged.
    #[serde(flatten)]
    pub record: RequestRecord,
    /// Assigned cluster id. [`UNASSIGNED`] appears only in downstream
    /// display paths, never in pipeline output.
    pub cluster: i32,
}

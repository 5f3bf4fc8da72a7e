//! Business candidate returned by discovery

use serde::{Deserialize, Serialize};

/// One plausible business match for a free-text query
///
/// Every field is required on the wire; a response missing any of them is
/// rejected as malformed rather than filled with defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Opaque identifier chosen by the oracle
    pub id: String,
    pub name: String,
    /// Full street address
    pub address: String,
    /// Average star rating, expected 0-5
    pub rating: f64,
    pub review_count: u64,
    /// One sentence to help the user tell similar places apart
    pub description: String,
}

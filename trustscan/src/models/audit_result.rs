//! Authenticity report returned by the audit

use serde::{Deserialize, Serialize};

/// Review authenticity report for one business
///
/// Values are kept exactly as the oracle reported them. Percentages are not
/// clamped and the sentiment split is not forced to sum to 100; display code
/// clamps what it draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub business_name: String,
    pub address: String,
    /// Share of reviews judged organic (0-100)
    pub real_percentage: f64,
    /// Oracle's self-reported confidence in `real_percentage` (0-100)
    pub confidence_score: f64,
    pub sentiment_breakdown: SentimentBreakdown,
}

/// Three-way sentiment split, expected to sum to 100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentBreakdown {
    /// Sum as reported (not corrected)
    pub fn total(&self) -> f64 {
        self.positive + self.negative + self.neutral
    }
}

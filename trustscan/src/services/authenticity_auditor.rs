//! Authenticity Auditor
//!
//! Asks the oracle for a review authenticity report on one selected
//! candidate. Only the candidate's name and address reach the prompt.

use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

use super::oracle::{GenerativeOracle, OracleError, OracleRequest};
use crate::models::{AuditResult, Candidate};

pub const DEFAULT_AUDIT_MODEL: &str = "gemini-3-pro-preview";

/// User-facing message for every audit failure
pub const AUDIT_FAILED_MESSAGE: &str = "Failed to audit this place. Try another.";

/// Audit failure
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit request failed: {0}")]
    Transport(#[from] OracleError),

    /// Missing, empty or schema-violating response body
    #[error("audit response is not a valid report: {0}")]
    MalformedResponse(String),
}

impl AuditError {
    /// Message shown to the user regardless of cause
    pub fn user_message(&self) -> &'static str {
        AUDIT_FAILED_MESSAGE
    }
}

/// Produces review authenticity reports
pub struct AuthenticityAuditor {
    oracle: Arc<dyn GenerativeOracle>,
    model: String,
}

impl AuthenticityAuditor {
    pub fn new(oracle: Arc<dyn GenerativeOracle>, model: impl Into<String>) -> Self {
        Self {
            oracle,
            model: model.into(),
        }
    }

    /// Audit the reviews of `candidate`
    ///
    /// Returned numbers are passed through untouched.
    pub async fn audit(&self, candidate: &Candidate) -> Result<AuditResult, AuditError> {
        let request = OracleRequest {
            model: self.model.clone(),
            prompt: audit_prompt(&candidate.name, &candidate.address),
            response_schema: audit_result_schema(),
            web_search: true,
        };

        let text = self.oracle.generate(&request).await?;
        let result = parse_audit_result(&text)?;

        tracing::info!(
            business = %result.business_name,
            real_percentage = result.real_percentage,
            confidence_score = result.confidence_score,
            "Authenticity audit completed"
        );

        Ok(result)
    }
}

fn audit_prompt(name: &str, address: &str) -> String {
    format!(
        "Perform a high-precision authenticity and sentiment audit of Google reviews \
         for \"{name}\" at \"{address}\".\n\
         \n\
         TASKS:\n\
         1. Analyze patterns to determine what % of reviews are REAL (organic) vs fake.\n\
         2. Calculate your confidence in this assessment based on search grounding.\n\
         3. Analyze the overall sentiment of the reviews found.\n\
         \n\
         Return the results in JSON format including:\n\
         - realPercentage (0-100)\n\
         - confidenceScore (0-100)\n\
         - sentimentBreakdown: positive, negative, and neutral percentages (must sum to 100)."
    )
}

/// Response schema: AuditResult object, every field required
pub fn audit_result_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "businessName": { "type": "STRING" },
            "address": { "type": "STRING" },
            "realPercentage": { "type": "NUMBER" },
            "confidenceScore": { "type": "NUMBER" },
            "sentimentBreakdown": {
                "type": "OBJECT",
                "properties": {
                    "positive": { "type": "NUMBER" },
                    "negative": { "type": "NUMBER" },
                    "neutral": { "type": "NUMBER" }
                },
                "required": ["positive", "negative", "neutral"]
            }
        },
        "required": [
            "businessName",
            "address",
            "realPercentage",
            "confidenceScore",
            "sentimentBreakdown"
        ]
    })
}

fn parse_audit_result(text: &str) -> Result<AuditResult, AuditError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AuditError::MalformedResponse("empty response".to_string()));
    }
    serde_json::from_str(text).map_err(|e| AuditError::MalformedResponse(e.to_string()))
}

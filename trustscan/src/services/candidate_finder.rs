//! Candidate Finder
//!
//! One round trip: free-text query in, up to [`MAX_CANDIDATES`] grounded
//! business matches out. Keeps no state between calls.

use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

use super::oracle::{GenerativeOracle, OracleError, OracleRequest};
use crate::models::Candidate;

pub const DEFAULT_DISCOVERY_MODEL: &str = "gemini-3-flash-preview";

/// Upper bound on candidates handed to the user
pub const MAX_CANDIDATES: usize = 5;

/// User-facing message for every discovery failure
pub const DISCOVERY_FAILED_MESSAGE: &str =
    "Could not find matching businesses. Try a more specific name.";

/// Candidate search failure
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("candidate search request failed: {0}")]
    Transport(#[from] OracleError),

    #[error("candidate search response is not a valid candidate list: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

impl DiscoveryError {
    /// Message shown to the user regardless of cause
    pub fn user_message(&self) -> &'static str {
        DISCOVERY_FAILED_MESSAGE
    }
}

/// Finds real-world businesses matching a query
pub struct CandidateFinder {
    oracle: Arc<dyn GenerativeOracle>,
    model: String,
}

impl CandidateFinder {
    pub fn new(oracle: Arc<dyn GenerativeOracle>, model: impl Into<String>) -> Self {
        Self {
            oracle,
            model: model.into(),
        }
    }

    /// Look up businesses matching `query`
    ///
    /// `query` must already be trimmed and non-blank. An empty list is a
    /// successful outcome; the caller decides how to present it.
    pub async fn find_candidates(&self, query: &str) -> Result<Vec<Candidate>, DiscoveryError> {
        let request = OracleRequest {
            model: self.model.clone(),
            prompt: discovery_prompt(query),
            response_schema: candidate_list_schema(),
            web_search: true,
        };

        let text = self.oracle.generate(&request).await?;
        let mut candidates = parse_candidates(&text)?;

        if candidates.len() > MAX_CANDIDATES {
            tracing::warn!(
                returned = candidates.len(),
                kept = MAX_CANDIDATES,
                "Oracle returned more candidates than requested; truncating"
            );
            candidates.truncate(MAX_CANDIDATES);
        }

        tracing::info!(query = %query, count = candidates.len(), "Candidate search completed");
        Ok(candidates)
    }
}

fn discovery_prompt(query: &str) -> String {
    format!(
        "Search for businesses matching: \"{query}\".\n\
         Provide a list of up to {MAX_CANDIDATES} specific businesses with their names, \
         full addresses, average star ratings, and review counts.\n\
         Include a short 1-sentence description for each to help the user identify it."
    )
}

/// Response schema: array of Candidate objects, every field required
pub fn candidate_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "name": { "type": "STRING" },
                "address": { "type": "STRING" },
                "rating": { "type": "NUMBER" },
                "reviewCount": { "type": "INTEGER" },
                "description": { "type": "STRING" }
            },
            "required": ["id", "name", "address", "rating", "reviewCount", "description"]
        }
    })
}

/// Empty text means "no matches"
fn parse_candidates(text: &str) -> Result<Vec<Candidate>, DiscoveryError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(DiscoveryError::MalformedResponse)
}

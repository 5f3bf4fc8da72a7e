//! Generative oracle abstraction

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Transport-level oracle failures
#[derive(Debug, Error)]
pub enum OracleError {
    /// No API key was configured; no request was sent
    #[error("API key not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    /// Credential rejected (HTTP 401/403)
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response envelope could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One prompt-and-schema request
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    /// Model identifier, e.g. "gemini-3-flash-preview"
    pub model: String,
    pub prompt: String,
    /// JSON schema the response text must conform to
    pub response_schema: Value,
    /// Enable live web-search grounding
    pub web_search: bool,
}

/// A remote generative-language service
///
/// Implementations return the raw response text, which callers parse against
/// `response_schema`. An empty string means the service produced no text.
#[async_trait]
pub trait GenerativeOracle: Send + Sync {
    async fn generate(&self, request: &OracleRequest) -> Result<String, OracleError>;
}

//! Generative Language API client
//!
//! Sends `generateContent` requests with a JSON response schema and optional
//! Google Search grounding, and returns the concatenated response text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::oracle::{GenerativeOracle, OracleError, OracleRequest};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const USER_AGENT: &str = concat!("TrustScan/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client settings
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `None` makes every call fail with [`OracleError::MissingApiKey`]
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

// Wire types for generateContent

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeneratedCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeneratedCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &'a OracleRequest) -> Self {
        let tools = if request.web_search {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: &request.prompt,
                }],
            }],
            tools,
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
            },
        }
    }
}

impl GenerateContentResponse {
    /// Text of the first candidate, all text parts joined
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Generative Language API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, OracleError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::Network(e.to_string()))?;

        let api_key = config.api_key.filter(|k| !k.trim().is_empty());

        Ok(Self {
            http_client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl GenerativeOracle for GeminiClient {
    async fn generate(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let api_key = self.api_key.as_deref().ok_or(OracleError::MissingApiKey)?;

        let url = self.endpoint(&request.model);
        let body = GenerateContentRequest::from_request(request);

        tracing::debug!(
            model = %request.model,
            web_search = request.web_search,
            prompt_len = request.prompt.len(),
            "Sending generateContent request"
        );

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Network(e.to_string()))?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(OracleError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OracleError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Parse(e.to_string()))?;

        let text = envelope.text();
        tracing::debug!(
            model = %request.model,
            text_len = text.len(),
            "generateContent response received"
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request(web_search: bool) -> OracleRequest {
        OracleRequest {
            model: "gemini-3-flash-preview".to_string(),
            prompt: "Find things".to_string(),
            response_schema: json!({"type": "ARRAY"}),
            web_search,
        }
    }

    #[test]
    fn test_request_body_shape() {
        let request = sample_request(true);
        let body = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Find things");
        assert_eq!(body["tools"][0]["google_search"], json!({}));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    }

    #[test]
    fn test_tools_omitted_without_web_search() {
        let request = sample_request(false);
        let body = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_response_text_joins_parts() {
        let envelope: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "[{\"a\":"}, {"text": "1}]"}]}
            }]
        }))
        .unwrap();

        assert_eq!(envelope.text(), "[{\"a\":1}]");
    }

    #[test]
    fn test_response_without_candidates_is_empty_text() {
        let envelope: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "OTHER"}})).unwrap();

        assert_eq!(envelope.text(), "");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: Some("k".to_string()),
            base_url: "http://localhost:1234/".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert_eq!(
            client.endpoint("m"),
            "http://localhost:1234/v1beta/models/m:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: Some("   ".to_string()),
            // Unroutable; must never be contacted
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert!(!client.has_api_key());
        let result = client.generate(&sample_request(true)).await;
        assert!(matches!(result, Err(OracleError::MissingApiKey)));
    }
}

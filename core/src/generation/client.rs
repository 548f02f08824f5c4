use super::{Generation, GenerationError, GenerationRequest, TextGenerator};
use crate::config::env_parse;
use crate::{AabError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for GeminiClient loaded from environment variables
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String, // e.g., https://generativelanguage.googleapis.com/v1beta
    /// Tried in order until one answers
    pub models: Vec<String>,
    pub api_key: Option<String>,
    pub request_timeout_ms: u64,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("GEMINI_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            models: std::env::var("GEMINI_MODELS")
                .ok()
                .map(|s| parse_model_list(&s))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    ["gemini-1.5-flash", "gemini-1.5-flash-latest", "gemini-pro"]
                        .iter()
                        .map(|m| m.to_string())
                        .collect()
                }),
            api_key: std::env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS").unwrap_or(30_000),
            top_p: 0.95,
            top_k: 40,
        }
    }
}

fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

/// HTTP client for the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    cfg: GeminiConfig,
}

impl GeminiClient {
    pub fn new(cfg: GeminiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(|e| AabError::ConfigError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, cfg })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::default())
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.cfg
    }

    async fn generate_with_model(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerationRequest,
    ) -> std::result::Result<Generation, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.cfg.base_url.trim_end_matches('/'),
            model
        );
        debug!(target = "gemini_client", model, "POST {}", url);

        let body = json!({
            "systemInstruction": { "parts": [{ "text": request.system }] },
            "contents": [{ "role": "user", "parts": [{ "text": request.user }] }],
            "generationConfig": {
                "temperature": request.temperature,
                "topP": self.cfg.top_p,
                "topK": self.cfg.top_k,
            },
        });

        let resp = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(classify_failure(model, status, text));
        }

        let val: Value = resp
            .json()
            .await
            .map_err(|e| GenerationError::Http(format!("Failed to parse response JSON: {e}")))?;
        let text = extract_text(&val).ok_or(GenerationError::EmptyResponse)?;
        Ok(Generation {
            text,
            model: Some(
                val.get("modelVersion")
                    .and_then(|v| v.as_str())
                    .unwrap_or(model)
                    .to_string(),
            ),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    /// Try each configured model in order.
    /// Contract:
    /// - Output: first successful generation
    /// - Error: a non-retryable failure immediately, else `AllModelsFailed`
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<Generation, GenerationError> {
        let api_key = self
            .cfg
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let mut last: Option<GenerationError> = None;
        for model in &self.cfg.models {
            match self.generate_with_model(model, api_key, request).await {
                Ok(generation) => return Ok(generation),
                Err(err) if err.is_retryable() => {
                    warn!(target = "gemini_client", model = %model, error = %err, "Model failed; trying next");
                    last = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(GenerationError::AllModelsFailed {
            attempts: self.cfg.models.len(),
            last: last
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no models configured".to_string()),
        })
    }
}

fn classify_failure(model: &str, status: StatusCode, body: String) -> GenerationError {
    let lowered = body.to_lowercase();
    let unknown_model = status == StatusCode::NOT_FOUND
        || (status == StatusCode::BAD_REQUEST
            && lowered.contains("model")
            && (lowered.contains("not found") || lowered.contains("not supported")));
    if unknown_model {
        GenerationError::ModelNotFound(model.to_string())
    } else {
        GenerationError::Api {
            status: status.as_u16(),
            body,
        }
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(v: &Value) -> Option<String> {
    let parts = v
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_joins_parts() {
        let v = json!({
            "candidates": [{ "content": { "parts": [{ "text": "SECTION 1: " }, { "text": "سلام" }] } }]
        });
        assert_eq!(extract_text(&v).as_deref(), Some("SECTION 1: سلام"));
    }

    #[test]
    fn test_extract_text_missing() {
        assert!(extract_text(&json!({ "candidates": [] })).is_none());
        assert!(extract_text(&json!({ "candidates": [{ "content": { "parts": [] } }] })).is_none());
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(
            classify_failure("m", StatusCode::NOT_FOUND, String::new()),
            GenerationError::ModelNotFound(_)
        ));
        assert!(matches!(
            classify_failure(
                "m",
                StatusCode::BAD_REQUEST,
                "models/m is not found for API version v1beta".into()
            ),
            GenerationError::ModelNotFound(_)
        ));
        let err = classify_failure("m", StatusCode::FORBIDDEN, "denied".into());
        assert!(!err.is_retryable());
        let err = classify_failure("m", StatusCode::SERVICE_UNAVAILABLE, String::new());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_parse_model_list() {
        assert_eq!(parse_model_list(" a, ,b "), vec!["a", "b"]);
        assert!(parse_model_list("").is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new(GeminiConfig {
            base_url: "http://127.0.0.1:9".into(),
            models: vec!["m".into()],
            api_key: None,
            request_timeout_ms: 1_000,
            top_p: 0.95,
            top_k: 40,
        })
        .unwrap();
        let req = GenerationRequest {
            system: "s".into(),
            user: "u".into(),
            temperature: 0.2,
        };
        assert!(matches!(
            client.generate(&req).await,
            Err(GenerationError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_exhausts_models() {
        let client = GeminiClient::new(GeminiConfig {
            base_url: "http://127.0.0.1:9".into(),
            models: vec!["a".into(), "b".into()],
            api_key: Some("k".into()),
            request_timeout_ms: 1_000,
            top_p: 0.95,
            top_k: 40,
        })
        .unwrap();
        let req = GenerationRequest {
            system: "s".into(),
            user: "u".into(),
            temperature: 0.2,
        };
        match client.generate(&req).await {
            Err(GenerationError::AllModelsFailed { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

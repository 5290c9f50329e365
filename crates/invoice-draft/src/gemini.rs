//! Gemini HTTP client implementing [`GenerativeModel`]
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::model::{GenerativeModel, ProviderError};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            request_timeout_ms: 60_000,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    cfg: GeminiConfig,
}

impl GeminiClient {
    pub fn new(cfg: GeminiConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, cfg })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.cfg.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<Value, ProviderError> {
        let url = self.endpoint(model);
        debug!(target: "gemini_client", "POST {}", url);

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.cfg.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let val: Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(lift_candidate_text(val))
    }
}

/// Copy the concatenated parts of the first candidate into a top-level
/// `text` field, the way the vendor SDK exposes it. Bodies without
/// candidate text are returned unchanged.
pub fn lift_candidate_text(mut body: Value) -> Value {
    let text = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .filter(|t| !t.is_empty());

    if let (Some(text), Some(obj)) = (text, body.as_object_mut()) {
        obj.insert("text".to_string(), Value::String(text));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifts_candidate_parts_into_text() {
        let body = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "Sure! " }, { "text": "{\"a\":1}" }]
                },
                "finishReason": "STOP"
            }]
        });
        let lifted = lift_candidate_text(body);
        assert_eq!(lifted["text"], "Sure! {\"a\":1}");
        assert_eq!(crate::shape::response_text(&lifted), "Sure! {\"a\":1}");
    }

    #[test]
    fn leaves_other_shapes_alone() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert_eq!(lift_candidate_text(body.clone()), body);
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let mut cfg = GeminiConfig::new("k");
        cfg.base_url = "http://localhost:9000/v1beta/".to_string();
        let client = GeminiClient::new(cfg).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.0-flash"),
            "http://localhost:9000/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn debug_redacts_key() {
        let cfg = GeminiConfig::new("secret-key");
        assert!(!format!("{cfg:?}").contains("secret-key"));
    }
}

//! Google Gemini backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::prompt::{commentary_prompt, move_prompt, parse_suggestion};
use crate::{AdviceRequest, Advisor, AdvisorError, CommentaryRequest, Suggestion};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
/// Environment variables searched for an API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Connection settings for [`GeminiAdvisor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    /// Taken from the environment when absent
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Per-request transport timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            request_timeout_ms: 20_000,
        }
    }
}

impl GeminiConfig {
    /// Fills `api_key` from the first non-empty variable in [`API_KEY_VARS`].
    pub fn resolve_api_key(mut self) -> Self {
        if self.api_key.as_deref().map_or(true, str::is_empty) {
            self.api_key = API_KEY_VARS
                .iter()
                .filter_map(|var| std::env::var(var).ok())
                .find(|v| !v.trim().is_empty());
        }
        self
    }
}

pub struct GeminiAdvisor {
    client: reqwest::Client,
    config: GeminiConfig,
    name: String,
}

impl GeminiAdvisor {
    pub fn new(config: GeminiConfig) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        let name = format!("gemini:{}", config.model);
        Ok(Self {
            client,
            config,
            name,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Sends one prompt and returns the text of the first candidate.
    async fn generate(&self, prompt: String, json: bool) -> Result<String, AdvisorError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AdvisorError::MissingApiKey {
                vars: API_KEY_VARS.join(" or "),
            })?;

        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: json.then(|| GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        };

        debug!(model = %self.config.model, json, "sending generateContent");
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.first_text().ok_or(AdvisorError::EmptyResponse)
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    async fn recommend_move(&self, request: &AdviceRequest) -> Result<Suggestion, AdvisorError> {
        let text = self.generate(move_prompt(request), true).await?;
        parse_suggestion(&text)
    }

    async fn commentary(&self, request: &CommentaryRequest) -> Result<String, AdvisorError> {
        self.generate(commentary_prompt(request), false).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Wire types for the generateContent endpoint
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, if any.
    fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_camel_case() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some("hi".to_string()),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn response_text_is_extracted() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"from\":"},{"text":"[1,4],\"to\":[3,4]}"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text = parsed.first_text().unwrap();
        assert_eq!(text, r#"{"from":[1,4],"to":[3,4]}"#);
    }

    #[test]
    fn empty_response_has_no_text() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(parsed.first_text().is_none());
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.first_text().is_none());
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        let advisor = GeminiAdvisor::new(GeminiConfig {
            endpoint: "http://localhost:9000/v1beta/".to_string(),
            model: "test-model".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            advisor.url(),
            "http://localhost:9000/v1beta/models/test-model:generateContent"
        );
        assert_eq!(advisor.name(), "gemini:test-model");
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let advisor = GeminiAdvisor::new(GeminiConfig::default()).unwrap();
        let request = CommentaryRequest {
            notation: "e4".to_string(),
            evaluation: 0,
        };
        let err = advisor.commentary(&request).await.unwrap_err();
        assert!(matches!(err, AdvisorError::MissingApiKey { .. }));
    }
}

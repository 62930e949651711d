//! Gemini `generateContent` client.
//!
//! Credentials and sampling parameters come from an explicit [`ModelConfig`]
//! handed to [`ChatGemini::new`]; the client never reads the environment on its
//! own. [`ModelConfig::from_env`] exists for the binary's startup path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{LlmClient, LlmError, LlmResponse, LlmUsage};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const ENV_API_KEY: &str = "GOOGLE_API_KEY";
const ENV_MODEL: &str = "REACT_MODEL";
const ENV_BASE_URL: &str = "GEMINI_BASE_URL";

/// Model selection, credentials and sampling controls.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Randomness, 0.0–1.0.
    pub temperature: f32,
    /// Nucleus sampling, 0.0–1.0.
    pub top_p: f32,
    /// Number of candidate tokens considered.
    pub top_k: u32,
    pub max_output_tokens: Option<u32>,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: None,
        }
    }

    /// Reads `GOOGLE_API_KEY` (required), `REACT_MODEL` and `GEMINI_BASE_URL`.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var(ENV_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingApiKey(ENV_API_KEY))?;
        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var(ENV_MODEL) {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_sampling(mut self, temperature: f32, top_p: f32, top_k: u32) -> Self {
        self.temperature = temperature;
        self.top_p = top_p;
        self.top_k = top_k;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

/// Gemini model client over HTTPS.
pub struct ChatGemini {
    http: reqwest::Client,
    config: ModelConfig,
}

impl ChatGemini {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        let mut generation = json!({
            "temperature": self.config.temperature,
            "topP": self.config.top_p,
            "topK": self.config.top_k,
        });
        if let Some(max) = self.config.max_output_tokens {
            generation["maxOutputTokens"] = json!(max);
        }
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": generation,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

/// Extracts the first candidate's text and usage from a response body.
fn parse_generate_response(body: &str) -> Result<LlmResponse, LlmError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Malformed(e.to_string()))?;
    let content: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if content.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    let usage = parsed.usage_metadata.map(|u| LlmUsage {
        prompt_tokens: u.prompt_token_count,
        completion_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    });
    Ok(LlmResponse { content, usage })
}

#[async_trait]
impl LlmClient for ChatGemini {
    async fn invoke(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "gemini request");
        let response = self
            .http
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited(body));
        }
        if !status.is_success() {
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }
        let parsed = parse_generate_response(&body)?;
        if let Some(ref u) = parsed.usage {
            tracing::debug!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                "gemini usage"
            );
        }
        Ok(parsed)
    }
}

//! Remote language-model client.
//!
//! [`LlmClient`] is the single outbound call of the program: "generate text
//! for this prompt". [`GeminiClient`] implements it against the Gemini
//! `generateContent` REST endpoint with a blocking HTTP client. There is
//! no retry or backoff; a failed call is returned to the caller as an
//! [`LlmError`].

use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::LlmConfig;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Text generation backend.
pub trait LlmClient {
    /// Model identifier, for logging.
    fn model(&self) -> &str;

    /// Send `prompt` and return the generated text. Blocks until the
    /// server answers (or the configured timeout fires).
    fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn new(api_key: String, config: &LlmConfig) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::NotConfigured("empty API key".to_string()));
        }
        // reqwest's blocking client defaults to a 30s timeout; `None` removes it.
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl LlmClient for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = build_request_body(prompt, self.temperature, self.max_output_tokens);

        debug!(model = %self.model, prompt_chars = prompt.len(), "gemini request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json()?;
        parse_response(&json)
    }
}

/// Request body for a single-turn user prompt.
pub fn build_request_body(prompt: &str, temperature: f32, max_output_tokens: u32) -> serde_json::Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }],
        }],
        "generationConfig": {
            "temperature": temperature,
            "maxOutputTokens": max_output_tokens,
        },
    })
}

/// Concatenate the text parts of the first candidate.
pub fn parse_response(json: &serde_json::Value) -> Result<String, LlmError> {
    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| {
            let reason = json["promptFeedback"]["blockReason"]
                .as_str()
                .map(|r| format!(" (prompt blocked: {})", r))
                .unwrap_or_default();
            LlmError::Parse(format!("missing candidates[0].content.parts{}", reason))
        })?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.is_empty() {
        return Err(LlmError::Parse("candidate contains no text".to_string()));
    }
    Ok(text)
}

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use thiserror::Error;

use crate::adapter::build_client;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DECISION_TEMPERATURE: f32 = 0.0;

/// Failure modes of a [`DecisionClient`] call. Unlike [`crate::Provider`],
/// these DO cross the contract: Router (§4.3), Context Analyzer (§4.4), and
/// Search Manager (§4.2) each have a deterministic rule-based fallback path
/// to take when the decision model is unavailable, so the caller needs to
/// know that happened.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("decision model request failed: {0}")]
    Request(String),
    #[error("decision model returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decision model response did not contain valid JSON: {0}")]
    InvalidJson(String),
}

/// A small, low-temperature, JSON-constrained model call shared by the
/// components that need a fast classification or rating rather than a full
/// conversational turn. Backed by the same Gemini-like API as
/// [`crate::GeminiProvider`], but with its own minimal request shape: no
/// system-prompt enhancement, no tool loop, no conversation history.
#[derive(Clone)]
pub struct DecisionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    model_name: String,
}

impl DecisionClient {
    pub fn new(api_key: SecretString, model_name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model_name: model_name.into(),
        }
    }

    /// Sends `prompt` and returns the parsed JSON object the model replied
    /// with. Callers pass a prompt that instructs the model to reply with
    /// JSON matching their own shape; this client only enforces that the
    /// reply parses.
    pub async fn decide_json(&self, prompt: &str) -> Result<Value, DecisionError> {
        let endpoint = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            self.model_name,
            self.api_key.expose_secret()
        );
        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": DECISION_TEMPERATURE,
                "responseMimeType": "application/json",
            },
        });

        let response = self
            .client
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|error| DecisionError::Request(error.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DecisionError::Status { status, body });
        }

        let payload: Value = response.json().await.map_err(|error| DecisionError::InvalidJson(error.to_string()))?;
        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| DecisionError::InvalidJson("missing candidate text".to_string()))?;

        serde_json::from_str(text).map_err(|error| DecisionError::InvalidJson(error.to_string()))
    }

    /// Like [`Self::decide_json`], but for callers that want free text back
    /// rather than a JSON object — e.g. query optimization (§10), which
    /// rewrites a search query instead of classifying it.
    pub async fn decide_text(&self, prompt: &str, temperature: f32, max_output_tokens: u32) -> Result<String, DecisionError> {
        let endpoint = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            self.model_name,
            self.api_key.expose_secret()
        );
        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": temperature,
                "maxOutputTokens": max_output_tokens,
            },
        });

        let response = self
            .client
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|error| DecisionError::Request(error.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DecisionError::Status { status, body });
        }

        let payload: Value = response.json().await.map_err(|error| DecisionError::InvalidJson(error.to_string()))?;
        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DecisionError::InvalidJson("missing candidate text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_body() {
        let error = DecisionError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert!(error.to_string().contains("429"));
        assert!(error.to_string().contains("rate limited"));
    }
}

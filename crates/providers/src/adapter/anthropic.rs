use std::time::{Duration, Instant};

use async_trait::async_trait;
use domain::{ResponseMetrics, ToolDescriptor};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tools::ToolRegistry;

use crate::adapter::{build_client, elapsed_secs};
use crate::normalized::{GenerateResponse, MessageRole, ModelConfig, NormalizedMessage};
use crate::Provider;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Provider B (Anthropic-like): chat messages plus a separate top-level
/// `system` field; `max_tokens` is required; no tool loop by default (§4.5).
pub struct AnthropicProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl AnthropicProvider {
    pub fn new(api_key: SecretString, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    fn build_messages(messages: &[NormalizedMessage], search_passage: Option<&str>) -> Vec<Value> {
        let mut out: Vec<Value> = messages
            .iter()
            .filter(|message| message.role != MessageRole::Tool)
            .map(|message| {
                let role = match message.role {
                    MessageRole::User | MessageRole::Tool => "user",
                    MessageRole::Assistant => "assistant",
                };
                json!({"role": role, "content": message.content})
            })
            .collect();

        if let Some(passage) = search_passage {
            out.push(json!({
                "role": "user",
                "content": format!("Here are the search results to help you answer:\n{passage}"),
            }));
        }
        out
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn generate(
        &self,
        messages: &[NormalizedMessage],
        model: &ModelConfig,
        _tools: &[ToolDescriptor],
        _registry: &ToolRegistry,
        search_passage: Option<&str>,
    ) -> GenerateResponse {
        if messages.is_empty() {
            return crate::adapter::ready_to_chat();
        }

        let start = Instant::now();
        let body = json!({
            "model": model.model_name,
            "system": model.system_prompt,
            "messages": Self::build_messages(messages, search_passage),
            "max_tokens": model.max_output_tokens,
            "temperature": model.temperature,
            "top_p": model.top_p,
        });

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await;
        let response = match response {
            Ok(response) => response,
            Err(error) => return GenerateResponse::error(format!("Anthropic request failed: {error}"), elapsed_secs(start)),
        };
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return GenerateResponse::error(format!("Anthropic API error {status}: {text}"), elapsed_secs(start));
        }
        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(error) => return GenerateResponse::error(format!("Anthropic response parse error: {error}"), elapsed_secs(start)),
        };

        let text = payload["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|block| block["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.is_empty() {
            return GenerateResponse::error("Anthropic API returned an empty response", elapsed_secs(start));
        }

        let (input_tokens, input_estimated) = payload["usage"]["input_tokens"]
            .as_u64()
            .map(|tokens| (tokens as u32, false))
            .unwrap_or_else(|| (ResponseMetrics::estimate_tokens(&model.system_prompt), true));
        let (output_tokens, output_estimated) = payload["usage"]["output_tokens"]
            .as_u64()
            .map(|tokens| (tokens as u32, false))
            .unwrap_or_else(|| (ResponseMetrics::estimate_tokens(&text), true));

        GenerateResponse {
            text,
            metrics: ResponseMetrics {
                elapsed_secs: elapsed_secs(start),
                input_tokens,
                output_tokens,
                input_tokens_estimated: input_estimated,
                output_tokens_estimated: output_estimated,
            },
        }
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

use std::time::{Duration, Instant};

use async_trait::async_trait;
use domain::{ResponseMetrics, ToolDescriptor};
use serde_json::{Value, json};
use tools::ToolRegistry;

use crate::adapter::{build_client, elapsed_secs};
use crate::normalized::{GenerateResponse, MessageRole, ModelConfig, NormalizedMessage};
use crate::Provider;

/// Provider E (Ollama-like local server): no auth header, a `keep_alive`
/// hint to avoid reloading the model between turns, and a much longer
/// default timeout since local inference is slower than a hosted API
/// (§4.5, `config::Timeouts::local_provider`).
pub struct LocalProvider {
    client: reqwest::Client,
    base_url: String,
}

impl LocalProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.into(),
        }
    }

    fn build_messages(system_prompt: &str, messages: &[NormalizedMessage], search_passage: Option<&str>) -> Vec<Value> {
        let mut out = vec![json!({"role": "system", "content": system_prompt})];
        for message in messages {
            let role = match message.role {
                MessageRole::User | MessageRole::Tool => "user",
                MessageRole::Assistant => "assistant",
            };
            out.push(json!({"role": role, "content": message.content}));
        }
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
impl Provider for LocalProvider {
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
            "messages": Self::build_messages(&model.system_prompt, messages, search_passage),
            "stream": false,
            "keep_alive": "5m",
            "options": {
                "temperature": model.temperature,
                "top_p": model.top_p,
                "num_predict": model.max_output_tokens,
            },
        });

        let response = self.client.post(format!("{}/api/chat", self.base_url)).json(&body).send().await;
        let response = match response {
            Ok(response) => response,
            Err(error) => return GenerateResponse::error(format!("local provider request failed: {error}"), elapsed_secs(start)),
        };
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return GenerateResponse::error(format!("local provider error {status}: {text}"), elapsed_secs(start));
        }
        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(error) => return GenerateResponse::error(format!("local provider response parse error: {error}"), elapsed_secs(start)),
        };

        let text = payload["message"]["content"].as_str().unwrap_or_default().to_string();
        if text.is_empty() {
            return GenerateResponse::error("local provider returned an empty response", elapsed_secs(start));
        }

        let (input_tokens, input_estimated) = payload["prompt_eval_count"]
            .as_u64()
            .map(|tokens| (tokens as u32, false))
            .unwrap_or_else(|| (ResponseMetrics::estimate_tokens(&model.system_prompt), true));
        let (output_tokens, output_estimated) = payload["eval_count"]
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
        "local"
    }
}

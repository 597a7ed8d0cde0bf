use std::time::{Duration, Instant};

use async_trait::async_trait;
use domain::{ResponseMetrics, ToolDescriptor};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tools::ToolRegistry;

use crate::adapter::{build_client, elapsed_secs};
use crate::normalized::{GenerateResponse, MessageRole, ModelConfig, NormalizedMessage};
use crate::tool_loop::{MAX_TOOL_ITERATIONS, TOOL_LOOP_EXHAUSTED};
use crate::Provider;

/// Provider C (OpenAI-compatible) and Provider D (xAI-compatible) share this
/// adapter: both use `usage.prompt_tokens`/`completion_tokens` and the
/// OpenAI tool-calling shape; only the base URL, model names, and the name
/// reported to telemetry differ (§4.5).
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    name: &'static str,
}

impl OpenAiCompatibleProvider {
    pub fn openai(api_key: SecretString, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key,
            name: "openai",
        }
    }

    pub fn xai(api_key: SecretString, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: "https://api.x.ai/v1/chat/completions".to_string(),
            api_key,
            name: "xai",
        }
    }

    fn tool_schemas(tools: &[ToolDescriptor]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    },
                })
            })
            .collect()
    }

    fn build_messages(system_prompt: &str, messages: &[NormalizedMessage], search_passage: Option<&str>) -> Vec<Value> {
        let mut out = vec![json!({"role": "system", "content": system_prompt})];
        for message in messages {
            let role = match message.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
                MessageRole::Tool => "tool",
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
impl Provider for OpenAiCompatibleProvider {
    async fn generate(
        &self,
        messages: &[NormalizedMessage],
        model: &ModelConfig,
        tools: &[ToolDescriptor],
        registry: &ToolRegistry,
        search_passage: Option<&str>,
    ) -> GenerateResponse {
        if messages.is_empty() {
            return crate::adapter::ready_to_chat();
        }

        let start = Instant::now();
        let mut chat_messages = Self::build_messages(&model.system_prompt, messages, search_passage);

        for _ in 0..MAX_TOOL_ITERATIONS {
            let mut body = json!({
                "model": model.model_name,
                "messages": chat_messages,
                "temperature": model.temperature,
                "top_p": model.top_p,
                "max_tokens": model.max_output_tokens,
            });
            if model.supports_tools && !tools.is_empty() {
                body["tools"] = json!(Self::tool_schemas(tools));
            }

            let response = self
                .client
                .post(&self.base_url)
                .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
                .json(&body)
                .send()
                .await;
            let response = match response {
                Ok(response) => response,
                Err(error) => {
                    return GenerateResponse::error(format!("{} request failed: {error}", self.name), elapsed_secs(start));
                }
            };
            if !response.status().is_success() {
                let status = response.status().as_u16();
                let text = response.text().await.unwrap_or_default();
                return GenerateResponse::error(format!("{} API error {status}: {text}", self.name), elapsed_secs(start));
            }
            let payload: Value = match response.json().await {
                Ok(payload) => payload,
                Err(error) => {
                    return GenerateResponse::error(format!("{} response parse error: {error}", self.name), elapsed_secs(start));
                }
            };

            let Some(choice) = payload["choices"].as_array().and_then(|c| c.first()) else {
                return GenerateResponse::error(format!("{} API returned no choices", self.name), elapsed_secs(start));
            };
            let message = &choice["message"];

            if let Some(tool_calls) = message["tool_calls"].as_array().filter(|calls| !calls.is_empty()) {
                chat_messages.push(message.clone());
                for call in tool_calls {
                    let tool_name = call["function"]["name"].as_str().unwrap_or_default().to_string();
                    let args_str = call["function"]["arguments"].as_str().unwrap_or("{}");
                    let args: Value = serde_json::from_str(args_str).unwrap_or(json!({}));
                    let output = registry.invoke(&tool_name, args).await;
                    chat_messages.push(json!({
                        "role": "tool",
                        "tool_call_id": call["id"],
                        "content": output,
                    }));
                }
                continue;
            }

            let text = message["content"].as_str().unwrap_or_default().to_string();
            if text.is_empty() {
                return GenerateResponse::error(format!("{} API returned an empty response", self.name), elapsed_secs(start));
            }

            let (input_tokens, input_estimated) = payload["usage"]["prompt_tokens"]
                .as_u64()
                .map(|tokens| (tokens as u32, false))
                .unwrap_or_else(|| (ResponseMetrics::estimate_tokens(&model.system_prompt), true));
            let (output_tokens, output_estimated) = payload["usage"]["completion_tokens"]
                .as_u64()
                .map(|tokens| (tokens as u32, false))
                .unwrap_or_else(|| (ResponseMetrics::estimate_tokens(&text), true));

            return GenerateResponse {
                text,
                metrics: ResponseMetrics {
                    elapsed_secs: elapsed_secs(start),
                    input_tokens,
                    output_tokens,
                    input_tokens_estimated: input_estimated,
                    output_tokens_estimated: output_estimated,
                },
            };
        }

        GenerateResponse::error(TOOL_LOOP_EXHAUSTED, elapsed_secs(start))
    }

    fn name(&self) -> &str {
        self.name
    }
}

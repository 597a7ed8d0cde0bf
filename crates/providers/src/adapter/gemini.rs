use std::time::{Duration, Instant};

use async_trait::async_trait;
use domain::{ResponseMetrics, ToolDescriptor};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Value, json};
use tools::ToolRegistry;

use crate::adapter::{build_client, elapsed_secs};
use crate::normalized::{GenerateResponse, MessageRole, ModelConfig, NormalizedMessage};
use crate::tool_loop::{MAX_TOOL_ITERATIONS, TOOL_LOOP_EXHAUSTED};
use crate::Provider;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Provider A (Gemini-like): tools exposed as `function_declarations`,
/// function-response parts carry `{name, response:{name, content}}` (§4.5).
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent?key={}",
            self.base_url,
            self.api_key.expose_secret()
        )
    }

    fn tool_declarations(tools: &[ToolDescriptor]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "function_declarations": [{
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }]
                })
            })
            .collect()
    }

    fn build_contents(messages: &[NormalizedMessage], search_passage: Option<&str>) -> Vec<Value> {
        let mut contents: Vec<Value> = messages
            .iter()
            .map(|message| {
                let role = match message.role {
                    MessageRole::User | MessageRole::Tool => "user",
                    MessageRole::Assistant => "model",
                };
                json!({"role": role, "parts": [{"text": message.content}]})
            })
            .collect();

        if let Some(passage) = search_passage {
            contents.push(json!({
                "role": "user",
                "parts": [{"text": format!("Here are the search results to help you answer:\n{passage}")}],
            }));
        }

        contents
    }
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[async_trait]
impl Provider for GeminiProvider {
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
        let mut contents = Self::build_contents(messages, search_passage);
        let generation_config = GenerationConfig {
            temperature: model.temperature,
            top_p: model.top_p,
            max_output_tokens: model.max_output_tokens,
        };

        for _ in 0..MAX_TOOL_ITERATIONS {
            let mut body = json!({
                "contents": contents,
                "system_instruction": {"parts": [{"text": model.system_prompt}]},
                "generationConfig": generation_config,
            });
            if model.supports_tools && !tools.is_empty() {
                body["tools"] = json!(Self::tool_declarations(tools));
            }

            let response = self
                .client
                .post(self.endpoint(&model.model_name))
                .json(&body)
                .send()
                .await;
            let response = match response {
                Ok(response) => response,
                Err(error) => return GenerateResponse::error(format!("Gemini request failed: {error}"), elapsed_secs(start)),
            };
            if !response.status().is_success() {
                let status = response.status().as_u16();
                let text = response.text().await.unwrap_or_default();
                return GenerateResponse::error(format!("Gemini API error {status}: {text}"), elapsed_secs(start));
            }
            let payload: Value = match response.json().await {
                Ok(payload) => payload,
                Err(error) => return GenerateResponse::error(format!("Gemini response parse error: {error}"), elapsed_secs(start)),
            };

            let Some(candidate) = payload["candidates"].as_array().and_then(|c| c.first()) else {
                return GenerateResponse::error("Gemini API returned no candidates", elapsed_secs(start));
            };
            let parts = candidate["content"]["parts"].as_array().cloned().unwrap_or_default();

            if let Some(function_call) = parts.iter().find_map(|part| part.get("functionCall")) {
                let tool_name = function_call["name"].as_str().unwrap_or_default().to_string();
                let args = function_call["args"].clone();
                let output = registry.invoke(&tool_name, args).await;

                contents.push(json!({"role": "model", "parts": [{"functionCall": function_call}]}));
                contents.push(json!({
                    "role": "user",
                    "parts": [{"functionResponse": {"name": tool_name, "response": {"name": tool_name, "content": output}}}],
                }));
                continue;
            }

            let text: String = parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect::<Vec<_>>()
                .join("");

            let (input_tokens, input_estimated) = payload["usageMetadata"]["promptTokenCount"]
                .as_u64()
                .map(|tokens| (tokens as u32, false))
                .unwrap_or_else(|| (ResponseMetrics::estimate_tokens(&model.system_prompt), true));
            let (output_tokens, output_estimated) = payload["usageMetadata"]["candidatesTokenCount"]
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
        "gemini"
    }
}

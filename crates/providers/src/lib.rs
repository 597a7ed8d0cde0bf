//! Provider Abstraction (§4.5): a single contract
//! `generate(messages, model_config, search_passage?) → {text, metrics}`
//! with uniform timing, token accounting, and error rendering across five
//! concrete adapters.
//!
//! Adapters never raise across the contract — a network timeout, a non-2xx
//! response, or a malformed payload all become a normalized
//! [`GenerateResponse`] whose `text` is a human-readable error and whose
//! metrics are flagged as estimates.

mod adapter;
mod decision;
mod normalized;
mod system_prompt;
mod tool_loop;

pub use adapter::{
    anthropic::AnthropicProvider, gemini::GeminiProvider, local::LocalProvider,
    openai_compatible::OpenAiCompatibleProvider,
};
pub use decision::{DecisionClient, DecisionError};
pub use normalized::{GenerateResponse, MessageRole, ModelConfig, NormalizedMessage};
pub use system_prompt::enhance_system_prompt;

use async_trait::async_trait;
use domain::ToolDescriptor;
use tools::ToolRegistry;

/// The uniform contract every concrete adapter implements (§4.5).
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(
        &self,
        messages: &[NormalizedMessage],
        model: &ModelConfig,
        tools: &[ToolDescriptor],
        registry: &ToolRegistry,
        search_passage: Option<&str>,
    ) -> GenerateResponse;

    fn name(&self) -> &str;
}

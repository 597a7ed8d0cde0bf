use serde::{Deserialize, Serialize};

/// Sampling parameters a [`Model`] is dispatched with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_input_tokens: u32,
    pub max_output_tokens: u32,
}

/// What a [`Model`] is able to do, read by the Router and Provider
/// Abstraction to decide whether it can satisfy a given route.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub text_in: bool,
    pub text_out: bool,
    pub image_in: bool,
    pub image_out: bool,
    pub tools: bool,
    pub thinking: bool,
    pub grounding: bool,
}

/// Per-token pricing, informational only to the core.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

/// A registered model, read-only to the core (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub provider: String,
    pub sampling: SamplingParams,
    pub capabilities: Capabilities,
    pub pricing: Pricing,
}

/// A named, reusable system prompt, read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub name: String,
    pub content: String,
}

use crate::model::{Capabilities, Model, Pricing, Prompt, SamplingParams};

/// A small built-in model catalog (§10), grounded on the source's
/// `MODEL_TEMPLATES`: one representative model per provider, enough for the
/// orchestrator demo to have something to route to without an admin screen.
pub fn builtin_models() -> Vec<Model> {
    vec![
        Model {
            name: "claude-3-5-sonnet-20241022".to_string(),
            provider: "anthropic".to_string(),
            sampling: SamplingParams {
                temperature: 0.7,
                top_p: 0.9,
                max_input_tokens: 200_000,
                max_output_tokens: 8_192,
            },
            capabilities: Capabilities {
                text_in: true,
                text_out: true,
                image_in: true,
                image_out: false,
                tools: true,
                thinking: false,
                grounding: false,
            },
            pricing: Pricing {
                input_per_million: 3.0,
                output_per_million: 15.0,
            },
        },
        Model {
            name: "gemini-2.0-flash-exp".to_string(),
            provider: "gemini".to_string(),
            sampling: SamplingParams {
                temperature: 0.7,
                top_p: 0.9,
                max_input_tokens: 1_048_576,
                max_output_tokens: 8_192,
            },
            capabilities: Capabilities {
                text_in: true,
                text_out: true,
                image_in: true,
                image_out: false,
                tools: true,
                thinking: false,
                grounding: true,
            },
            pricing: Pricing {
                input_per_million: 0.0,
                output_per_million: 0.0,
            },
        },
        Model {
            name: "gpt-4o-mini".to_string(),
            provider: "openai".to_string(),
            sampling: SamplingParams {
                temperature: 0.7,
                top_p: 0.9,
                max_input_tokens: 128_000,
                max_output_tokens: 16_384,
            },
            capabilities: Capabilities {
                text_in: true,
                text_out: true,
                image_in: true,
                image_out: false,
                tools: true,
                thinking: false,
                grounding: false,
            },
            pricing: Pricing {
                input_per_million: 0.15,
                output_per_million: 0.60,
            },
        },
        Model {
            name: "grok-2-latest".to_string(),
            provider: "xai".to_string(),
            sampling: SamplingParams {
                temperature: 0.7,
                top_p: 0.9,
                max_input_tokens: 131_072,
                max_output_tokens: 8_192,
            },
            capabilities: Capabilities {
                text_in: true,
                text_out: true,
                image_in: false,
                image_out: false,
                tools: true,
                thinking: false,
                grounding: false,
            },
            pricing: Pricing {
                input_per_million: 2.0,
                output_per_million: 10.0,
            },
        },
        Model {
            name: "llama3.1".to_string(),
            provider: "local".to_string(),
            sampling: SamplingParams {
                temperature: 0.7,
                top_p: 0.9,
                max_input_tokens: 8_192,
                max_output_tokens: 2_048,
            },
            capabilities: Capabilities {
                text_in: true,
                text_out: true,
                image_in: false,
                image_out: false,
                tools: false,
                thinking: false,
                grounding: false,
            },
            pricing: Pricing::default(),
        },
    ]
}

/// The single default system prompt every new Conversation starts with.
pub fn default_prompt() -> Prompt {
    Prompt {
        name: "default".to_string(),
        content: "You are a helpful, direct AI assistant with access to real-time tools.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_model_names_a_distinct_provider() {
        let models = builtin_models();
        let providers: std::collections::HashSet<&str> = models.iter().map(|model| model.provider.as_str()).collect();
        assert_eq!(providers.len(), models.len());
    }
}

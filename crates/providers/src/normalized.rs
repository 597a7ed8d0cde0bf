use domain::ResponseMetrics;

/// Role of a [`NormalizedMessage`] in the request history handed to an
/// adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
    Tool,
}

/// An ordered, role-tagged message in the normalized request shape (§4.5).
#[derive(Debug, Clone)]
pub struct NormalizedMessage {
    pub role: MessageRole,
    pub content: String,
    /// Set when `role` is `Tool`: the name of the tool whose output this is.
    pub tool_name: Option<String>,
}

impl NormalizedMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tool_name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_name: None,
        }
    }
}

/// Model configuration and sampling parameters for one `generate` call.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_name: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_input_tokens: u32,
    pub max_output_tokens: u32,
    /// Already enhanced with the user-context block — see
    /// [`crate::enhance_system_prompt`].
    pub system_prompt: String,
    pub supports_tools: bool,
}

/// Uniform return value of [`crate::Provider::generate`] (§4.5).
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub text: String,
    pub metrics: ResponseMetrics,
}

impl GenerateResponse {
    /// The normalized error response every adapter returns instead of
    /// raising across the contract: network timeouts, non-2xx statuses,
    /// malformed JSON, and empty candidate/choice arrays all land here.
    pub fn error(message: impl Into<String>, elapsed_secs: f64) -> Self {
        let message = message.into();
        let estimated_tokens = ResponseMetrics::estimate_tokens(&message);
        Self {
            text: message,
            metrics: ResponseMetrics {
                elapsed_secs,
                input_tokens: 0,
                output_tokens: estimated_tokens,
                input_tokens_estimated: true,
                output_tokens_estimated: true,
            },
        }
    }
}

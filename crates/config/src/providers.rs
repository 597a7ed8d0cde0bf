use secrecy::SecretString;

use crate::{env, secret_opt};

/// Credentials and endpoints for the five model providers (§4.5).
///
/// A provider with a `None` credential is disabled: the orchestrator must
/// still route to it gracefully and surface a configuration error string
/// rather than panicking.
#[derive(Debug, Clone, Default)]
pub struct ProviderKeys {
    /// Gemini-like provider API key.
    pub gemini_api_key: Option<SecretString>,
    /// Anthropic-like provider API key.
    pub anthropic_api_key: Option<SecretString>,
    /// OpenAI-compatible provider API key.
    pub openai_api_key: Option<SecretString>,
    /// xAI-compatible provider API key.
    pub xai_api_key: Option<SecretString>,
    /// Local server (Ollama-like) settings; always "configured" since it
    /// needs no credential, only a reachable base URL.
    pub local_server: OllamaConfig,
}

/// Local inference server configuration (§4.5 Provider E).
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the local chat endpoint, e.g. `http://localhost:11434`.
    pub base_url: String,
    /// Keep-alive hint sent with every request so the model stays resident.
    pub keep_alive: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            keep_alive: "5m".to_string(),
        }
    }
}

impl ProviderKeys {
    pub(crate) fn from_env() -> Self {
        Self {
            gemini_api_key: secret_opt("GEMINI_API_KEY"),
            anthropic_api_key: secret_opt("ANTHROPIC_API_KEY"),
            openai_api_key: secret_opt("OPENAI_API_KEY"),
            xai_api_key: secret_opt("XAI_API_KEY"),
            local_server: OllamaConfig {
                base_url: env::var_opt("OLLAMA_BASE_URL").unwrap_or_else(|| OllamaConfig::default().base_url),
                keep_alive: env::var_opt("OLLAMA_KEEP_ALIVE").unwrap_or_else(|| OllamaConfig::default().keep_alive),
            },
        }
    }
}

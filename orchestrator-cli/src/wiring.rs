//! Assembles a [`orchestrator::TurnOrchestrator`] from [`config::Config`]:
//! store, tool registry, provider adapters, Router/Search/Context, and a
//! shared decision client, following the same construction order the
//! orchestrator's own tests use.

use std::collections::HashMap;
use std::sync::Arc;

use domain::{Conversation, InMemoryStore};
use providers::{AnthropicProvider, DecisionClient, GeminiProvider, LocalProvider, OpenAiCompatibleProvider, Provider};
use router::Router;
use search::SearchManager;
use context::ContextAnalyzer;
use orchestrator::{TurnOrchestrator, TurnOrchestratorDeps};
use uuid::Uuid;

/// Gemini-like decision model used for Router/Search/Context classification
/// calls and the query optimizer; cheap, low-temperature, JSON-constrained.
const DECISION_MODEL_NAME: &str = "gemini-2.0-flash-exp";

pub fn build(config: &config::Config) -> (TurnOrchestrator, Uuid) {
    let store = InMemoryStore::new();
    for model in domain::builtin_models() {
        store.insert_model(model);
    }
    store.insert_prompt(domain::default_prompt());

    let providers = build_providers(config);
    let model_id = pick_model_id(&providers);

    let conversation = Conversation::new("demo", model_id, "default");
    let conversation_id = conversation.id;
    store.insert_conversation(conversation);

    let http_client = reqwest::Client::new();
    let mut registry = tools::ToolRegistry::new();
    tools::register_builtins(&mut registry, config, http_client);

    let decision_client = config
        .providers
        .gemini_api_key
        .clone()
        .map(|api_key| DecisionClient::new(api_key, DECISION_MODEL_NAME, config.timeouts.router_llm));

    let router = Router::new(decision_client.clone(), config.timeouts.router_llm);
    let search_manager = SearchManager::new(config.timeouts.quality_rating);
    let context_analyzer = ContextAnalyzer::new(decision_client.clone(), config.timeouts.router_llm);

    let orchestrator = TurnOrchestrator::new(TurnOrchestratorDeps {
        store: Arc::new(store),
        registry: Arc::new(registry),
        providers,
        router,
        search_manager,
        context_analyzer,
        decision_client,
        timeouts: config.timeouts,
    });

    (orchestrator, conversation_id)
}

/// Builds the provider map, gated on which credentials are present (§4.5);
/// the local adapter is always available since it needs no credential.
fn build_providers(config: &config::Config) -> HashMap<String, Arc<dyn Provider>> {
    let mut providers: HashMap<String, Arc<dyn Provider>> = HashMap::new();

    if let Some(api_key) = config.providers.anthropic_api_key.clone() {
        providers.insert("anthropic".to_string(), Arc::new(AnthropicProvider::new(api_key, config.timeouts.provider)));
    }
    if let Some(api_key) = config.providers.gemini_api_key.clone() {
        providers.insert("gemini".to_string(), Arc::new(GeminiProvider::new(api_key, config.timeouts.provider)));
    }
    if let Some(api_key) = config.providers.openai_api_key.clone() {
        providers.insert("openai".to_string(), Arc::new(OpenAiCompatibleProvider::openai(api_key, config.timeouts.provider)));
    }
    if let Some(api_key) = config.providers.xai_api_key.clone() {
        providers.insert("xai".to_string(), Arc::new(OpenAiCompatibleProvider::xai(api_key, config.timeouts.provider)));
    }
    providers.insert(
        "local".to_string(),
        Arc::new(LocalProvider::new(config.providers.local_server.base_url.clone(), config.timeouts.local_provider)),
    );

    providers
}

/// Picks the demo conversation's model: the first configured remote
/// provider's builtin model, falling back to the always-available local one.
fn pick_model_id(providers: &HashMap<String, Arc<dyn Provider>>) -> &'static str {
    for (provider, model_id) in [
        ("anthropic", "claude-3-5-sonnet-20241022"),
        ("gemini", "gemini-2.0-flash-exp"),
        ("openai", "gpt-4o-mini"),
        ("xai", "grok-2-latest"),
    ] {
        if providers.contains_key(provider) {
            return model_id;
        }
    }
    "llama3.1"
}

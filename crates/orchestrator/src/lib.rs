//! Turn Orchestrator (§4.6): the top-level per-turn coordinator. For one
//! user utterance it asks the Router, optionally the Search Manager, the
//! Context Analyzer, then a Provider, and persists both sides of the
//! exchange as a single atomic append.
//!
//! Turns are single-writer per Conversation (§5): concurrent turns on the
//! same conversation id serialize on a per-conversation lock, while turns on
//! different conversations run freely, gated only by the shared outbound
//! semaphore.

mod error;
mod query_optimizer;
mod turn;

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use config::Timeouts;
use context::ContextAnalyzer;
use domain::{ConversationStore, Message, RouteKind, UserProfile};
use providers::{DecisionClient, ModelConfig, NormalizedMessage, Provider};
use router::Router;
use search::SearchManager;
use tools::ToolRegistry;
use uuid::Uuid;

pub use error::OrchestratorError;
pub use turn::TurnOutcome;

/// A search score below this triggers one retry with the un-optimized
/// query (§4.6 step 3).
const SEARCH_RETRY_THRESHOLD: f32 = 3.0;
/// A search score below this after retrying is reported as "no relevant
/// results" rather than attached to the provider call (§4.6 step 3).
const SEARCH_ACCEPT_THRESHOLD: f32 = 2.0;
const NO_RELEVANT_RESULTS: &str = "no relevant search results";

pub struct TurnOrchestrator {
    store: Arc<dyn ConversationStore>,
    registry: Arc<ToolRegistry>,
    providers: HashMap<String, Arc<dyn Provider>>,
    router: Router,
    search_manager: SearchManager,
    context_analyzer: ContextAnalyzer,
    decision_client: Option<DecisionClient>,
    timeouts: Timeouts,
    outbound: Arc<tokio::sync::Semaphore>,
    conversation_locks: StdMutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

/// Everything [`TurnOrchestrator::new`] needs, grouped to keep the
/// constructor to one argument: the store/registry/providers a deployment
/// wires up once, plus the three per-turn collaborators and shared timeouts.
pub struct TurnOrchestratorDeps {
    pub store: Arc<dyn ConversationStore>,
    pub registry: Arc<ToolRegistry>,
    pub providers: HashMap<String, Arc<dyn Provider>>,
    pub router: Router,
    pub search_manager: SearchManager,
    pub context_analyzer: ContextAnalyzer,
    pub decision_client: Option<DecisionClient>,
    pub timeouts: Timeouts,
}

impl TurnOrchestrator {
    pub fn new(deps: TurnOrchestratorDeps) -> Self {
        let outbound = Arc::new(tokio::sync::Semaphore::new(deps.timeouts.outbound_semaphore));
        Self {
            store: deps.store,
            registry: deps.registry,
            providers: deps.providers,
            router: deps.router,
            search_manager: deps.search_manager,
            context_analyzer: deps.context_analyzer,
            decision_client: deps.decision_client,
            timeouts: deps.timeouts,
            outbound,
            conversation_locks: StdMutex::new(HashMap::new()),
        }
    }

    pub fn usage(&self) -> &router::RoutingUsageTracker {
        self.router.usage()
    }

    fn conversation_lock(&self, id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        self.conversation_locks.lock().unwrap().entry(id).or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))).clone()
    }

    /// Runs one full turn (§4.6 steps 1-8). On success, the Conversation has
    /// gained exactly one user and one assistant Message.
    pub async fn handle_turn(&self, conversation_id: Uuid, user_text: String, profile: &UserProfile) -> Result<TurnOutcome, OrchestratorError> {
        let lock = self.conversation_lock(conversation_id);
        let _guard = lock.lock().await;

        let conversation = self.store.get_conversation(conversation_id).await?;
        let model = self.store.get_model(&conversation.model_id).await?;
        let prompt = self.store.get_prompt(&conversation.prompt_id).await?;
        let tool_descriptors = self.registry.list_descriptors();

        let _permit = self.outbound.acquire().await.expect("semaphore is never closed");

        let routing = self.router.route(&user_text, &tool_descriptors).await;

        let search = self.maybe_search(&routing, &user_text).await;

        // Routes the Router settled on purely from the current utterance's
        // wording (a tool or search pattern matched) carry their own
        // standalone signal independent of conversation history.
        let router_marks_standalone = matches!(routing.route, RouteKind::ToolDirect | RouteKind::ToolWithSearch | RouteKind::SearchOnly);
        let (context_analysis, window) = self.context_analyzer.analyze(&user_text, conversation.history(), router_marks_standalone).await;

        let mut normalized: Vec<NormalizedMessage> = window.iter().map(|message| normalize(message)).collect();
        normalized.push(NormalizedMessage::user(user_text.clone()));

        let model_config = ModelConfig {
            model_name: model.name.clone(),
            temperature: model.sampling.temperature,
            top_p: model.sampling.top_p,
            max_input_tokens: model.sampling.max_input_tokens,
            max_output_tokens: model.sampling.max_output_tokens,
            system_prompt: providers::enhance_system_prompt(&prompt.content, profile),
            supports_tools: model.capabilities.tools,
        };

        let provider = self.providers.get(&model.provider).ok_or_else(|| OrchestratorError::ProviderNotConfigured(model.provider.clone()))?;

        let search_passage = search.as_ref().and_then(|outcome| (outcome.passage != NO_RELEVANT_RESULTS).then_some(outcome.passage.as_str()));
        let response = provider.generate(&normalized, &model_config, &tool_descriptors, &self.registry, search_passage).await;

        drop(_permit);

        let mut working = conversation.clone();
        working.push(Message::user(user_text, Utc::now()));
        let mut assistant_message = Message::assistant(response.text.clone(), Utc::now(), response.metrics);
        if let Some(outcome) = &search {
            assistant_message = assistant_message.with_search_passage(outcome.passage.clone());
        }
        working.push(assistant_message);

        let committed = working.messages[working.messages.len() - 2..].to_vec();
        self.store.append_messages(conversation_id, committed, working.updated_at).await?;

        Ok(TurnOutcome {
            assistant_text: response.text,
            metrics: response.metrics,
            routing,
            context: context_analysis,
            search,
        })
    }

    /// §4.6 step 3: optimize the query, search, retry with the original
    /// query if the score is weak, and give up cleanly if it's still weak.
    async fn maybe_search(&self, routing: &domain::RoutingDecision, query: &str) -> Option<domain::SearchOutcome> {
        routing.search_engine.as_ref()?;

        let optimize_timeout = self.timeouts.router_llm;
        let optimized = query_optimizer::optimize_search_query(self.decision_client.as_ref(), optimize_timeout, query).await;

        let mut outcome = self.search_manager.search_with_fallback(&optimized, &self.registry, self.decision_client.as_ref()).await;

        if outcome.score < SEARCH_RETRY_THRESHOLD && optimized != query {
            let retry = self.search_manager.search_with_fallback(query, &self.registry, self.decision_client.as_ref()).await;
            if retry.score > outcome.score {
                outcome = retry;
            }
        }

        if outcome.score < SEARCH_ACCEPT_THRESHOLD {
            outcome.passage = NO_RELEVANT_RESULTS.to_string();
        }

        Some(outcome)
    }
}

fn normalize(message: &Message) -> NormalizedMessage {
    let role = match message.role {
        domain::MessageRole::User => providers::MessageRole::User,
        domain::MessageRole::Assistant => providers::MessageRole::Assistant,
        domain::MessageRole::Tool => providers::MessageRole::Tool,
    };
    NormalizedMessage {
        role,
        content: message.content.clone(),
        tool_name: message.tool_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::{Capabilities, Conversation, InMemoryStore, Model, Prompt, ResponseMetrics, SamplingParams};
    use std::time::Duration as StdDuration;

    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        async fn generate(
            &self,
            messages: &[NormalizedMessage],
            _model: &ModelConfig,
            _tools: &[domain::ToolDescriptor],
            _registry: &ToolRegistry,
            _search_passage: Option<&str>,
        ) -> providers::GenerateResponse {
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            providers::GenerateResponse {
                text: format!("echo: {last}"),
                metrics: ResponseMetrics {
                    elapsed_secs: 0.01,
                    input_tokens: 1,
                    output_tokens: 1,
                    input_tokens_estimated: true,
                    output_tokens_estimated: true,
                },
            }
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn orchestrator_with_echo_provider() -> (TurnOrchestrator, Uuid) {
        let store = InMemoryStore::new();
        let conversation = Conversation::new("test", "test-model", "default");
        let id = conversation.id;
        store.insert_conversation(conversation);
        store.insert_model(Model {
            name: "test-model".to_string(),
            provider: "echo".to_string(),
            sampling: SamplingParams {
                temperature: 0.7,
                top_p: 0.95,
                max_input_tokens: 1000,
                max_output_tokens: 100,
            },
            capabilities: Capabilities::default(),
            pricing: Default::default(),
        });
        store.insert_prompt(Prompt {
            name: "default".to_string(),
            content: "You are a test assistant.".to_string(),
        });

        let mut providers: HashMap<String, Arc<dyn Provider>> = HashMap::new();
        providers.insert("echo".to_string(), Arc::new(EchoProvider));

        let orchestrator = TurnOrchestrator::new(TurnOrchestratorDeps {
            store: Arc::new(store),
            registry: Arc::new(ToolRegistry::new()),
            providers,
            router: Router::new(None, StdDuration::from_millis(10)),
            search_manager: SearchManager::new(StdDuration::from_millis(10)),
            context_analyzer: ContextAnalyzer::new(None, StdDuration::from_millis(10)),
            decision_client: None,
            timeouts: Timeouts::default(),
        });
        (orchestrator, id)
    }

    #[tokio::test]
    async fn a_turn_appends_exactly_one_user_and_one_assistant_message() {
        let (orchestrator, id) = orchestrator_with_echo_provider();
        let profile = UserProfile::default();

        let outcome = orchestrator.handle_turn(id, "what is the capital of France?".to_string(), &profile).await.unwrap();
        assert!(outcome.assistant_text.starts_with("echo:"));

        let conversation = orchestrator.store.get_conversation(id).await.unwrap();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].role, domain::MessageRole::User);
        assert_eq!(conversation.messages[1].role, domain::MessageRole::Assistant);
    }

    #[tokio::test]
    async fn unconfigured_provider_is_reported_not_panicked() {
        let store = InMemoryStore::new();
        let conversation = Conversation::new("test", "missing-model", "default");
        let id = conversation.id;
        store.insert_conversation(conversation);
        store.insert_model(Model {
            name: "missing-model".to_string(),
            provider: "nonexistent".to_string(),
            sampling: SamplingParams {
                temperature: 0.7,
                top_p: 0.95,
                max_input_tokens: 1000,
                max_output_tokens: 100,
            },
            capabilities: Capabilities::default(),
            pricing: Default::default(),
        });
        store.insert_prompt(Prompt {
            name: "default".to_string(),
            content: "base".to_string(),
        });

        let orchestrator = TurnOrchestrator::new(TurnOrchestratorDeps {
            store: Arc::new(store),
            registry: Arc::new(ToolRegistry::new()),
            providers: HashMap::new(),
            router: Router::new(None, StdDuration::from_millis(10)),
            search_manager: SearchManager::new(StdDuration::from_millis(10)),
            context_analyzer: ContextAnalyzer::new(None, StdDuration::from_millis(10)),
            decision_client: None,
            timeouts: Timeouts::default(),
        });

        let profile = UserProfile::default();
        let result = orchestrator.handle_turn(id, "hello".to_string(), &profile).await;
        assert!(matches!(result, Err(OrchestratorError::ProviderNotConfigured(name)) if name == "nonexistent"));
    }
}

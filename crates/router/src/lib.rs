//! Router (§4.3): classifies each user utterance into a [`RoutingDecision`].
//!
//! The decision model is tried first; any failure (missing client, network
//! error, timeout, malformed JSON) falls through to the deterministic rule
//! scorer in [`rules`], which is required to terminate and never fail.

mod llm;
mod rules;
mod usage;

use domain::{RoutingDecision, ToolDescriptor};
use providers::DecisionClient;
use std::time::Duration;

pub use usage::RoutingUsageTracker;

/// Classifies utterances with an optional LLM decision path and a mandatory
/// rule-based fallback.
pub struct Router {
    decision_client: Option<DecisionClient>,
    llm_timeout: Duration,
    usage: RoutingUsageTracker,
}

impl Router {
    pub fn new(decision_client: Option<DecisionClient>, llm_timeout: Duration) -> Self {
        Self {
            decision_client,
            llm_timeout,
            usage: RoutingUsageTracker::new(),
        }
    }

    pub fn usage(&self) -> &RoutingUsageTracker {
        &self.usage
    }

    /// Makes a routing decision for `query`, given the currently registered
    /// tools (used to build the decision-model prompt).
    pub async fn route(&self, query: &str, tools: &[ToolDescriptor]) -> RoutingDecision {
        let summaries: Vec<(String, String)> = tools.iter().map(|tool| (tool.name.clone(), tool.description.clone())).collect();

        if let Some(client) = &self.decision_client {
            let attempt = tokio::time::timeout(self.llm_timeout, llm::make_llm_routing_decision(client, query, &summaries)).await;
            match attempt {
                Ok(Some(decision)) => {
                    self.usage.record_llm_success();
                    return decision;
                }
                Ok(None) => self.usage.record_backup_usage("LLM routing failed"),
                Err(_) => self.usage.record_backup_usage("LLM routing timed out"),
            }
        } else {
            self.usage.record_backup_usage("no decision client configured");
        }

        let mut decision = rules::make_fallback_routing_decision(query);
        decision.reasoning = format!("FALLBACK: {}", decision.reasoning);
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn routes_via_fallback_when_no_decision_client_configured() {
        let router = Router::new(None, Duration::from_secs(1));
        let decision = router.route("what's the weather in London?", &[]).await;
        assert_eq!(decision.primary_tool.as_deref(), Some("get_weather_forecast"));
        assert!(decision.reasoning.starts_with("FALLBACK:"));
        assert_eq!(router.usage().recent_backup_reasons(), vec!["no decision client configured".to_string()]);
    }
}

use domain::{RouteKind, RoutingDecision};
use providers::DecisionClient;
use serde::Deserialize;

const ROUTING_INSTRUCTIONS: &str = r#"You are an expert AI query router for a multi-modal assistant. Analyze the
user query and choose a routing strategy.

Routing options:
- tool_direct: use a specific tool immediately (high confidence)
- tool_with_search: use a tool but verify/supplement with search (medium confidence)
- search_only: use search without tools
- model_knowledge: use the model's internal knowledge, no tools or search
- combined: use multiple approaches together

Respond with a JSON object with these fields:
routing_decision, primary_tool (or null), search_provider ("brave"|"serper"|null),
confidence (0.0-1.0), reasoning, fallback_options (array of strings)."#;

#[derive(Deserialize)]
struct RoutingReply {
    routing_decision: String,
    primary_tool: Option<String>,
    search_provider: Option<String>,
    #[serde(default = "default_confidence")]
    confidence: f32,
    #[serde(default = "default_reasoning")]
    reasoning: String,
    #[serde(default)]
    fallback_options: Vec<String>,
}

fn default_confidence() -> f32 {
    0.5
}

fn default_reasoning() -> String {
    "LLM routing decision".to_string()
}

fn route_kind_from(name: &str) -> RouteKind {
    match name {
        "tool_direct" => RouteKind::ToolDirect,
        "tool_with_search" => RouteKind::ToolWithSearch,
        "search_only" => RouteKind::SearchOnly,
        "combined" => RouteKind::Combined,
        _ => RouteKind::ModelKnowledge,
    }
}

/// Tool descriptions rendered into the routing prompt so the decision model
/// knows what is actually registered (§4.3).
pub fn build_prompt(query: &str, tool_summaries: &[(String, String)]) -> String {
    let tools = tool_summaries
        .iter()
        .map(|(name, description)| format!("- {name}: {description}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{ROUTING_INSTRUCTIONS}\n\nAvailable tools:\n{tools}\n\nUser query: {query}")
}

/// Primary path: ask the decision model, returning `None` on any failure so
/// the caller falls back to rules (§4.3).
pub async fn make_llm_routing_decision(client: &DecisionClient, query: &str, tool_summaries: &[(String, String)]) -> Option<RoutingDecision> {
    let prompt = build_prompt(query, tool_summaries);
    let reply = client.decide_json(&prompt).await.ok()?;
    let reply: RoutingReply = serde_json::from_value(reply).ok()?;

    let search_engine = match route_kind_from(&reply.routing_decision) {
        RouteKind::SearchOnly | RouteKind::ToolWithSearch => Some(reply.search_provider.unwrap_or_else(|| "brave".to_string())),
        _ => None,
    };

    Some(RoutingDecision {
        route: route_kind_from(&reply.routing_decision),
        primary_tool: reply.primary_tool,
        search_engine,
        confidence: reply.confidence.clamp(0.0, 1.0),
        reasoning: format!("LLM: {}", reply.reasoning),
        fallback_options: reply.fallback_options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_tool_summary() {
        let prompt = build_prompt("weather in paris", &[("get_weather_forecast".to_string(), "gets weather".to_string())]);
        assert!(prompt.contains("get_weather_forecast"));
        assert!(prompt.contains("weather in paris"));
    }

    #[test]
    fn route_kind_from_unknown_defaults_to_model_knowledge() {
        assert_eq!(route_kind_from("nonsense"), RouteKind::ModelKnowledge);
    }
}

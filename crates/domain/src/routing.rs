use serde::{Deserialize, Serialize};

/// The five route kinds a [`RoutingDecision`] may settle on (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    ToolDirect,
    ToolWithSearch,
    SearchOnly,
    ModelKnowledge,
    Combined,
}

/// Output of the Router (§4.3), ephemeral — discarded after the turn that
/// produced it is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub route: RouteKind,
    /// Must name a tool registered in the Tool Registry, or be `None` (I3).
    pub primary_tool: Option<String>,
    /// Set whenever `route` is `SearchOnly` or `ToolWithSearch` (I4).
    pub search_engine: Option<String>,
    pub confidence: f32,
    pub reasoning: String,
    pub fallback_options: Vec<String>,
}

impl RoutingDecision {
    /// Whether this decision satisfies invariant I4 for its route kind.
    pub fn satisfies_search_invariant(&self) -> bool {
        match self.route {
            RouteKind::SearchOnly | RouteKind::ToolWithSearch => self.search_engine.is_some(),
            _ => true,
        }
    }
}

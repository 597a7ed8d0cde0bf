use domain::{ContextAnalysis, ResponseMetrics, RoutingDecision, SearchOutcome};

/// Everything the caller needs after a turn commits: the assistant's text is
/// already persisted, so this is purely informational (§4.6 step 8).
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub assistant_text: String,
    pub metrics: ResponseMetrics,
    pub routing: RoutingDecision,
    pub context: ContextAnalysis,
    pub search: Option<SearchOutcome>,
}

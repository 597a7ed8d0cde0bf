use domain::StoreError;
use thiserror::Error;

/// Failures that can surface out of a turn. Everything a component can fail
/// on internally is already absorbed into a structured response or a rule
/// fallback (§7); what's left here is the orchestrator's own bookkeeping.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("conversation store error: {0}")]
    Store(#[from] StoreError),
    #[error("model '{0}' has no registered provider")]
    ProviderNotConfigured(String),
}

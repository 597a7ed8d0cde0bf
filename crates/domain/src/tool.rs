use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool's public contract, as handed to a provider's function-calling
/// schema (§4.1). Does not carry the callable itself — that lives behind the
/// Tool Registry, which is the crate that depends on `domain`, not the
/// reverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// `{"type": "object", "properties": {...}, "required": [...]}`.
    pub parameters: Value,
}

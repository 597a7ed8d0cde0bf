use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use domain::ToolDescriptor;
use serde_json::Value;
use thiserror::Error;

type ToolFuture = Pin<Box<dyn Future<Output = String> + Send>>;

/// A registered tool's callable: takes the provider's parsed JSON arguments
/// and returns the tool's textual output. Never fails — see the module docs.
pub type ToolHandle = Arc<dyn Fn(Value) -> ToolFuture + Send + Sync>;

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("tool '{0}' is already registered")]
    AlreadyRegistered(String),
}

struct Entry {
    descriptor: ToolDescriptor,
    handle: ToolHandle,
}

/// Process-wide catalog of named callables (§4.1). Names are unique;
/// re-registration under the same name is rejected unless `replace` is used.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Entry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        handle: ToolHandle,
    ) -> Result<(), RegisterError> {
        let name = name.into();
        if self.tools.contains_key(&name) {
            return Err(RegisterError::AlreadyRegistered(name));
        }
        self.tools.insert(
            name.clone(),
            Entry {
                descriptor: ToolDescriptor {
                    name,
                    description: description.into(),
                    parameters,
                },
                handle,
            },
        );
        Ok(())
    }

    /// Register a tool, silently replacing any existing registration under
    /// the same name.
    pub fn register_replacing(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        handle: ToolHandle,
    ) {
        let name = name.into();
        self.tools.insert(
            name.clone(),
            Entry {
                descriptor: ToolDescriptor {
                    name,
                    description: description.into(),
                    parameters,
                },
                handle,
            },
        );
    }

    pub fn lookup(&self, name: &str) -> Option<ToolHandle> {
        self.tools.get(name).map(|entry| entry.handle.clone())
    }

    pub fn list_descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.values().map(|entry| entry.descriptor.clone()).collect()
    }

    /// Invoke a registered tool by name, surfacing an unknown-tool name as
    /// ordinary tool output rather than an error type — the agentic loop
    /// treats every tool result as text.
    pub async fn invoke(&self, name: &str, args: Value) -> String {
        match self.lookup(name) {
            Some(handle) => handle(args).await,
            None => format!("Tool error: unknown tool '{name}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo_handle() -> ToolHandle {
        Arc::new(|args: Value| Box::pin(async move { format!("echo:{args}") }))
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry
            .register("echo", "echoes its arguments", json!({"type": "object"}), echo_handle())
            .unwrap();
        let result = registry.register("echo", "again", json!({"type": "object"}), echo_handle());
        assert!(matches!(result, Err(RegisterError::AlreadyRegistered(name)) if name == "echo"));
    }

    #[tokio::test]
    async fn invoke_unknown_tool_returns_text_not_panic() {
        let registry = ToolRegistry::new();
        let output = registry.invoke("missing", json!({})).await;
        assert!(output.starts_with("Tool error"));
    }

    #[tokio::test]
    async fn invoke_dispatches_to_registered_handle() {
        let mut registry = ToolRegistry::new();
        registry
            .register("echo", "echoes its arguments", json!({"type": "object"}), echo_handle())
            .unwrap();
        let output = registry.invoke("echo", json!({"a": 1})).await;
        assert_eq!(output, "echo:{\"a\":1}");
    }
}

//! Tool capability implementation.
//!
//! This module provides a registry for tools and dispatches tool calls to
//! their handlers.

use std::collections::BTreeMap;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use scopekit_core::protocol::method;
use scopekit_core::types::{Tool, ToolOutput};
use scopekit_core::SessionError;
use serde_json::Value;

/// A boxed async function for tool execution.
pub type BoxedToolFn =
    Box<dyn Fn(Value) -> BoxFuture<'static, Result<ToolOutput, SessionError>> + Send + Sync>;

/// A registered tool with metadata and handler.
pub struct RegisteredTool {
    /// Tool metadata.
    pub tool: Tool,
    /// Handler function.
    pub handler: BoxedToolFn,
}

/// Service for managing tools.
///
/// Tools are kept ordered by name so listings are deterministic.
#[derive(Default)]
pub struct ToolService {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolService {
    /// Create a new empty tool service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with a handler function.
    ///
    /// Registering a second tool with the same name replaces the first.
    pub fn register<F, Fut>(&mut self, tool: Tool, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput, SessionError>> + Send + 'static,
    {
        let name = tool.name.clone();
        let boxed: BoxedToolFn = Box::new(move |args| handler(args).boxed());
        self.tools.insert(
            name,
            RegisteredTool {
                tool,
                handler: boxed,
            },
        );
    }

    /// Get a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// Check if a tool exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all registered tools.
    #[must_use]
    pub fn list(&self) -> Vec<&Tool> {
        self.tools.values().map(|r| &r.tool).collect()
    }

    /// Get the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the service has no tools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Call a tool by name.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<ToolOutput, SessionError> {
        let registered = self
            .tools
            .get(name)
            .ok_or_else(|| SessionError::tool_not_found(name))?;

        (registered.handler)(arguments).await
    }
}

/// Extract a required string argument from a tool call.
pub fn string_arg<'a>(arguments: &'a Value, name: &str) -> Result<&'a str, SessionError> {
    arguments.get(name).and_then(Value::as_str).ok_or_else(|| {
        SessionError::invalid_params(
            method::CALL_TOOL,
            format!("missing required string argument `{name}`"),
        )
    })
}

//! Fluent builder for [`Server`].
//!
//! # Example
//!
//! ```rust
//! use scopekit_core::types::{Tool, ToolOutput};
//! use scopekit_server::ServerBuilder;
//!
//! let server = ServerBuilder::new("echo-server", "1.0.0")
//!     .instructions("Echoes its input")
//!     .tool(Tool::new("echo"), |args| async move {
//!         Ok(ToolOutput::text(args.to_string()))
//!     })
//!     .build();
//!
//! assert_eq!(server.info().name, "echo-server");
//! assert!(server.tools().contains("echo"));
//! ```

use std::future::Future;

use scopekit_core::types::{Resource, ResourceContents, ResourceTemplate, Tool, ToolOutput};
use scopekit_core::{ServerInfo, SessionError};
use serde_json::Value;

use crate::capability::{ResourceService, TemplateParams, ToolService};
use crate::server::Server;

/// Builder for [`Server`].
pub struct ServerBuilder {
    info: ServerInfo,
    instructions: Option<String>,
    tools: ToolService,
    resources: ResourceService,
}

impl ServerBuilder {
    /// Start building a server with the given name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: ServerInfo::new(name, version),
            instructions: None,
            tools: ToolService::new(),
            resources: ResourceService::new(),
        }
    }

    /// Set the instructions returned from `initialize`.
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Register a tool.
    pub fn tool<F, Fut>(mut self, tool: Tool, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput, SessionError>> + Send + 'static,
    {
        self.tools.register(tool, handler);
        self
    }

    /// Register a static resource.
    pub fn resource<F, Fut>(mut self, resource: Resource, handler: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceContents, SessionError>> + Send + 'static,
    {
        self.resources.register(resource, handler);
        self
    }

    /// Register a resource template.
    pub fn resource_template<F, Fut>(mut self, template: ResourceTemplate, handler: F) -> Self
    where
        F: Fn(String, TemplateParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceContents, SessionError>> + Send + 'static,
    {
        self.resources.register_template(template, handler);
        self
    }

    /// Build the server.
    #[must_use]
    pub fn build(self) -> Server {
        Server::new(self.info, self.instructions, self.tools, self.resources)
    }
}

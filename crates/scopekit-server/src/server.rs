//! Request-dispatching server.

use scopekit_core::protocol::{Request, Response};
use scopekit_core::types::{
    ListResourceTemplatesResult, ListResourcesResult, ListToolsResult, ReadResourceResult,
};
use scopekit_core::{
    InitializeRequest, InitializeResult, PROTOCOL_VERSION, ServerCapabilities, ServerInfo,
    SessionError,
};
use scopekit_transport::Service;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::builder::ServerBuilder;
use crate::capability::{ResourceService, ToolService};

/// A server answering [`Request`]s from its tool and resource registries.
///
/// The server keeps no per-session state; every request is answered on its
/// own.
pub struct Server {
    info: ServerInfo,
    instructions: Option<String>,
    tools: ToolService,
    resources: ResourceService,
}

impl Server {
    pub(crate) const fn new(
        info: ServerInfo,
        instructions: Option<String>,
        tools: ToolService,
        resources: ResourceService,
    ) -> Self {
        Self {
            info,
            instructions,
            tools,
            resources,
        }
    }

    /// Start building a server.
    #[must_use]
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> ServerBuilder {
        ServerBuilder::new(name, version)
    }

    /// Server information.
    #[must_use]
    pub const fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// The tool registry.
    #[must_use]
    pub const fn tools(&self) -> &ToolService {
        &self.tools
    }

    /// The resource registry.
    #[must_use]
    pub const fn resources(&self) -> &ResourceService {
        &self.resources
    }

    /// Capabilities derived from what is registered.
    #[must_use]
    pub fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            tools: !self.tools.is_empty(),
            resources: !self.resources.is_empty(),
        }
    }

    fn initialize(&self, request: &InitializeRequest) -> InitializeResult {
        if request.protocol_version != PROTOCOL_VERSION {
            warn!(
                requested = %request.protocol_version,
                supported = PROTOCOL_VERSION,
                "Client requested a different protocol version"
            );
        }

        let session_id = Uuid::new_v4().to_string();
        debug!(
            client = %request.client_info.name,
            session_id = %session_id,
            "Initializing session"
        );

        let mut result = InitializeResult::new(self.info.clone(), self.capabilities())
            .session_id(session_id);
        result.instructions.clone_from(&self.instructions);
        result
    }
}

impl Service for Server {
    async fn handle(&self, request: Request) -> Result<Response, SessionError> {
        match request {
            Request::Initialize(init) => Ok(Response::Initialized(self.initialize(&init))),
            Request::Ping => Ok(Response::Pong),
            Request::ListTools => Ok(Response::Tools(ListToolsResult {
                tools: self.tools.list().into_iter().cloned().collect(),
            })),
            Request::CallTool(call) => {
                let output = self.tools.call(&call.name, call.arguments).await?;
                Ok(Response::ToolResult(output.into()))
            }
            Request::ListResources => Ok(Response::Resources(ListResourcesResult {
                resources: self.resources.list().into_iter().cloned().collect(),
            })),
            Request::ListResourceTemplates => {
                Ok(Response::ResourceTemplates(ListResourceTemplatesResult {
                    resource_templates: self.resources.list_templates().into_iter().cloned().collect(),
                }))
            }
            Request::ReadResource(read) => {
                let contents = self.resources.read(&read.uri).await?;
                Ok(Response::ResourceContents(ReadResourceResult {
                    contents: vec![contents],
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopekit_core::ClientInfo;
    use scopekit_core::types::{CallToolRequest, Tool, ToolOutput};

    fn server() -> Server {
        Server::builder("test-server", "0.1.0")
            .instructions("be nice")
            .tool(Tool::new("ok"), |_| async { Ok(ToolOutput::text("fine")) })
            .build()
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = server()
            .handle(Request::Initialize(InitializeRequest::new(ClientInfo::default())))
            .await
            .unwrap();

        let Response::Initialized(result) = response else {
            panic!("expected initialize result");
        };
        assert_eq!(result.server_info.name, "test-server");
        assert_eq!(result.instructions.as_deref(), Some("be nice"));
        assert!(result.capabilities.tools);
        assert!(!result.capabilities.resources);
        assert!(result.session_id.is_some());
    }

    #[tokio::test]
    async fn test_dispatch_tool_call() {
        let response = server()
            .handle(Request::CallTool(CallToolRequest::new("ok", serde_json::Value::Null)))
            .await
            .unwrap();
        assert!(matches!(response, Response::ToolResult(ref r) if r.text_content() == "fine"));
    }

    #[tokio::test]
    async fn test_sessions_get_distinct_ids() {
        let server = server();
        let init = || Request::Initialize(InitializeRequest::new(ClientInfo::default()));
        let (Response::Initialized(a), Response::Initialized(b)) = (
            server.handle(init()).await.unwrap(),
            server.handle(init()).await.unwrap(),
        ) else {
            panic!("expected initialize results");
        };
        assert_ne!(a.session_id, b.session_id);
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let err = server()
            .handle(Request::ReadResource(
                scopekit_core::types::ReadResourceRequest::new("docs://nope"),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::ResourceNotFound { .. }));
    }
}

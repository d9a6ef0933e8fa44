//! Client sessions.
//!
//! A [`ClientSession`] speaks the request/response protocol over a shared
//! transport. It has two lifecycle steps of its own: it must be
//! [initialized](ClientSession::initialize) before anything else is sent,
//! and once [closed](ClientSession::close) it refuses every request.
//!
//! [`SessionScope`] adapts a session to [`ScopedResource`], so it can be
//! entered on a [`ResourceStack`](scopekit_core::ResourceStack) and closed
//! by the stack's teardown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_lock::OnceCell;
use scopekit_core::protocol::method;
use scopekit_core::types::{
    CallToolRequest, CallToolResult, ReadResourceRequest, Resource, ResourceContents,
    ResourceTemplate, Tool,
};
use scopekit_core::{
    ClientInfo, InitializeRequest, InitializeResult, PROTOCOL_VERSION, Request, Response,
    ScopedResource, ServerInfo, SessionError,
};
use scopekit_transport::Transport;
use serde_json::Value;
use tracing::{debug, trace, warn};

/// A protocol session over a transport.
pub struct ClientSession<T: Transport> {
    transport: Arc<T>,
    client_info: ClientInfo,
    init: OnceCell<InitializeResult>,
    closed: AtomicBool,
}

impl<T: Transport> ClientSession<T> {
    /// Create an uninitialized session over `transport`.
    #[must_use]
    pub fn new(transport: Arc<T>, client_info: ClientInfo) -> Self {
        Self {
            transport,
            client_info,
            init: OnceCell::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Perform the initialization handshake.
    ///
    /// The handshake is sent once; later calls return the stored result.
    pub async fn initialize(&self) -> Result<InitializeResult, SessionError> {
        self.ensure_open()?;
        let result = self.init.get_or_try_init(|| self.handshake()).await?;
        Ok(result.clone())
    }

    async fn handshake(&self) -> Result<InitializeResult, SessionError> {
        let request = Request::Initialize(InitializeRequest::new(self.client_info.clone()));
        let result = match self.transport.request(request).await? {
            Response::Initialized(result) => result,
            other => return Err(unexpected(method::INITIALIZE, &other)),
        };

        if result.protocol_version != PROTOCOL_VERSION {
            warn!(
                server_version = %result.protocol_version,
                client_version = PROTOCOL_VERSION,
                "Server speaks a different protocol version"
            );
        }
        debug!(
            server = %result.server_info.name,
            session_id = result.session_id.as_deref().unwrap_or("-"),
            "Session initialized"
        );
        Ok(result)
    }

    /// The handshake result, once initialized.
    #[must_use]
    pub fn initialize_result(&self) -> Option<&InitializeResult> {
        self.init.get()
    }

    /// Information about the server, once initialized.
    #[must_use]
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.init.get().map(|result| &result.server_info)
    }

    /// Whether the handshake has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.init.is_initialized()
    }

    /// Whether the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// The transport carrying this session.
    #[must_use]
    pub const fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Close the session. Closing twice is a no-op.
    ///
    /// The transport is left open; it belongs to whoever opened it.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(client = %self.client_info.name, "Session closed");
        }
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_closed() {
            return Err(SessionError::not_connected("session is closed"));
        }
        Ok(())
    }

    async fn send(&self, request: Request) -> Result<Response, SessionError> {
        self.ensure_open()?;
        if !self.is_initialized() {
            return Err(SessionError::NotInitialized);
        }
        trace!(method = request.method(), "Sending request");
        self.transport.request(request).await
    }

    /// List the tools the server offers.
    pub async fn list_tools(&self) -> Result<Vec<Tool>, SessionError> {
        match self.send(Request::ListTools).await? {
            Response::Tools(result) => Ok(result.tools),
            other => Err(unexpected(method::LIST_TOOLS, &other)),
        }
    }

    /// Call a tool.
    ///
    /// Tool-level failures come back as a [`CallToolResult`] with
    /// `is_error` set; only protocol failures are returned as `Err`.
    pub async fn call_tool(
        &self,
        name: impl Into<String>,
        arguments: Value,
    ) -> Result<CallToolResult, SessionError> {
        let request = Request::CallTool(CallToolRequest::new(name, arguments));
        match self.send(request).await? {
            Response::ToolResult(result) => Ok(result),
            other => Err(unexpected(method::CALL_TOOL, &other)),
        }
    }

    /// List the static resources the server offers.
    pub async fn list_resources(&self) -> Result<Vec<Resource>, SessionError> {
        match self.send(Request::ListResources).await? {
            Response::Resources(result) => Ok(result.resources),
            other => Err(unexpected(method::LIST_RESOURCES, &other)),
        }
    }

    /// List the resource templates the server offers.
    pub async fn list_resource_templates(&self) -> Result<Vec<ResourceTemplate>, SessionError> {
        match self.send(Request::ListResourceTemplates).await? {
            Response::ResourceTemplates(result) => Ok(result.resource_templates),
            other => Err(unexpected(method::LIST_RESOURCE_TEMPLATES, &other)),
        }
    }

    /// Read a resource by URI.
    pub async fn read_resource(
        &self,
        uri: impl Into<String>,
    ) -> Result<Vec<ResourceContents>, SessionError> {
        let request = Request::ReadResource(ReadResourceRequest::new(uri));
        match self.send(request).await? {
            Response::ResourceContents(result) => Ok(result.contents),
            other => Err(unexpected(method::READ_RESOURCE, &other)),
        }
    }

    /// Check that the server is responsive.
    pub async fn ping(&self) -> Result<(), SessionError> {
        match self.send(Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Err(unexpected(method::PING, &other)),
        }
    }
}

impl<T: Transport> std::fmt::Debug for ClientSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("client_info", &self.client_info)
            .field("initialized", &self.is_initialized())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

fn unexpected(method: &str, response: &Response) -> SessionError {
    SessionError::unexpected_response(method, response.method())
}

/// A [`ClientSession`] as a [`ScopedResource`].
///
/// Entering hands out the shared session; exiting closes it.
pub struct SessionScope<T: Transport> {
    session: Arc<ClientSession<T>>,
}

impl<T: Transport> SessionScope<T> {
    /// Wrap a session.
    #[must_use]
    pub fn new(session: ClientSession<T>) -> Self {
        Self {
            session: Arc::new(session),
        }
    }
}

impl<T: Transport> ScopedResource for SessionScope<T> {
    type Output = Arc<ClientSession<T>>;
    type Error = SessionError;

    async fn enter(&mut self) -> Result<Arc<ClientSession<T>>, SessionError> {
        self.session.ensure_open()?;
        Ok(Arc::clone(&self.session))
    }

    async fn exit(self) -> Result<(), SessionError> {
        self.session.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scopekit_server::{DocumentStore, document_server};
    use scopekit_transport::{Connector, MemoryConnector, MemoryTransport};
    use serde_json::json;

    async fn session() -> ClientSession<MemoryTransport> {
        let transport = MemoryConnector::new(document_server(DocumentStore::default()))
            .connect()
            .await
            .unwrap();
        ClientSession::new(Arc::new(transport), ClientInfo::default())
    }

    #[tokio::test]
    async fn test_requests_need_initialize() {
        let session = session().await;

        let err = session.list_tools().await.unwrap_err();
        assert!(matches!(err, SessionError::NotInitialized));

        let result = session.initialize().await.unwrap();
        assert_eq!(result.server_info.name, "DocumentMCP");
        assert!(result.session_id.is_some());
        assert_eq!(session.server_info(), Some(&result.server_info));
        assert_eq!(session.list_tools().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_initialize_handshakes_once() {
        let session = session().await;

        let first = session.initialize().await.unwrap();
        let second = session.initialize().await.unwrap();
        assert_eq!(first.session_id, second.session_id);
    }

    #[tokio::test]
    async fn test_closed_session_rejects_requests() {
        let session = session().await;
        session.initialize().await.unwrap();
        session.close();
        session.close();

        let err = session.ping().await.unwrap_err();
        assert!(matches!(err, SessionError::NotConnected { .. }));
        assert!(session.transport().is_connected());
    }

    #[tokio::test]
    async fn test_tool_errors_are_results() {
        let session = session().await;
        session.initialize().await.unwrap();

        let result = session
            .call_tool("read_doc_content", json!({"doc_id": "nope.md"}))
            .await
            .unwrap();
        assert!(result.is_error());

        let err = session.call_tool("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, SessionError::ToolNotFound { .. }));
    }

    #[tokio::test]
    async fn test_scope_closes_on_exit() {
        let mut scope = SessionScope::new(session().await);

        let session = scope.enter().await.unwrap();
        assert!(!session.is_closed());

        scope.exit().await.unwrap();
        assert!(session.is_closed());
    }
}

//! The stack-managed client.
//!
//! A [`Client`] owns a [`ResourceStack`]. Connecting opens a transport and
//! a session on a stack of their own, initializes the session, and then
//! registers that connection stack on the client's stack as one entry.
//! [`Client::cleanup`] tears everything down in reverse order: callbacks
//! deferred after connecting, the session, the transport, and finally
//! anything registered before connecting.

use std::future::Future;
use std::sync::Arc;

use scopekit_core::types::{CallToolResult, Resource, ResourceContents, ResourceTemplate, Tool};
use scopekit_core::{
    Acquired, ClientInfo, InitializeResult, ReleaseOutcome, ResourceStack, ServerInfo,
    SessionError, StackError,
};
use scopekit_transport::{Connector, Transport, TransportError};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::session::{ClientSession, SessionScope};

/// Session type produced by a connector.
pub type SessionOf<C> = ClientSession<<C as Connector>::Transport>;

/// A client whose transport and session are released by a resource stack.
///
/// # Example
///
/// ```rust
/// use scopekit_client::Client;
/// use scopekit_server::{DocumentStore, document_server};
/// use scopekit_transport::MemoryConnector;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), scopekit_core::SessionError> {
/// let mut client = Client::new(MemoryConnector::new(document_server(DocumentStore::default())));
/// client.connect().await?;
///
/// let result = client
///     .call_tool("read_doc_content", serde_json::json!({"doc_id": "plan.md"}))
///     .await?;
/// assert!(!result.is_error());
///
/// client.cleanup().await?;
/// # Ok(())
/// # }
/// ```
pub struct Client<C: Connector> {
    connector: C,
    config: ClientConfig,
    stack: ResourceStack,
    session: Option<Arc<SessionOf<C>>>,
}

impl<C: Connector> Client<C> {
    /// Create a disconnected client with the default configuration.
    #[must_use]
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, ClientConfig::default())
    }

    /// Create a disconnected client with the given configuration.
    #[must_use]
    pub fn with_config(connector: C, config: ClientConfig) -> Self {
        Self {
            stack: ResourceStack::with_config(config.stack.clone()),
            connector,
            config,
            session: None,
        }
    }

    /// Open the transport and the session, then initialize the session.
    ///
    /// Connecting is all or nothing: if any step fails, whatever was
    /// already opened is released before the error is returned. If that
    /// release fails too, the error is [`SessionError::Aborted`].
    pub async fn connect(&mut self) -> Result<InitializeResult, SessionError> {
        if self.session.is_some() {
            return Err(SessionError::internal("client is already connected"));
        }
        if self.stack.is_closed() {
            return Err(StackError::closed(&self.stack.config().label, "connection").into());
        }

        let mut connection = ResourceStack::with_config(self.config.stack.clone());
        let opened = open(
            &mut connection,
            &self.connector,
            self.config.client_info.clone(),
        )
        .await;

        let (session, result) = match opened {
            Ok(opened) => opened,
            Err(err) => {
                warn!(error = %err, "Connect failed, releasing the partial connection");
                return Err(match connection.close().await {
                    Err(StackError::Release(release)) => err.aborted(release),
                    _ => err,
                });
            }
        };

        self.stack
            .defer("connection", move || async move { connection.close().await })?;
        self.session = Some(session);
        Ok(result)
    }

    /// Whether the client has a live session.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// The live session.
    pub fn session(&self) -> Result<&Arc<SessionOf<C>>, SessionError> {
        self.session.as_ref().ok_or_else(|| {
            SessionError::not_connected("Client session not initialized. Call connect first.")
        })
    }

    /// Information about the connected server.
    #[must_use]
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.session.as_ref().and_then(|session| session.server_info())
    }

    /// List the tools the server offers.
    pub async fn list_tools(&self) -> Result<Vec<Tool>, SessionError> {
        self.session()?.list_tools().await
    }

    /// Call a tool.
    pub async fn call_tool(
        &self,
        name: impl Into<String>,
        arguments: Value,
    ) -> Result<CallToolResult, SessionError> {
        self.session()?.call_tool(name, arguments).await
    }

    /// List the static resources the server offers.
    pub async fn list_resources(&self) -> Result<Vec<Resource>, SessionError> {
        self.session()?.list_resources().await
    }

    /// List the resource templates the server offers.
    pub async fn list_resource_templates(&self) -> Result<Vec<ResourceTemplate>, SessionError> {
        self.session()?.list_resource_templates().await
    }

    /// Read a resource by URI.
    pub async fn read_resource(
        &self,
        uri: impl Into<String>,
    ) -> Result<Vec<ResourceContents>, SessionError> {
        self.session()?.read_resource(uri).await
    }

    /// Read a resource and decode it by MIME type.
    ///
    /// `application/json` contents are parsed; anything else is returned as
    /// a JSON string.
    pub async fn read_resource_value(&self, uri: &str) -> Result<Value, SessionError> {
        let contents = self
            .read_resource(uri)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::resource_not_found(uri))?;

        if contents.is_json() {
            Ok(serde_json::from_str(&contents.text)?)
        } else {
            Ok(Value::String(contents.text))
        }
    }

    /// Check that the server is responsive.
    pub async fn ping(&self) -> Result<(), SessionError> {
        self.session()?.ping().await
    }

    /// Register a callback to run during [`cleanup`](Self::cleanup).
    pub fn defer_cleanup<F, Fut>(
        &mut self,
        label: impl Into<String>,
        callback: F,
    ) -> Result<(), SessionError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: ReleaseOutcome,
    {
        Ok(self.stack.defer(label, callback)?)
    }

    /// The stack owning everything this client releases on cleanup.
    pub fn resources(&mut self) -> &mut ResourceStack {
        &mut self.stack
    }

    /// Release the session, the transport and every deferred callback.
    ///
    /// The client can be connected again afterwards. Cleaning up a client
    /// that holds nothing is a no-op.
    pub async fn cleanup(&mut self) -> Result<(), SessionError> {
        self.session = None;
        let mut stack = std::mem::replace(
            &mut self.stack,
            ResourceStack::with_config(self.config.stack.clone()),
        );
        if !stack.is_empty() {
            debug!(entries = stack.len(), "Cleaning up client");
        }
        stack.close().await?;
        Ok(())
    }

    /// The client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The connector used by [`connect`](Self::connect).
    #[must_use]
    pub const fn connector(&self) -> &C {
        &self.connector
    }
}

impl<C: Connector> std::fmt::Debug for Client<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("stack", &self.stack)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

async fn open<C: Connector>(
    stack: &mut ResourceStack,
    connector: &C,
    client_info: ClientInfo,
) -> Result<(Arc<SessionOf<C>>, InitializeResult), SessionError> {
    let transport = stack
        .acquire("transport", || async {
            let transport = Arc::new(connector.connect().await?);
            let closing = Arc::clone(&transport);
            Ok::<_, TransportError>(Acquired::new(transport, move || async move {
                closing.close().await
            }))
        })
        .await?;

    let session = stack
        .enter(
            "session",
            SessionScope::new(ClientSession::new(transport, client_info)),
        )
        .await?;

    let result = session.initialize().await?;
    Ok((session, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scopekit_testing::{RecordingConnector, RejectingService, ReleaseLog, document_connector};
    use scopekit_transport::MemoryConnector;
    use serde_json::json;

    #[tokio::test]
    async fn test_session_requires_connect() {
        let client = Client::new(document_connector());

        let err = client.session().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not connected: Client session not initialized. Call connect first."
        );
        assert!(client.server_info().is_none());
        assert!(matches!(
            client.list_tools().await,
            Err(SessionError::NotConnected { .. })
        ));
    }

    #[tokio::test]
    async fn test_connect_use_cleanup() {
        let log = ReleaseLog::new();
        let mut client = Client::new(RecordingConnector::new(document_connector(), log.clone()));

        let result = client.connect().await.unwrap();
        assert_eq!(result.server_info.name, "DocumentMCP");
        assert_eq!(client.server_info(), Some(&result.server_info));

        let tools = client.list_tools().await.unwrap();
        assert_eq!(tools.len(), 2);

        let text = client
            .call_tool("read_doc_content", json!({"doc_id": "report.pdf"}))
            .await
            .unwrap();
        assert_eq!(
            text.text_content(),
            "The report details the state of a 20m condenser tower."
        );

        let ids = client.read_resource_value("docs://documents").await.unwrap();
        assert_eq!(ids.as_array().map(Vec::len), Some(6));

        let doc = client.read_resource_value("docs://plan.md").await.unwrap();
        assert_eq!(
            doc,
            json!("The plan outlines the steps for the project's implementation.")
        );

        let session = Arc::clone(client.session().unwrap());
        client.cleanup().await.unwrap();

        assert!(!client.is_connected());
        assert!(session.is_closed());
        assert!(!session.transport().is_connected());
        assert_eq!(log.entries(), ["OPEN: transport", "CLOSE: transport"]);
    }

    #[tokio::test]
    async fn test_cleanup_twice_is_noop() {
        let log = ReleaseLog::new();
        let mut client = Client::new(RecordingConnector::new(document_connector(), log.clone()));
        client.connect().await.unwrap();

        client.cleanup().await.unwrap();
        client.cleanup().await.unwrap();
        assert_eq!(log.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_initialize_closes_transport() {
        let log = ReleaseLog::new();
        let mut client = Client::new(RecordingConnector::new(
            MemoryConnector::new(RejectingService),
            log.clone(),
        ));

        let err = client.connect().await.unwrap_err();
        assert!(matches!(err.root(), SessionError::Internal { .. }));
        assert!(!client.is_connected());
        assert_eq!(log.entries(), ["OPEN: transport", "CLOSE: transport"]);
        assert!(client.resources().is_empty());
    }

    #[tokio::test]
    async fn test_deferred_cleanup_runs_before_disconnect() {
        let log = ReleaseLog::new();
        let mut client = Client::new(RecordingConnector::new(document_connector(), log.clone()));

        let early = log.clone();
        client
            .defer_cleanup("before", move || async move { early.record("before connect") })
            .unwrap();
        client.connect().await.unwrap();
        let late = log.clone();
        client
            .defer_cleanup("after", move || async move { late.record("after connect") })
            .unwrap();

        assert_eq!(client.resources().labels(), ["after", "connection", "before"]);
        client.cleanup().await.unwrap();

        assert_eq!(
            log.entries(),
            [
                "OPEN: transport",
                "after connect",
                "CLOSE: transport",
                "before connect"
            ]
        );
    }

    #[tokio::test]
    async fn test_connect_on_closed_stack_opens_nothing() {
        let log = ReleaseLog::new();
        let mut client = Client::new(RecordingConnector::new(document_connector(), log.clone()));
        client.resources().close().await.unwrap();

        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, SessionError::Stack(ref stack) if stack.is_closed()));
        assert!(!client.is_connected());
        assert!(log.is_empty());

        client.cleanup().await.unwrap();
        client.connect().await.unwrap();
        assert_eq!(log.entries(), ["OPEN: transport"]);
        client.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_twice_fails() {
        let mut client = Client::new(document_connector());
        client.connect().await.unwrap();

        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, SessionError::Internal { .. }));

        client.cleanup().await.unwrap();
        client.connect().await.unwrap();
        client.ping().await.unwrap();
        client.cleanup().await.unwrap();
    }
}

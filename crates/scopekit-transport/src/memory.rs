//! In-memory transport.
//!
//! [`MemoryConnector`] serves a [`Service`] to in-process clients. Each
//! `connect` spawns a connection task fed by a bounded channel of
//! `(request, reply)` pairs; the returned [`MemoryTransport`] sends requests
//! into that channel and waits for the replies.
//!
//! # Example
//!
//! ```rust
//! use scopekit_core::{Request, Response, SessionError};
//! use scopekit_transport::{Connector, MemoryConnector, Service, Transport};
//!
//! struct Echo;
//!
//! impl Service for Echo {
//!     async fn handle(&self, _request: Request) -> Result<Response, SessionError> {
//!         Ok(Response::Pong)
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = MemoryConnector::new(Echo).connect().await?;
//! assert_eq!(transport.request(Request::Ping).await?, Response::Pong);
//! transport.close().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_lock::Mutex;
use scopekit_core::{Request, Response, SessionError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::traits::{Connector, Service, Transport, TransportMetadata};

type Reply = oneshot::Sender<Result<Response, SessionError>>;
type Envelope = (Request, Reply);

/// Opens [`MemoryTransport`]s to a shared service.
pub struct MemoryConnector<S> {
    service: Arc<S>,
    config: TransportConfig,
    next_id: AtomicU64,
}

impl<S: Service> MemoryConnector<S> {
    /// Create a connector with the default configuration.
    #[must_use]
    pub fn new(service: S) -> Self {
        Self::with_config(service, TransportConfig::default())
    }

    /// Create a connector with the given configuration.
    #[must_use]
    pub fn with_config(service: S, config: TransportConfig) -> Self {
        Self {
            service: Arc::new(service),
            config,
            next_id: AtomicU64::new(1),
        }
    }

    /// The connector configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// The service behind this connector.
    #[must_use]
    pub const fn service(&self) -> &Arc<S> {
        &self.service
    }
}

impl<S: Service> Connector for MemoryConnector<S> {
    type Transport = MemoryTransport;

    async fn connect(&self) -> Result<MemoryTransport, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.config.channel_capacity);
        let (ready_tx, ready_rx) = oneshot::channel();

        let task = tokio::spawn(serve(id, Arc::clone(&self.service), receiver, ready_tx));

        match tokio::time::timeout(self.config.connect_timeout, ready_rx).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => {
                return Err(TransportError::connection(
                    "connection task exited before becoming ready",
                ));
            }
            Err(_) => {
                task.abort();
                return Err(TransportError::Timeout {
                    operation: "connect".to_string(),
                    duration: self.config.connect_timeout,
                });
            }
        }

        debug!(connection = id, "Memory transport connected");
        Ok(MemoryTransport {
            id,
            sender: Mutex::new(Some(sender)),
            task: Mutex::new(Some(task)),
            connected: AtomicBool::new(true),
            config: self.config.clone(),
            metadata: TransportMetadata::new("memory")
                .local_addr(format!("client-{id}"))
                .remote_addr(format!("service-{id}"))
                .connected_now(),
        })
    }
}

async fn serve<S: Service>(
    id: u64,
    service: Arc<S>,
    mut receiver: mpsc::Receiver<Envelope>,
    ready: oneshot::Sender<()>,
) {
    if ready.send(()).is_err() {
        return;
    }

    while let Some((request, reply)) = receiver.recv().await {
        let method = request.method();
        trace!(connection = id, method, "Handling request");
        let response = service.handle(request).await;
        if reply.send(response).is_err() {
            debug!(connection = id, method, "Requester went away before the reply");
        }
    }

    debug!(connection = id, "Memory connection task finished");
}

async fn exchange(
    sender: mpsc::Sender<Envelope>,
    request: Request,
) -> Result<Response, SessionError> {
    let (reply_tx, reply_rx) = oneshot::channel();
    sender
        .send((request, reply_tx))
        .await
        .map_err(|_| TransportError::ConnectionClosed)?;
    reply_rx
        .await
        .map_err(|_| TransportError::ConnectionClosed)?
}

/// One in-process connection opened by a [`MemoryConnector`].
pub struct MemoryTransport {
    id: u64,
    sender: Mutex<Option<mpsc::Sender<Envelope>>>,
    task: Mutex<Option<JoinHandle<()>>>,
    connected: AtomicBool,
    config: TransportConfig,
    metadata: TransportMetadata,
}

impl MemoryTransport {
    /// Connection id, unique per connector.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }
}

impl Transport for MemoryTransport {
    async fn request(&self, request: Request) -> Result<Response, SessionError> {
        let sender = self
            .sender
            .lock()
            .await
            .clone()
            .ok_or(TransportError::NotConnected)?;

        let method = request.method();
        match tokio::time::timeout(self.config.request_timeout, exchange(sender, request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                operation: format!("request '{method}'"),
                duration: self.config.request_timeout,
            }
            .into()),
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        let Some(sender) = self.sender.lock().await.take() else {
            return Err(TransportError::AlreadyClosed);
        };
        self.connected.store(false, Ordering::SeqCst);
        drop(sender);

        let task = self.task.lock().await.take();
        if let Some(task) = task {
            task.await
                .map_err(|e| TransportError::connection(format!("connection task failed: {e}")))?;
        }

        debug!(connection = self.id, "Memory transport closed");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn metadata(&self) -> TransportMetadata {
        self.metadata.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopekit_core::types::{CallToolRequest, CallToolResult, ListToolsResult};
    use std::time::Duration;

    struct Echo;

    impl Service for Echo {
        async fn handle(&self, request: Request) -> Result<Response, SessionError> {
            match request {
                Request::Ping => Ok(Response::Pong),
                Request::ListTools => Ok(Response::Tools(ListToolsResult::default())),
                Request::CallTool(call) if call.name == "sleep" => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(Response::ToolResult(CallToolResult::text("late")))
                }
                Request::CallTool(call) => Err(SessionError::tool_not_found(call.name)),
                other => Err(SessionError::internal(format!("unexpected {}", other.method()))),
            }
        }
    }

    #[tokio::test]
    async fn test_request_round_trip() {
        let transport = MemoryConnector::new(Echo).connect().await.unwrap();
        assert!(transport.is_connected());
        assert_eq!(transport.metadata().transport_type, "memory");

        let response = transport.request(Request::Ping).await.unwrap();
        assert_eq!(response, Response::Pong);
    }

    #[tokio::test]
    async fn test_service_errors_pass_through() {
        let transport = MemoryConnector::new(Echo).connect().await.unwrap();

        let err = transport
            .request(Request::CallTool(CallToolRequest::new("missing", serde_json::Value::Null)))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::ToolNotFound { ref name } if name == "missing"));
    }

    #[tokio::test]
    async fn test_close_twice_fails() {
        let transport = MemoryConnector::new(Echo).connect().await.unwrap();

        transport.close().await.unwrap();
        assert!(!transport.is_connected());
        assert!(matches!(
            transport.close().await,
            Err(TransportError::AlreadyClosed)
        ));
    }

    #[tokio::test]
    async fn test_request_after_close() {
        let transport = MemoryConnector::new(Echo).connect().await.unwrap();
        transport.close().await.unwrap();

        let err = transport.request(Request::Ping).await.unwrap_err();
        assert!(matches!(
            TransportError::find_in(&err),
            Some(TransportError::NotConnected)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_timeout() {
        let config = TransportConfig::new().request_timeout(Duration::from_millis(100));
        let transport = MemoryConnector::with_config(Echo, config)
            .connect()
            .await
            .unwrap();

        let err = transport
            .request(Request::CallTool(CallToolRequest::new("sleep", serde_json::Value::Null)))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_connections_are_independent() {
        let connector = MemoryConnector::new(Echo);
        let first = connector.connect().await.unwrap();
        let second = connector.connect().await.unwrap();
        assert_ne!(first.id(), second.id());

        first.close().await.unwrap();
        assert_eq!(second.request(Request::Ping).await.unwrap(), Response::Pong);
    }
}

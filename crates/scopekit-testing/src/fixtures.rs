//! Test fixtures.
//!
//! Ready-made services and connectors: the seeded document server behind an
//! in-memory connector, a service that refuses to initialize, and a
//! connector wrapper that records when its transports open and close.

use scopekit_core::{Request, Response, SessionError};
use scopekit_server::{DocumentStore, Server, document_server};
use scopekit_transport::{
    Connector, MemoryConnector, Service, Transport, TransportError, TransportMetadata,
};

use crate::recorder::ReleaseLog;

/// A store seeded with the six sample documents.
#[must_use]
pub fn document_store() -> DocumentStore {
    DocumentStore::default()
}

/// An in-memory connector to a document server over [`document_store`].
#[must_use]
pub fn document_connector() -> MemoryConnector<Server> {
    MemoryConnector::new(document_server(document_store()))
}

/// A service whose `initialize` always fails with an internal error.
///
/// Every other request is answered with [`SessionError::NotInitialized`],
/// except `ping`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectingService;

impl Service for RejectingService {
    async fn handle(&self, request: Request) -> Result<Response, SessionError> {
        match request {
            Request::Initialize(_) => Err(SessionError::internal("initialize rejected")),
            Request::Ping => Ok(Response::Pong),
            _ => Err(SessionError::NotInitialized),
        }
    }
}

/// Wraps a connector, recording `OPEN: transport` and `CLOSE: transport`.
#[derive(Debug)]
pub struct RecordingConnector<C> {
    inner: C,
    log: ReleaseLog,
}

impl<C: Connector> RecordingConnector<C> {
    /// Wrap `inner`, recording into `log`.
    pub fn new(inner: C, log: ReleaseLog) -> Self {
        Self { inner, log }
    }

    /// The log transports record into.
    #[must_use]
    pub const fn log(&self) -> &ReleaseLog {
        &self.log
    }
}

impl<C: Connector> Connector for RecordingConnector<C> {
    type Transport = RecordingTransport<C::Transport>;

    async fn connect(&self) -> Result<Self::Transport, TransportError> {
        let inner = self.inner.connect().await?;
        self.log.record("OPEN: transport");
        Ok(RecordingTransport {
            inner,
            log: self.log.clone(),
        })
    }
}

/// A transport opened by a [`RecordingConnector`].
#[derive(Debug)]
pub struct RecordingTransport<T> {
    inner: T,
    log: ReleaseLog,
}

impl<T: Transport> Transport for RecordingTransport<T> {
    async fn request(&self, request: Request) -> Result<Response, SessionError> {
        self.inner.request(request).await
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.log.record("CLOSE: transport");
        self.inner.close().await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn metadata(&self) -> TransportMetadata {
        self.inner.metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_connector() {
        let log = ReleaseLog::new();
        let connector = RecordingConnector::new(document_connector(), log.clone());

        let transport = connector.connect().await.unwrap();
        assert_eq!(transport.request(Request::Ping).await.unwrap(), Response::Pong);
        transport.close().await.unwrap();

        assert_eq!(connector.log().entries(), ["OPEN: transport", "CLOSE: transport"]);
    }

    #[tokio::test]
    async fn test_rejecting_service() {
        let transport = MemoryConnector::new(RejectingService).connect().await.unwrap();

        let err = transport
            .request(Request::Initialize(scopekit_core::InitializeRequest::new(
                scopekit_core::ClientInfo::default(),
            )))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Internal { .. }));
        assert_eq!(transport.request(Request::Ping).await.unwrap(), Response::Pong);
    }
}

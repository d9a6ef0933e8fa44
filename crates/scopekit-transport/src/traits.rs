//! Core transport traits.
//!
//! The three traits split a connection into the halves a resource stack
//! cares about:
//!
//! - [`Connector`] opens a connection (the acquisition step);
//! - [`Transport`] carries requests and is closed exactly once (the
//!   release step);
//! - [`Service`] answers requests on the far side.

use std::future::Future;
use std::sync::Arc;
use std::time::SystemTime;

use scopekit_core::{Request, Response, SessionError};

use crate::error::TransportError;

/// Something that answers requests, typically a server.
pub trait Service: Send + Sync + 'static {
    /// Handle one request.
    fn handle(&self, request: Request) -> impl Future<Output = Result<Response, SessionError>> + Send;
}

impl<S: Service> Service for Arc<S> {
    fn handle(&self, request: Request) -> impl Future<Output = Result<Response, SessionError>> + Send {
        (**self).handle(request)
    }
}

/// An open connection to a [`Service`].
pub trait Transport: Send + Sync + 'static {
    /// Send a request and wait for its response.
    ///
    /// Errors returned by the service are passed through unchanged;
    /// transport failures are converted into [`SessionError`].
    fn request(&self, request: Request) -> impl Future<Output = Result<Response, SessionError>> + Send;

    /// Close the connection and wait for it to shut down.
    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Whether the transport is still usable.
    fn is_connected(&self) -> bool;

    /// Information about the connection.
    fn metadata(&self) -> TransportMetadata;
}

impl<T: Transport> Transport for Arc<T> {
    fn request(&self, request: Request) -> impl Future<Output = Result<Response, SessionError>> + Send {
        (**self).request(request)
    }

    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).close()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn metadata(&self) -> TransportMetadata {
        (**self).metadata()
    }
}

/// Opens transports.
pub trait Connector: Send + Sync {
    /// The transport produced by this connector.
    type Transport: Transport;

    /// Open a new connection.
    fn connect(&self) -> impl Future<Output = Result<Self::Transport, TransportError>> + Send;
}

/// Information about a transport connection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TransportMetadata {
    /// Transport kind, e.g. `"memory"`.
    pub transport_type: String,
    /// Local address or identifier.
    pub local_addr: Option<String>,
    /// Remote address or identifier.
    pub remote_addr: Option<String>,
    /// When the connection was established.
    pub connected_at: Option<SystemTime>,
}

impl TransportMetadata {
    /// Create metadata for a transport type.
    #[must_use]
    pub fn new(transport_type: impl Into<String>) -> Self {
        Self {
            transport_type: transport_type.into(),
            local_addr: None,
            remote_addr: None,
            connected_at: None,
        }
    }

    /// Set the local address.
    #[must_use]
    pub fn local_addr(mut self, addr: impl Into<String>) -> Self {
        self.local_addr = Some(addr.into());
        self
    }

    /// Set the remote address.
    #[must_use]
    pub fn remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// Record the current time as the connection time.
    #[must_use]
    pub fn connected_now(mut self) -> Self {
        self.connected_at = Some(SystemTime::now());
        self
    }
}

//! Transport error types.

use std::time::Duration;

use scopekit_core::SessionError;
use thiserror::Error;

/// Errors that can occur during transport operations.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// The peer went away while a request was in flight.
    #[error("Connection closed")]
    ConnectionClosed,

    /// The transport has been closed.
    #[error("Not connected")]
    NotConnected,

    /// `close` was called on a transport that is already closed.
    #[error("Transport already closed")]
    AlreadyClosed,

    /// Timeout occurred.
    #[error("{operation} timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// How long the operation waited.
        duration: Duration,
    },
}

impl TransportError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Find the transport error behind a session error, if there is one.
    #[must_use]
    pub fn find_in(err: &SessionError) -> Option<&Self> {
        match err.root() {
            SessionError::Transport {
                source: Some(source),
                ..
            } => source.downcast_ref::<Self>(),
            _ => None,
        }
    }
}

impl From<TransportError> for SessionError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout {
                operation,
                duration,
            } => Self::Timeout {
                operation,
                duration,
            },
            other => Self::Transport {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

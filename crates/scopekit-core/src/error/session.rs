//! Session-level errors shared by clients, servers and transports.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use super::{BoxError, ReleaseErrors, StackError};

/// The error type for client/server sessions.
///
/// Large or rare payloads are boxed to keep `Result<T, SessionError>` small.
#[derive(Error, Diagnostic, Debug)]
pub enum SessionError {
    /// The client has no live session.
    #[error("Not connected: {message}")]
    #[diagnostic(
        code(scopekit::session::not_connected),
        help("connect the client before issuing requests")
    )]
    NotConnected {
        /// Human-readable error message.
        message: String,
    },

    /// A request other than `initialize` was issued before initialization.
    #[error("Session not initialized")]
    #[diagnostic(code(scopekit::session::not_initialized))]
    NotInitialized,

    /// The requested tool is not registered.
    #[error("Tool not found: {name}")]
    #[diagnostic(code(scopekit::tool::not_found))]
    ToolNotFound {
        /// The tool name that was requested.
        name: String,
    },

    /// The requested resource does not exist.
    #[error("Resource not found: {uri}")]
    #[diagnostic(
        code(scopekit::resource::not_found),
        help("Verify the URI is correct and the resource exists")
    )]
    ResourceNotFound {
        /// The URI of the resource that was not found.
        uri: String,
    },

    /// Request parameters were missing or malformed.
    #[error("Invalid params for '{method}': {message}")]
    #[diagnostic(code(scopekit::protocol::invalid_params))]
    InvalidParams {
        /// The method that received invalid parameters.
        method: String,
        /// Human-readable error message.
        message: String,
    },

    /// The peer answered with a response that does not match the request.
    #[error("Unexpected response to '{method}': got {received}")]
    #[diagnostic(code(scopekit::protocol::unexpected_response))]
    UnexpectedResponse {
        /// The method whose response was unexpected.
        method: String,
        /// The method of the response that was received.
        received: String,
    },

    /// A transport-level failure.
    #[error("Transport error: {message}")]
    #[diagnostic(code(scopekit::transport::error))]
    Transport {
        /// Human-readable error message.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<BoxError>,
    },

    /// An operation did not complete in time.
    #[error("{operation} timed out after {duration:?}")]
    #[diagnostic(code(scopekit::transport::timeout))]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// How long the operation waited.
        duration: Duration,
    },

    /// A resource stack failure.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Stack(#[from] StackError),

    /// An operation failed and the cleanup of its partially acquired
    /// resources failed as well.
    #[error("{source}; cleanup also failed: {release}")]
    #[diagnostic(code(scopekit::session::aborted))]
    Aborted {
        /// The error that aborted the operation.
        #[source]
        source: Box<SessionError>,
        /// Failures of the cleanup that followed.
        release: ReleaseErrors,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    #[diagnostic(code(scopekit::serialization))]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {message}")]
    #[diagnostic(code(scopekit::internal), severity(error))]
    Internal {
        /// Human-readable error message.
        message: String,
    },

    /// An error with additional context.
    #[error("{context}: {source}")]
    #[diagnostic(code(scopekit::context))]
    WithContext {
        /// The added context.
        context: String,
        /// The wrapped error.
        #[source]
        source: Box<SessionError>,
    },
}

impl SessionError {
    /// Create a not-connected error.
    pub fn not_connected(message: impl Into<String>) -> Self {
        Self::NotConnected {
            message: message.into(),
        }
    }

    /// Create a tool-not-found error.
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound { name: name.into() }
    }

    /// Create a resource-not-found error.
    pub fn resource_not_found(uri: impl Into<String>) -> Self {
        Self::ResourceNotFound { uri: uri.into() }
    }

    /// Create an invalid-params error.
    pub fn invalid_params(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Create an unexpected-response error.
    pub fn unexpected_response(method: impl Into<String>, received: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            method: method.into(),
            received: received.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Attach cleanup failures to the error that caused the cleanup.
    #[must_use]
    pub fn aborted(self, release: ReleaseErrors) -> Self {
        Self::Aborted {
            source: Box::new(self),
            release,
        }
    }

    /// The innermost error, skipping context and abort wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::WithContext { source, .. } | Self::Aborted { source, .. } => source.root(),
            other => other,
        }
    }
}

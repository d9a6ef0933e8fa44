//! Convenient imports for scopekit users.
//!
//! ```rust
//! use scopekit::prelude::*;
//! ```

// Core types
pub use scopekit_core::prelude::*;

// Transport types
pub use scopekit_transport::{Connector, Service, Transport, TransportConfig, TransportError};
#[cfg(feature = "tokio-runtime")]
pub use scopekit_transport::{MemoryConnector, MemoryTransport};

// Server types
#[cfg(feature = "server")]
pub use scopekit_server::{DocumentStore, Server, ServerBuilder, document_server};

// Client types
#[cfg(feature = "client")]
pub use scopekit_client::{Client, ClientBuilder, ClientConfig, ClientSession};

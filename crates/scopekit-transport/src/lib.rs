//! Transport abstractions for scopekit.
//!
//! A transport is the canonical scoped resource: it is opened by a
//! [`Connector`], used for a while, and closed exactly once. Paired with a
//! [`ResourceStack`](scopekit_core::ResourceStack), the connector's
//! `connect` is the acquisition step and [`Transport::close`] the release
//! step.
//!
//! # Available Transports
//!
//! | Transport | Use Case | Feature Flag |
//! |-----------|----------|--------------|
//! | [`memory::MemoryTransport`] | In-process clients, demos and tests | `tokio-runtime` |
//!
//! # Runtime Support
//!
//! The traits are runtime-agnostic. The in-memory transport spawns its
//! connection tasks on tokio and is available with the `tokio-runtime`
//! feature (enabled by default).

#![deny(missing_docs)]

pub mod config;
pub mod error;
#[cfg(feature = "tokio-runtime")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use config::TransportConfig;
pub use error::TransportError;
#[cfg(feature = "tokio-runtime")]
pub use memory::{MemoryConnector, MemoryTransport};
pub use traits::{Connector, Service, Transport, TransportMetadata};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::TransportConfig;
    pub use crate::error::TransportError;
    #[cfg(feature = "tokio-runtime")]
    pub use crate::memory::{MemoryConnector, MemoryTransport};
    pub use crate::traits::{Connector, Service, Transport, TransportMetadata};
}

//! Stack-managed client for scopekit servers.
//!
//! A [`Client`] keeps its transport and session on a
//! [`ResourceStack`](scopekit_core::ResourceStack): connecting acquires the
//! transport, enters the session and initializes it; cleanup releases them
//! in reverse order, together with any callbacks registered through
//! [`Client::defer_cleanup`].
//!
//! # Example
//!
//! ```rust
//! use scopekit_client::Client;
//! use scopekit_server::{DocumentStore, document_server};
//! use scopekit_transport::MemoryConnector;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), scopekit_core::SessionError> {
//! let mut client = Client::new(MemoryConnector::new(document_server(DocumentStore::default())));
//! client.connect().await?;
//!
//! for tool in client.list_tools().await? {
//!     println!("Tool: {}", tool.name);
//! }
//!
//! let ids = client.read_resource_value("docs://documents").await?;
//! println!("Documents: {ids}");
//!
//! client.cleanup().await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod client;
pub mod config;
pub mod session;

// Re-export commonly used types
pub use builder::ClientBuilder;
pub use client::{Client, SessionOf};
pub use config::ClientConfig;
pub use session::{ClientSession, SessionScope};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::ClientBuilder;
    pub use crate::client::Client;
    pub use crate::config::ClientConfig;
    pub use crate::session::{ClientSession, SessionScope};
}

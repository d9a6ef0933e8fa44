//! Server implementation for scopekit.
//!
//! A [`Server`] answers typed requests from two registries:
//!
//! - [`ToolService`]: named tools with async handlers
//! - [`ResourceService`]: static resources and `{param}` URI templates
//!
//! Servers implement [`scopekit_transport::Service`], so any connector in
//! `scopekit-transport` can serve them. [`document_server`] builds the
//! ready-made document server used by the demos and tests.
//!
//! # Example
//!
//! ```rust
//! use scopekit_core::types::{Tool, ToolOutput};
//! use scopekit_server::{DocumentStore, Server, document_server};
//!
//! let server = Server::builder("calculator", "1.0.0")
//!     .tool(Tool::new("zero"), |_| async { Ok(ToolOutput::text("0")) })
//!     .build();
//! assert!(server.capabilities().tools);
//!
//! let docs = document_server(DocumentStore::default());
//! assert!(docs.tools().contains("read_doc_content"));
//! ```

#![deny(missing_docs)]

pub mod builder;
pub mod capability;
pub mod documents;
pub mod server;

pub use builder::ServerBuilder;
pub use capability::{ResourceService, TemplateParams, ToolService};
pub use documents::{DocumentStore, document_server};
pub use server::Server;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::ServerBuilder;
    pub use crate::capability::{ResourceService, TemplateParams, ToolService, string_arg};
    pub use crate::documents::{DocumentStore, document_server};
    pub use crate::server::Server;
}

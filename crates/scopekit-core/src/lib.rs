//! # scopekit-core
//!
//! Core building blocks for the scopekit workspace:
//!
//! - **Resource stacks**: [`ResourceStack`] owns a runtime-sized set of
//!   asynchronously acquired resources and releases them in reverse order,
//!   exactly once, on every exit path
//! - **Scopes**: [`scoped`] runs a body against a fresh stack and always
//!   closes it afterwards, even when the body fails or panics
//! - **Error handling**: [`StackError`], [`ReleaseErrors`] and the session
//!   level [`SessionError`] with miette diagnostics
//! - **Protocol types**: tools, resources, content and the typed
//!   request/response values exchanged between clients and servers
//!
//! Apart from the optional drop-time teardown (`tokio-runtime` feature) this
//! crate is runtime-agnostic.
//!
//! # Example
//!
//! ```rust
//! use scopekit_core::{Acquired, ResourceStack};
//!
//! # tokio_test::block_on(async {
//! let mut stack = ResourceStack::new();
//!
//! let a = stack
//!     .acquire("A", || async {
//!         Ok::<_, std::io::Error>(Acquired::new("A", || async { println!("EXIT: A") }))
//!     })
//!     .await?;
//!
//! if a == "A" {
//!     stack
//!         .acquire("B", || async {
//!             Ok::<_, std::io::Error>(Acquired::new("B", || async { println!("EXIT: B") }))
//!         })
//!         .await?;
//! }
//!
//! stack.defer("cleanup", || async { println!("Clean up function called") })?;
//!
//! // Prints the cleanup line, then EXIT: B, then EXIT: A.
//! stack.close().await?;
//! # Ok::<(), scopekit_core::StackError>(())
//! # }).unwrap();
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod capability;
pub mod config;
pub mod error;
pub mod protocol;
pub mod scope;
pub mod stack;
pub mod types;

// Re-export commonly used types at the crate root
pub use capability::{
    ClientInfo, InitializeRequest, InitializeResult, PROTOCOL_VERSION, ServerCapabilities,
    ServerInfo,
};
pub use config::{DropPolicy, StackConfig};
pub use error::{
    BoxError, ReleaseErrors, ReleaseFailure, ReleasePanic, ScopeError, SessionError,
    SessionResultExt, StackError,
};
pub use protocol::{Request, Response};
pub use scope::{scoped, scoped_with};
pub use stack::{Acquired, EntryKind, ReleaseOutcome, ResourceStack, ScopedResource};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use scopekit_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::capability::{ClientInfo, InitializeResult, ServerInfo};
    pub use crate::config::{DropPolicy, StackConfig};
    pub use crate::error::{
        ReleaseErrors, ScopeError, SessionError, SessionResultExt, StackError,
    };
    pub use crate::protocol::{Request, Response};
    pub use crate::scope::{scoped, scoped_with};
    pub use crate::stack::{Acquired, EntryKind, ResourceStack, ScopedResource};
    pub use crate::types::{
        CallToolResult, Content, Resource, ResourceContents, ResourceTemplate, Tool,
        ToolAnnotations, ToolOutput,
    };
}

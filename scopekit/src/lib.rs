//! # scopekit
//!
//! Scoped async resource management for Rust.
//!
//! A [`ResourceStack`] owns a set of resources whose number and kind are
//! decided at runtime. Each acquisition registers a release action; closing
//! the stack runs those actions most recent first, exactly once, even when
//! some of them fail or panic. [`scoped`] ties a stack to a block of async
//! code so it is closed on success, on error and on panic.
//!
//! The rest of the workspace is built on that primitive: an in-memory
//! transport whose `connect`/`close` pair is the natural acquire/release
//! pair, a small tool and resource server (with the sample document
//! server), and a client that keeps its transport and session on a stack.
//!
//! # Quick Start
//!
//! ```rust
//! use futures::FutureExt;
//! use scopekit::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let outcome = scoped(|stack| {
//!     async move {
//!         let a = stack
//!             .acquire("A", || async {
//!                 println!("ENTER: A");
//!                 Ok::<_, std::io::Error>(Acquired::new("A", || async { println!("EXIT: A") }))
//!             })
//!             .await?;
//!         stack.defer("cleanup", || async { println!("Clean up function called") })?;
//!         Ok::<_, StackError>(a)
//!     }
//!     .boxed()
//! })
//! .await;
//!
//! assert!(matches!(outcome, Ok("A")));
//! # }
//! ```
//!
//! # Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `scopekit-core` | stacks, scopes, errors, protocol types |
//! | `scopekit-transport` | connector and transport traits, in-memory transport |
//! | `scopekit-server` | tool/resource registries, server, document server |
//! | `scopekit-client` | stack-managed client |
//!
//! # Feature Flags
//!
//! - `server` (default): the server crate, as [`server`]
//! - `client` (default): the client crate, as [`client`]
//! - `tokio-runtime` (default): drop-time teardown on tokio and the
//!   in-memory transport
//! - `fancy-errors`: miette's fancy diagnostic output

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

// Re-export all public items from core
pub use scopekit_core::*;

// Re-export transport types
pub use scopekit_transport::{Connector, Service, Transport, TransportError, TransportMetadata};

pub mod prelude;

/// Transport module re-exports
pub mod transport {
    //! Transport layer types.
    pub use scopekit_transport::*;
}

/// Server module re-exports
#[cfg(feature = "server")]
pub mod server {
    //! Server implementation types.
    pub use scopekit_server::*;
}

/// Client module re-exports
#[cfg(feature = "client")]
pub mod client {
    //! Client implementation types.
    pub use scopekit_client::*;
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;
        let _ = std::any::type_name::<ResourceStack>();
        let _ = std::any::type_name::<SessionError>();
    }
}

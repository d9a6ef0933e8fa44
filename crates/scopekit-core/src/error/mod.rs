//! Error handling for scopekit.
//!
//! Two layers of errors flow through the workspace:
//!
//! - [`StackError`]: failures of the resource stack itself. Acquisition
//!   failures propagate immediately, release failures are collected into a
//!   single [`ReleaseErrors`] aggregate, and registering on a closed stack
//!   fails fast.
//! - [`SessionError`]: failures of client/server sessions built on top of
//!   the stack (unknown tools, missing resources, transport problems).
//!
//! [`ScopeError`] combines a scope body's own error with the release
//! failures of the scope's teardown, so neither is ever dropped.
//!
//! ## Context Chaining
//!
//! ```rust
//! use scopekit_core::error::{SessionError, SessionResultExt};
//!
//! fn read() -> Result<String, SessionError> {
//!     let result: Result<String, SessionError> =
//!         Err(SessionError::resource_not_found("docs://missing.md"));
//!     result.context("Failed to read document")
//! }
//!
//! assert!(read().unwrap_err().to_string().contains("Failed to read document"));
//! ```

mod context;
mod session;
mod stack;

pub use context::SessionResultExt;
pub use session::SessionError;
pub use stack::{ReleaseErrors, ReleaseFailure, ReleasePanic, ScopeError, StackError};

/// Type alias for boxed errors that are Send + Sync.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

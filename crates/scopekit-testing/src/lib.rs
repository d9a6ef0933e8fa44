//! Testing utilities for scopekit.
//!
//! This crate provides recorders, fixtures and assertions for testing
//! resource stacks and the clients built on them. It includes:
//!
//! - A [`ReleaseLog`] that resources and callbacks append to as they are
//!   entered and released
//! - Factory helpers producing tracked, failing or failing-to-release
//!   resources
//! - Fixtures wiring the document server to an in-memory connector
//! - Timeout helpers and ordering assertions
//!
//! # Example
//!
//! ```rust
//! use scopekit_core::ResourceStack;
//! use scopekit_testing::{ReleaseLog, assert_log, tracked};
//!
//! # tokio_test::block_on(async {
//! let log = ReleaseLog::new();
//! let mut stack = ResourceStack::new();
//! stack.acquire("A", tracked(&log, "A")).await.unwrap();
//! stack.acquire("B", tracked(&log, "B")).await.unwrap();
//! stack.close().await.unwrap();
//!
//! assert_log(&log, &["ENTER: A", "ENTER: B", "EXIT: B", "EXIT: A"]);
//! # });
//! ```

#![deny(missing_docs)]

pub mod assertions;
pub mod async_helpers;
pub mod fixtures;
pub mod recorder;

// Re-export commonly used types
pub use assertions::{assert_failed_labels, assert_log, assert_tool_error, assert_tool_success};
pub use async_helpers::{with_default_timeout, with_timeout};
pub use fixtures::{
    RecordingConnector, RecordingTransport, RejectingService, document_connector, document_store,
};
pub use recorder::{
    InjectedFailure, ReleaseLog, TrackedResource, callback, failing_factory, failing_release,
    tracked,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::assertions::{
        assert_failed_labels, assert_log, assert_tool_error, assert_tool_success,
    };
    pub use crate::async_helpers::{with_default_timeout, with_timeout};
    pub use crate::fixtures::{
        RecordingConnector, RecordingTransport, RejectingService, document_connector,
        document_store,
    };
    pub use crate::recorder::{
        InjectedFailure, ReleaseLog, TrackedResource, callback, failing_factory, failing_release,
        tracked,
    };
}

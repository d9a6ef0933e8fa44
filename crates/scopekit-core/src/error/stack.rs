//! Resource stack errors.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use super::BoxError;
use crate::stack::EntryKind;

/// Errors produced by a [`ResourceStack`](crate::ResourceStack).
#[derive(Error, Diagnostic, Debug)]
pub enum StackError {
    /// A resource factory failed; no entry was registered.
    #[error("failed to acquire `{label}`: {source}")]
    #[diagnostic(code(scopekit::stack::acquire_failed))]
    Acquire {
        /// Label of the entry that would have been registered.
        label: String,
        /// The factory's error.
        #[source]
        source: BoxError,
    },

    /// The stack was already closed when a registration was attempted.
    #[error("resource stack `{stack}` is closed; cannot register `{label}`")]
    #[diagnostic(
        code(scopekit::stack::closed),
        help("register resources before the owning scope exits")
    )]
    Closed {
        /// Label of the stack.
        stack: String,
        /// Label of the rejected entry.
        label: String,
    },

    /// One or more release actions failed during teardown.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Release(#[from] ReleaseErrors),
}

impl StackError {
    /// Create an acquisition error.
    pub fn acquire(label: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Acquire {
            label: label.into(),
            source: source.into(),
        }
    }

    /// Create a use-after-close error.
    pub fn closed(stack: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Closed {
            stack: stack.into(),
            label: label.into(),
        }
    }

    /// Whether this error reports a registration on a closed stack.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    /// The release failures, if this is a teardown error.
    #[must_use]
    pub const fn release_errors(&self) -> Option<&ReleaseErrors> {
        match self {
            Self::Release(errors) => Some(errors),
            _ => None,
        }
    }
}

/// A single failed release action.
#[derive(Error, Diagnostic, Debug)]
#[error("release of {kind} `{label}` (entry {id}) failed: {source}")]
#[diagnostic(code(scopekit::stack::release_failed))]
pub struct ReleaseFailure {
    /// Entry id, unique within the stack that registered it.
    pub id: u64,
    /// Entry label.
    pub label: String,
    /// Whether the entry was a resource or a deferred callback.
    pub kind: EntryKind,
    /// The release action's error.
    #[source]
    pub source: BoxError,
}

impl ReleaseFailure {
    /// Create a release failure.
    pub fn new(
        id: u64,
        label: impl Into<String>,
        kind: EntryKind,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            source: source.into(),
        }
    }

    /// Whether the release action panicked rather than returning an error.
    #[must_use]
    pub fn is_panic(&self) -> bool {
        self.source.is::<ReleasePanic>()
    }
}

/// A release action panicked; the payload message is preserved.
#[derive(Error, Debug, Clone)]
#[error("release action panicked: {message}")]
pub struct ReleasePanic {
    /// The panic payload, when it was a string.
    pub message: String,
}

/// Every release failure of one teardown walk, in release order.
#[derive(Diagnostic, Debug)]
#[diagnostic(
    code(scopekit::stack::teardown_failed),
    help("every entry was still released; see the related failures")
)]
pub struct ReleaseErrors {
    #[related]
    failures: Vec<ReleaseFailure>,
}

impl ReleaseErrors {
    /// Create an aggregate from the failures of a teardown walk.
    #[must_use]
    pub const fn new(failures: Vec<ReleaseFailure>) -> Self {
        Self { failures }
    }

    /// Number of failed releases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Whether the aggregate holds no failures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Iterate over the failures in release order.
    pub fn iter(&self) -> std::slice::Iter<'_, ReleaseFailure> {
        self.failures.iter()
    }

    /// Consume the aggregate, returning the individual failures.
    #[must_use]
    pub fn into_failures(self) -> Vec<ReleaseFailure> {
        self.failures
    }
}

impl fmt::Display for ReleaseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.failures.len();
        let noun = if count == 1 { "action" } else { "actions" };
        write!(f, "{count} release {noun} failed during teardown")?;
        for failure in &self.failures {
            write!(f, "; `{}`: {}", failure.label, failure.source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ReleaseErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|failure| failure as &(dyn std::error::Error + 'static))
    }
}

impl IntoIterator for ReleaseErrors {
    type Item = ReleaseFailure;
    type IntoIter = std::vec::IntoIter<ReleaseFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a ReleaseErrors {
    type Item = &'a ReleaseFailure;
    type IntoIter = std::slice::Iter<'a, ReleaseFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

/// Outcome of a failed [`scoped`](crate::scoped) run.
///
/// The scope's teardown always runs; its failures are reported next to the
/// body's own error instead of replacing it.
#[derive(Error, Debug)]
pub enum ScopeError<E> {
    /// The body failed and every release succeeded.
    #[error("scope body failed: {0}")]
    Body(E),

    /// The body succeeded but teardown reported failures.
    #[error(transparent)]
    Release(ReleaseErrors),

    /// The body failed and teardown reported failures too.
    #[error("scope body failed: {body}; {release}")]
    Both {
        /// The body's error.
        body: E,
        /// The teardown failures.
        release: ReleaseErrors,
    },
}

impl<E> ScopeError<E> {
    /// The body's error, if the body failed.
    #[must_use]
    pub const fn body(&self) -> Option<&E> {
        match self {
            Self::Body(body) | Self::Both { body, .. } => Some(body),
            Self::Release(_) => None,
        }
    }

    /// The teardown failures, if any release failed.
    #[must_use]
    pub const fn release_errors(&self) -> Option<&ReleaseErrors> {
        match self {
            Self::Release(release) | Self::Both { release, .. } => Some(release),
            Self::Body(_) => None,
        }
    }

    /// Consume the error, returning the body's error if there was one.
    #[must_use]
    pub fn into_body(self) -> Option<E> {
        match self {
            Self::Body(body) | Self::Both { body, .. } => Some(body),
            Self::Release(_) => None,
        }
    }
}

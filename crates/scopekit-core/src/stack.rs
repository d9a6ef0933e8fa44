//! The resource stack.
//!
//! A [`ResourceStack`] owns an ordered set of asynchronously acquired
//! resources and deferred cleanup callbacks. Entries are released in
//! reverse registration order, each at most once, no matter how the owning
//! scope ends:
//!
//! - [`ResourceStack::close`] walks every entry, collecting failures
//!   instead of stopping at the first one;
//! - a stack dropped with active entries (for example because the future
//!   that owned it was cancelled) hands them to the configured
//!   [`DropPolicy`].
//!
//! Resources are registered either with a factory closure returning
//! [`Acquired`], or as a [`ScopedResource`] whose `exit` becomes the
//! release action.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, error, trace, warn};

use crate::config::{DropPolicy, StackConfig};
use crate::error::{BoxError, ReleaseErrors, ReleaseFailure, ReleasePanic, StackError};

type ReleaseFuture = BoxFuture<'static, Result<(), BoxError>>;
type ReleaseFn = Box<dyn FnOnce() -> ReleaseFuture + Send>;

/// Values a release action may resolve to.
///
/// Implemented for `()` (infallible release) and `Result<(), E>` for any
/// error convertible into [`BoxError`].
pub trait ReleaseOutcome: Send + 'static {
    /// Normalize the outcome into a boxed result.
    fn into_result(self) -> Result<(), BoxError>;
}

impl ReleaseOutcome for () {
    fn into_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> ReleaseOutcome for Result<(), E>
where
    E: Into<BoxError> + Send + 'static,
{
    fn into_result(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

fn boxed_release<F, Fut>(release: F) -> ReleaseFn
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: ReleaseOutcome,
{
    Box::new(move || async move { release().await.into_result() }.boxed())
}

/// A freshly acquired value paired with the action that releases it.
///
/// Returned by the factory passed to [`ResourceStack::acquire`].
///
/// # Example
///
/// ```rust
/// use scopekit_core::Acquired;
///
/// let conn = Acquired::new(42_u32, || async { Ok::<(), std::io::Error>(()) });
/// assert_eq!(*conn.value(), 42);
/// ```
pub struct Acquired<T> {
    value: T,
    release: ReleaseFn,
}

impl<T> Acquired<T> {
    /// Pair a value with its release action.
    pub fn new<F, Fut>(value: T, release: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: ReleaseOutcome,
    {
        Self {
            value,
            release: boxed_release(release),
        }
    }

    /// The acquired value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Acquired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acquired")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// An async resource with explicit enter and exit steps.
///
/// [`ResourceStack::enter`] runs `enter`, and on success registers `exit`
/// as the release action.
pub trait ScopedResource: Send + 'static {
    /// Value produced by entering the resource.
    type Output: Send;
    /// Error produced by `enter` or `exit`.
    type Error: Into<BoxError> + Send + 'static;

    /// Open the resource.
    fn enter(&mut self) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;

    /// Release the resource. Runs at most once, only after a successful
    /// `enter`.
    fn exit(self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Kind of a stack entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// An acquired resource with its release action.
    Resource,
    /// A cleanup callback with no associated resource.
    Callback,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource => write!(f, "resource"),
            Self::Callback => write!(f, "callback"),
        }
    }
}

struct Entry {
    id: u64,
    label: String,
    kind: EntryKind,
    release: ReleaseFn,
}

impl Entry {
    /// Run the release action, turning errors and panics into a failure.
    async fn release(self) -> Result<(), ReleaseFailure> {
        let Self {
            id,
            label,
            kind,
            release,
        } = self;

        trace!(id, label = %label, %kind, "Releasing entry");
        let outcome = AssertUnwindSafe(async move { release().await })
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(result) => result,
            Err(payload) => Err(Box::new(ReleasePanic {
                message: panic_message(payload.as_ref()),
            }) as BoxError),
        };

        result.map_err(|source| ReleaseFailure {
            id,
            label,
            kind,
            source,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// An ordered set of scoped resources released in LIFO order.
///
/// The stack is owned by exactly one scope and is only ever mutated through
/// `&mut self`. Once [`closed`](Self::close) it rejects further
/// registrations with [`StackError::Closed`].
pub struct ResourceStack {
    entries: Vec<Entry>,
    closed: bool,
    next_id: u64,
    config: StackConfig,
}

impl ResourceStack {
    /// Create an empty stack with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StackConfig::default())
    }

    /// Create an empty stack with the given configuration.
    #[must_use]
    pub const fn with_config(config: StackConfig) -> Self {
        Self {
            entries: Vec::new(),
            closed: false,
            next_id: 1,
            config,
        }
    }

    /// Acquire a resource and register its release action.
    ///
    /// The factory is invoked only when the stack is open. If it fails, no
    /// entry is added and the error is returned as [`StackError::Acquire`];
    /// entries registered earlier are left untouched.
    pub async fn acquire<T, F, Fut, E>(
        &mut self,
        label: impl Into<String>,
        factory: F,
    ) -> Result<T, StackError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Acquired<T>, E>>,
        E: Into<BoxError>,
    {
        let label = label.into();
        self.ensure_open(&label)?;

        match factory().await {
            Ok(Acquired { value, release }) => {
                self.push(label, EntryKind::Resource, release);
                Ok(value)
            }
            Err(err) => {
                let err = StackError::acquire(label, err);
                debug!(stack = %self.config.label, error = %err, "Acquisition failed");
                Err(err)
            }
        }
    }

    /// Enter a [`ScopedResource`] and register its `exit` as the release
    /// action.
    pub async fn enter<R>(
        &mut self,
        label: impl Into<String>,
        mut resource: R,
    ) -> Result<R::Output, StackError>
    where
        R: ScopedResource,
    {
        let label = label.into();
        self.ensure_open(&label)?;

        match resource.enter().await {
            Ok(output) => {
                self.push(label, EntryKind::Resource, boxed_release(move || resource.exit()));
                Ok(output)
            }
            Err(err) => {
                let err = StackError::acquire(label, err);
                debug!(stack = %self.config.label, error = %err, "Enter failed");
                Err(err)
            }
        }
    }

    /// Register a cleanup callback at the current top of the stack.
    ///
    /// The callback runs during teardown in its LIFO position among the
    /// other entries.
    pub fn defer<F, Fut>(&mut self, label: impl Into<String>, callback: F) -> Result<(), StackError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: ReleaseOutcome,
    {
        let label = label.into();
        self.ensure_open(&label)?;
        self.push(label, EntryKind::Callback, boxed_release(callback));
        Ok(())
    }

    /// Release every active entry, most recent first, and close the stack.
    ///
    /// Every release runs even when earlier ones fail or panic. Failures are
    /// returned together as [`StackError::Release`] in release order.
    /// Closing an already closed stack is a no-op.
    ///
    /// If the returned future is dropped part-way, the release in flight is
    /// abandoned where it stopped and is not retried. Entries not yet
    /// reached stay on the stack and are released by the [`DropPolicy`].
    pub async fn close(&mut self) -> Result<(), StackError> {
        match self.release_all().await {
            Some(errors) => Err(StackError::Release(errors)),
            None => Ok(()),
        }
    }

    pub(crate) async fn release_all(&mut self) -> Option<ReleaseErrors> {
        if !self.closed {
            debug!(
                stack = %self.config.label,
                entries = self.entries.len(),
                "Closing resource stack"
            );
        }
        self.closed = true;

        // Pop one at a time so a cancelled close leaves the rest to `Drop`.
        // The popped entry is owned by this future and dies with it.
        let mut failures = Vec::new();
        while let Some(entry) = self.entries.pop() {
            if let Err(failure) = entry.release().await {
                warn!(
                    stack = %self.config.label,
                    id = failure.id,
                    label = %failure.label,
                    error = %failure.source,
                    "Release failed"
                );
                failures.push(failure);
            }
        }

        if failures.is_empty() {
            None
        } else {
            Some(ReleaseErrors::new(failures))
        }
    }

    /// Move every active entry into a new open stack with the same
    /// configuration, leaving this one empty.
    #[must_use = "dropping the returned stack releases its entries"]
    pub fn pop_all(&mut self) -> Self {
        Self {
            entries: std::mem::take(&mut self.entries),
            closed: false,
            next_id: self.next_id,
            config: self.config.clone(),
        }
    }

    /// Number of active entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack has no active entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the stack has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Labels of the active entries in the order they would be released.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().rev().map(|e| e.label.as_str()).collect()
    }

    /// The stack configuration.
    #[must_use]
    pub const fn config(&self) -> &StackConfig {
        &self.config
    }

    fn ensure_open(&self, label: &str) -> Result<(), StackError> {
        if self.closed {
            warn!(stack = %self.config.label, label, "Registration on closed stack");
            return Err(StackError::closed(self.config.label.as_str(), label));
        }
        Ok(())
    }

    fn push(&mut self, label: String, kind: EntryKind, release: ReleaseFn) {
        let id = self.next_id;
        self.next_id += 1;
        trace!(stack = %self.config.label, id, label = %label, %kind, "Registered entry");
        self.entries.push(Entry {
            id,
            label,
            kind,
            release,
        });
    }
}

impl Default for ResourceStack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResourceStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStack")
            .field("label", &self.config.label)
            .field("entries", &self.labels())
            .field("closed", &self.closed)
            .finish()
    }
}

impl Drop for ResourceStack {
    fn drop(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        let entries = std::mem::take(&mut self.entries);
        let stack = self.config.label.clone();
        warn!(
            stack = %stack,
            entries = entries.len(),
            policy = ?self.config.drop_policy,
            "Resource stack dropped with active entries"
        );

        match self.config.drop_policy {
            DropPolicy::Leak => {
                error!(stack = %stack, entries = entries.len(), "Leaking unreleased entries");
            }
            DropPolicy::Block => futures::executor::block_on(release_detached(stack, entries)),
            DropPolicy::Spawn => spawn_release(stack, entries),
        }
    }
}

async fn release_detached(stack: String, entries: Vec<Entry>) {
    for entry in entries.into_iter().rev() {
        if let Err(failure) = entry.release().await {
            error!(
                stack = %stack,
                id = failure.id,
                label = %failure.label,
                error = %failure.source,
                "Release failed during drop-time teardown"
            );
        }
    }
}

#[cfg(feature = "tokio-runtime")]
fn spawn_release(stack: String, entries: Vec<Entry>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            drop(handle.spawn(release_detached(stack, entries)));
        }
        Err(_) => futures::executor::block_on(release_detached(stack, entries)),
    }
}

#[cfg(not(feature = "tokio-runtime"))]
fn spawn_release(stack: String, entries: Vec<Entry>) {
    futures::executor::block_on(release_detached(stack, entries));
}

//! Recording resources.
//!
//! Every helper here appends to a shared [`ReleaseLog`]: `ENTER: <name>`
//! when a resource is acquired and `EXIT: <name>` when it is released, so a
//! test can assert the exact teardown order.

use std::future::{Ready, ready};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use scopekit_core::{Acquired, ScopedResource};
use thiserror::Error;

/// A shared, append-only log of lifecycle events.
#[derive(Debug, Clone, Default)]
pub struct ReleaseLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ReleaseLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.lock().push(entry.into());
    }

    /// A snapshot of the entries so far.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The error every injected failure produces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("injected failure in `{label}`")]
pub struct InjectedFailure {
    /// The resource that failed.
    pub label: String,
}

impl InjectedFailure {
    /// Create a failure for `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

type Factory = Ready<Result<Acquired<String>, InjectedFailure>>;

/// A factory for a resource named `name`.
///
/// Records `ENTER: name` when invoked; the release records `EXIT: name`.
/// The acquired value is the name itself.
pub fn tracked(log: &ReleaseLog, name: &str) -> impl FnOnce() -> Factory + Send + 'static {
    let log = log.clone();
    let name = name.to_string();
    move || {
        log.record(format!("ENTER: {name}"));
        let exit = format!("EXIT: {name}");
        ready(Ok(Acquired::new(name, move || async move { log.record(exit) })))
    }
}

/// A factory that fails without acquiring anything.
pub fn failing_factory(name: &str) -> impl FnOnce() -> Factory + Send + 'static {
    let name = name.to_string();
    move || ready(Err(InjectedFailure::new(name)))
}

/// A factory whose resource records `EXIT: name` and then fails to release.
pub fn failing_release(log: &ReleaseLog, name: &str) -> impl FnOnce() -> Factory + Send + 'static {
    let log = log.clone();
    let name = name.to_string();
    move || {
        log.record(format!("ENTER: {name}"));
        let label = name.clone();
        ready(Ok(Acquired::new(name, move || async move {
            log.record(format!("EXIT: {label}"));
            Err::<(), _>(InjectedFailure::new(label))
        })))
    }
}

/// A deferred callback recording `message` when it runs.
pub fn callback(log: &ReleaseLog, message: &str) -> impl FnOnce() -> Ready<()> + Send + 'static {
    let log = log.clone();
    let message = message.to_string();
    move || {
        log.record(message);
        ready(())
    }
}

/// A [`ScopedResource`] that records its enter and exit steps.
#[derive(Debug, Clone)]
pub struct TrackedResource {
    name: String,
    log: ReleaseLog,
    fail_enter: bool,
    fail_exit: bool,
}

impl TrackedResource {
    /// Create a resource named `name` recording into `log`.
    pub fn new(log: &ReleaseLog, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            fail_enter: false,
            fail_exit: false,
        }
    }

    /// Make `enter` fail before recording anything.
    #[must_use]
    pub const fn failing_enter(mut self) -> Self {
        self.fail_enter = true;
        self
    }

    /// Make `exit` fail after recording.
    #[must_use]
    pub const fn failing_exit(mut self) -> Self {
        self.fail_exit = true;
        self
    }
}

impl ScopedResource for TrackedResource {
    type Output = String;
    type Error = InjectedFailure;

    async fn enter(&mut self) -> Result<String, InjectedFailure> {
        if self.fail_enter {
            return Err(InjectedFailure::new(&self.name));
        }
        self.log.record(format!("ENTER: {}", self.name));
        Ok(self.name.clone())
    }

    async fn exit(self) -> Result<(), InjectedFailure> {
        self.log.record(format!("EXIT: {}", self.name));
        if self.fail_exit {
            return Err(InjectedFailure::new(self.name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopekit_core::ResourceStack;

    #[tokio::test]
    async fn test_tracked_records_both_steps() {
        let log = ReleaseLog::new();
        let mut stack = ResourceStack::new();

        let name = stack.acquire("A", tracked(&log, "A")).await.unwrap();
        assert_eq!(name, "A");
        stack.defer("cleanup", callback(&log, "cleanup")).unwrap();
        stack.close().await.unwrap();

        assert_eq!(log.entries(), ["ENTER: A", "cleanup", "EXIT: A"]);
    }

    #[tokio::test]
    async fn test_failures() {
        let log = ReleaseLog::new();
        let mut stack = ResourceStack::new();

        assert!(stack.acquire("B", failing_factory("B")).await.is_err());
        stack.acquire("C", failing_release(&log, "C")).await.unwrap();
        let err = stack.close().await.unwrap_err();

        assert_eq!(err.release_errors().map(|e| e.len()), Some(1));
        assert_eq!(log.entries(), ["ENTER: C", "EXIT: C"]);
    }

    #[tokio::test]
    async fn test_tracked_resource() {
        let log = ReleaseLog::new();
        let mut stack = ResourceStack::new();

        stack
            .enter("broken", TrackedResource::new(&log, "broken").failing_enter())
            .await
            .unwrap_err();
        stack
            .enter("door", TrackedResource::new(&log, "door").failing_exit())
            .await
            .unwrap();
        assert!(stack.close().await.is_err());

        assert_eq!(log.entries(), ["ENTER: door", "EXIT: door"]);
        log.clear();
        assert!(log.is_empty());
    }
}

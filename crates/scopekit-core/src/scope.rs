//! Run a body against a fresh stack that is always closed afterwards.
//!
//! The body receives `&mut ResourceStack` and returns a boxed future
//! borrowing it, the same shape `sqlx` uses for transaction closures:
//!
//! ```rust
//! use futures::FutureExt;
//! use scopekit_core::{Acquired, ScopeError, scoped};
//!
//! # tokio_test::block_on(async {
//! let answer = scoped(|stack| {
//!     async move {
//!         let n = stack
//!             .acquire("n", || async {
//!                 Ok::<_, std::io::Error>(Acquired::new(41, || async {}))
//!             })
//!             .await?;
//!         Ok::<_, scopekit_core::StackError>(n + 1)
//!     }
//!     .boxed()
//! })
//! .await;
//!
//! assert!(matches!(answer, Ok(42)));
//! # });
//! ```

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::error;

use crate::config::StackConfig;
use crate::error::ScopeError;
use crate::stack::ResourceStack;

/// Run `body` against a new default-configured stack, then close it.
///
/// See [`scoped_with`].
pub async fn scoped<T, E, F>(body: F) -> Result<T, ScopeError<E>>
where
    F: for<'a> FnOnce(&'a mut ResourceStack) -> BoxFuture<'a, Result<T, E>>,
{
    scoped_with(StackConfig::default(), body).await
}

/// Run `body` against a new stack built from `config`, then close it.
///
/// The stack is closed exactly once on every exit path: after the body
/// returns `Ok`, after it returns `Err`, and after it panics. A panic is
/// resumed once teardown has finished. Release failures are reported next
/// to the body's error, never in place of it.
pub async fn scoped_with<T, E, F>(config: StackConfig, body: F) -> Result<T, ScopeError<E>>
where
    F: for<'a> FnOnce(&'a mut ResourceStack) -> BoxFuture<'a, Result<T, E>>,
{
    let mut stack = ResourceStack::with_config(config);
    let scope = &mut stack;
    let outcome = AssertUnwindSafe(async move { body(scope).await })
        .catch_unwind()
        .await;
    let release = stack.release_all().await;

    match (outcome, release) {
        (Err(panic), release) => {
            if let Some(release) = release {
                error!(stack = %stack.config().label, error = %release, "Teardown after panic failed");
            }
            std::panic::resume_unwind(panic)
        }
        (Ok(Ok(value)), None) => Ok(value),
        (Ok(Ok(_)), Some(release)) => Err(ScopeError::Release(release)),
        (Ok(Err(body)), None) => Err(ScopeError::Body(body)),
        (Ok(Err(body)), Some(release)) => Err(ScopeError::Both { body, release }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StackError;
    use crate::stack::Acquired;
    use pretty_assertions::assert_eq;
    use std::io;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    async fn open(stack: &mut ResourceStack, log: &Log, name: &'static str) -> Result<(), StackError> {
        let log = log.clone();
        stack
            .acquire(name, move || async move {
                log.lock().unwrap().push(format!("ENTER: {name}"));
                Ok::<_, io::Error>(Acquired::new((), move || async move {
                    log.lock().unwrap().push(format!("EXIT: {name}"));
                }))
            })
            .await
    }

    fn boom() -> Result<(), StackError> {
        panic!("body exploded");
    }

    #[tokio::test]
    async fn test_scope_closes_after_success() {
        let log = Log::default();
        let scope_log = log.clone();
        let result = scoped(|stack| {
            async move {
                open(stack, &scope_log, "A").await?;
                open(stack, &scope_log, "B").await?;
                Ok::<_, StackError>("done")
            }
            .boxed()
        })
        .await;

        assert!(matches!(result, Ok("done")));
        assert_eq!(
            *log.lock().unwrap(),
            ["ENTER: A", "ENTER: B", "EXIT: B", "EXIT: A"]
        );
    }

    #[tokio::test]
    async fn test_scope_closes_after_body_error() {
        let log = Log::default();
        let scope_log = log.clone();
        let result = scoped(|stack| {
            async move {
                open(stack, &scope_log, "A").await?;
                stack
                    .acquire("B", || async {
                        Err::<Acquired<()>, _>(io::Error::other("B unavailable"))
                    })
                    .await?;
                Ok::<_, StackError>(())
            }
            .boxed()
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err.body(), Some(StackError::Acquire { .. })));
        assert!(err.release_errors().is_none());
        assert_eq!(*log.lock().unwrap(), ["ENTER: A", "EXIT: A"]);
    }

    #[tokio::test]
    async fn test_scope_reports_body_and_release_failures() {
        let result = scoped(|stack| {
            async move {
                stack.defer("flaky", || async {
                    Err::<(), _>(io::Error::other("flaky cleanup"))
                })?;
                Err::<(), _>(StackError::closed("scope", "demo"))
            }
            .boxed()
        })
        .await;

        match result.unwrap_err() {
            ScopeError::Both { body, release } => {
                assert!(body.is_closed());
                assert_eq!(release.len(), 1);
            }
            other => panic!("expected both failures, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_scope_closes_and_resumes_panic() {
        let log = Log::default();
        let scope_log = log.clone();
        let result = AssertUnwindSafe(scoped(|stack| {
            async move {
                open(stack, &scope_log, "A").await?;
                boom()
            }
            .boxed()
        }))
        .catch_unwind()
        .await;

        assert!(result.is_err());
        assert_eq!(*log.lock().unwrap(), ["ENTER: A", "EXIT: A"]);
    }

    #[tokio::test]
    async fn test_nested_scopes_finish_inner_teardown_first() {
        let log = Log::default();
        let outer_log = log.clone();
        let result = scoped(|outer| {
            async move {
                open(outer, &outer_log, "outer").await?;
                let inner_log = outer_log.clone();
                scoped(|inner| {
                    async move {
                        open(inner, &inner_log, "inner").await?;
                        Ok::<_, StackError>(())
                    }
                    .boxed()
                })
                .await
                .map_err(|err| StackError::acquire("inner scope", err.to_string()))?;
                outer_log.lock().unwrap().push("after inner".to_string());
                Ok::<_, StackError>(())
            }
            .boxed()
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(
            *log.lock().unwrap(),
            [
                "ENTER: outer",
                "ENTER: inner",
                "EXIT: inner",
                "after inner",
                "EXIT: outer"
            ]
        );
    }
}

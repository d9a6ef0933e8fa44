//! Context walkthrough
//!
//! Replays four ways of holding several async resources at once:
//!
//! 1. nested scopes, using each connection as soon as it opens;
//! 2. nested scopes, using both connections together;
//! 3. one stack holding both connections;
//! 4. one stack with a conditional acquisition and a deferred cleanup.
//!
//! A fifth run shows a failed acquisition: only what was already opened is
//! released.
//!
//! # Running
//!
//! ```bash
//! cargo run -p context-walkthrough
//! RUST_LOG=scopekit_core=debug cargo run -p context-walkthrough
//! ```

use std::io;
use std::time::Duration;

use futures::FutureExt;
use scopekit::BoxError;
use scopekit::prelude::*;
use tracing::info;

/// A pretend connection announcing when it is opened and closed.
struct Connection {
    name: String,
    reachable: bool,
}

fn get_connection(name: &str) -> Connection {
    Connection {
        name: name.to_string(),
        reachable: true,
    }
}

fn unreachable_connection(name: &str) -> Connection {
    Connection {
        name: name.to_string(),
        reachable: false,
    }
}

impl ScopedResource for Connection {
    type Output = String;
    type Error = io::Error;

    async fn enter(&mut self) -> Result<String, io::Error> {
        if !self.reachable {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("{} refused the connection", self.name),
            ));
        }
        println!("ENTER: {}", self.name);
        Ok(self.name.clone())
    }

    async fn exit(self) -> Result<(), io::Error> {
        println!("EXIT: {}", self.name);
        Ok(())
    }
}

async fn nested_use_each() -> Result<(), ScopeError<BoxError>> {
    scoped(|outer| {
        async move {
            let a = outer.enter("A", get_connection("A")).await?;
            println!("Using connection {a}");
            scoped(|inner| {
                async move {
                    let b = inner.enter("B", get_connection("B")).await?;
                    println!("Using connection {b}");
                    Ok::<_, StackError>(())
                }
                .boxed()
            })
            .await?;
            Ok::<_, BoxError>(())
        }
        .boxed()
    })
    .await
}

async fn nested_use_both() -> Result<(), ScopeError<BoxError>> {
    scoped(|outer| {
        async move {
            let a = outer.enter("A", get_connection("A")).await?;
            scoped(move |inner| {
                async move {
                    let b = inner.enter("B", get_connection("B")).await?;
                    println!("Using connection {a} and {b}");
                    Ok::<_, StackError>(())
                }
                .boxed()
            })
            .await?;
            Ok::<_, BoxError>(())
        }
        .boxed()
    })
    .await
}

async fn one_stack() -> Result<(), ScopeError<StackError>> {
    scoped(|stack| {
        async move {
            let a = stack.enter("A", get_connection("A")).await?;
            let b = stack.enter("B", get_connection("B")).await?;
            println!("Using Connection {a} and {b}");
            Ok::<_, StackError>(())
        }
        .boxed()
    })
    .await
}

async fn conditional_with_cleanup() -> Result<(), ScopeError<StackError>> {
    scoped(|stack| {
        async move {
            let a = stack.enter("A", get_connection("A")).await?;
            let mut b = None;
            if a == "A" {
                let opened = stack.enter("B", get_connection("B")).await?;
                println!("Using Connection {a} and {opened}");
                b = Some(opened);
            }

            stack.defer("custom cleanup", || async {
                println!("Clean up function called");
            })?;

            println!("Doing work with {a} and maybe {b:?}");
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, StackError>(())
        }
        .boxed()
    })
    .await
}

async fn failed_second_connection() -> Result<(), ScopeError<StackError>> {
    scoped(|stack| {
        async move {
            let a = stack.enter("A", get_connection("A")).await?;
            let b = stack.enter("B", unreachable_connection("B")).await?;
            println!("Using Connection {a} and {b}");
            Ok::<_, StackError>(())
        }
        .boxed()
    })
    .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("context_walkthrough=info".parse()?),
        )
        .init();

    info!("1. Nested scopes, using each connection");
    nested_use_each().await?;

    info!("2. Nested scopes, using both connections");
    nested_use_both().await?;

    info!("3. One stack");
    one_stack().await?;

    info!("4. Conditional acquisition with a deferred cleanup");
    conditional_with_cleanup().await?;

    info!("5. Failed second connection");
    match failed_second_connection().await {
        Err(ScopeError::Body(err)) => println!("Scope failed: {err}"),
        other => other?,
    }

    Ok(())
}

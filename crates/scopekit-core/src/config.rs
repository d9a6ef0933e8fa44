//! Resource stack configuration.

/// What a dropped [`ResourceStack`](crate::ResourceStack) does with entries
/// that were never released.
///
/// A stack is normally closed explicitly (or by [`scoped`](crate::scoped)).
/// When the owning future is cancelled instead, `Drop` is the only exit path
/// left and cannot await, so the remaining releases are handed elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// Release on a background task of the current tokio runtime.
    ///
    /// Falls back to [`DropPolicy::Block`] when there is no runtime, or when
    /// the `tokio-runtime` feature is disabled.
    #[default]
    Spawn,
    /// Release inline with `futures::executor::block_on`.
    ///
    /// Release actions that depend on a tokio driver (timers, sockets) must
    /// not be used with this policy from inside a current-thread runtime.
    Block,
    /// Skip the releases and log an error.
    Leak,
}

/// Configuration for a [`ResourceStack`](crate::ResourceStack).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct StackConfig {
    /// Label used in tracing output and error messages.
    pub label: String,
    /// Behaviour when the stack is dropped with active entries.
    pub drop_policy: DropPolicy,
}

impl StackConfig {
    /// Create a new stack configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stack label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the drop policy.
    #[must_use]
    pub const fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            label: "scope".to_string(),
            drop_policy: DropPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = StackConfig::new()
            .label("client")
            .drop_policy(DropPolicy::Block);

        assert_eq!(config.label, "client");
        assert_eq!(config.drop_policy, DropPolicy::Block);
    }

    #[test]
    fn test_config_defaults() {
        let config = StackConfig::default();
        assert_eq!(config.label, "scope");
        assert_eq!(config.drop_policy, DropPolicy::Spawn);
    }
}

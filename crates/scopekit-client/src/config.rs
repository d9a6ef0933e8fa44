//! Client configuration.

use scopekit_core::{ClientInfo, DropPolicy, StackConfig};

/// Configuration for a [`Client`](crate::Client).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ClientConfig {
    /// Configuration of the stack owning the client's connection.
    pub stack: StackConfig,
    /// Information sent to the server during initialization.
    pub client_info: ClientInfo,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stack configuration.
    #[must_use]
    pub fn stack(mut self, stack: StackConfig) -> Self {
        self.stack = stack;
        self
    }

    /// Set the drop policy of the client's stack.
    #[must_use]
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.stack = self.stack.drop_policy(policy);
        self
    }

    /// Set the client information.
    #[must_use]
    pub fn client_info(mut self, client_info: ClientInfo) -> Self {
        self.client_info = client_info;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            stack: StackConfig::new().label("client"),
            client_info: ClientInfo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.stack.label, "client");
        assert_eq!(config.stack.drop_policy, DropPolicy::Spawn);
        assert_eq!(config.client_info.name, "scopekit-client");
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .drop_policy(DropPolicy::Block)
            .client_info(ClientInfo::new("tester", "0.0.1"));
        assert_eq!(config.stack.drop_policy, DropPolicy::Block);
        assert_eq!(config.client_info.version, "0.0.1");
    }
}

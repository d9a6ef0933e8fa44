//! Client builder for fluent construction.

use scopekit_core::{ClientInfo, InitializeResult, SessionError, StackConfig};
use scopekit_transport::Connector;

use crate::client::Client;
use crate::config::ClientConfig;

/// Builder for constructing clients.
///
/// # Example
///
/// ```rust
/// use scopekit_client::ClientBuilder;
/// use scopekit_server::{DocumentStore, document_server};
/// use scopekit_transport::MemoryConnector;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), scopekit_core::SessionError> {
/// let (mut client, init) = ClientBuilder::new()
///     .name("docs-cli")
///     .version("1.0.0")
///     .connect(MemoryConnector::new(document_server(DocumentStore::default())))
///     .await?;
/// assert_eq!(init.server_info.name, "DocumentMCP");
/// client.cleanup().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    name: String,
    version: String,
    stack: StackConfig,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new client builder with default values.
    #[must_use]
    pub fn new() -> Self {
        let defaults = ClientConfig::default();
        Self {
            name: defaults.client_info.name,
            version: defaults.client_info.version,
            stack: defaults.stack,
        }
    }

    /// Set the client name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the client version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the configuration of the client's stack.
    #[must_use]
    pub fn stack(mut self, stack: StackConfig) -> Self {
        self.stack = stack;
        self
    }

    /// The configuration this builder produces.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new()
            .stack(self.stack.clone())
            .client_info(ClientInfo::new(&self.name, &self.version))
    }

    /// Build a disconnected client.
    #[must_use]
    pub fn build<C: Connector>(self, connector: C) -> Client<C> {
        Client::with_config(connector, self.config())
    }

    /// Build a client and connect it.
    pub async fn connect<C: Connector>(
        self,
        connector: C,
    ) -> Result<(Client<C>, InitializeResult), SessionError> {
        let mut client = self.build(connector);
        let init = client.connect().await?;
        Ok((client, init))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scopekit_testing::document_connector;

    #[test]
    fn test_builder_config() {
        let config = ClientBuilder::new()
            .name("docs")
            .version("2.0.0")
            .stack(StackConfig::new().label("docs-stack"))
            .config();
        assert_eq!(config.client_info, ClientInfo::new("docs", "2.0.0"));
        assert_eq!(config.stack.label, "docs-stack");
    }

    #[tokio::test]
    async fn test_build_then_connect() {
        let mut client = ClientBuilder::new()
            .name("document-client")
            .build(document_connector());
        assert!(!client.is_connected());
        assert_eq!(client.config().client_info.name, "document-client");

        let init = client.connect().await.unwrap();
        assert_eq!(init.server_info.name, "DocumentMCP");
        client.ping().await.unwrap();
        client.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect() {
        let (mut client, init) = ClientBuilder::new()
            .connect(document_connector())
            .await
            .unwrap();
        assert_eq!(init.server_info.name, "DocumentMCP");
        assert_eq!(client.config().stack.label, "client");
        client.cleanup().await.unwrap();
    }
}

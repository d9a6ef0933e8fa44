//! Transport configuration.

use std::time::Duration;

/// Configuration shared by transports and connectors.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct TransportConfig {
    /// Maximum time to wait for a response to one request.
    pub request_timeout: Duration,
    /// Maximum time to wait for a connection to become ready.
    pub connect_timeout: Duration,
    /// Number of requests that may be queued on a connection.
    pub channel_capacity: usize,
}

impl TransportConfig {
    /// Create a new transport configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the channel capacity. Values below one are raised to one.
    #[must_use]
    pub const fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = if capacity == 0 { 1 } else { capacity };
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            channel_capacity: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = TransportConfig::new()
            .request_timeout(Duration::from_millis(250))
            .connect_timeout(Duration::from_secs(1))
            .channel_capacity(0);

        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.channel_capacity, 1);
    }

    #[test]
    fn test_config_defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.channel_capacity, 32);
    }
}

use crate::error::{Result, TransitError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the consumer loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerConfig {
    /// Sleep between drains once the source is empty (milliseconds)
    /// Default: 1000ms
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long a single poll may wait for a message (milliseconds)
    /// Default: 100ms
    #[serde(default = "default_consume_timeout_ms")]
    pub consume_timeout_ms: u64,

    /// Maximum messages handled by one drain
    /// Default: 10000
    #[serde(default = "default_max_drain")]
    pub max_drain: usize,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_consume_timeout_ms() -> u64 {
    100
}

fn default_max_drain() -> usize {
    10_000
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            consume_timeout_ms: default_consume_timeout_ms(),
            max_drain: default_max_drain(),
        }
    }
}

impl ConsumerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    pub fn with_consume_timeout_ms(mut self, ms: u64) -> Self {
        self.consume_timeout_ms = ms;
        self
    }

    pub fn with_max_drain(mut self, max: usize) -> Self {
        self.max_drain = max;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn consume_timeout(&self) -> Duration {
        Duration::from_millis(self.consume_timeout_ms)
    }

    /// A drain must be allowed to take at least one message.
    pub fn validate(&self) -> Result<()> {
        if self.max_drain == 0 {
            return Err(TransitError::Config(
                "consumer max_drain must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsumerConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.consume_timeout(), Duration::from_millis(100));
        assert_eq!(config.max_drain, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_drain_rejected() {
        let err = ConsumerConfig::new().with_max_drain(0).validate().unwrap_err();
        assert!(matches!(err, TransitError::Config(_)));
        assert!(ConsumerConfig::new().with_max_drain(1).validate().is_ok());
    }
}

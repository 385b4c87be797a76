use super::{consumer::ConsumerConfig, network::NetworkConfig, topics::TopicConfig};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for a projection process
///
/// Every section is optional in the JSON form; missing sections and fields
/// take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default)]
    pub topics: TopicConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub consumer: ConsumerConfig,
}

impl ProjectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let config: ProjectionConfig = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_topics(mut self, topics: TopicConfig) -> Self {
        self.topics = topics;
        self
    }

    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    pub fn with_consumer(mut self, consumer: ConsumerConfig) -> Self {
        self.consumer = consumer;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.topics.validate()?;
        self.network.validate()?;
        self.consumer.validate()
    }
}

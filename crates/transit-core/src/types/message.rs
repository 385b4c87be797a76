use super::category::Category;
use crate::error::{Result, TransitError};
use serde::{de::DeserializeOwned, Serialize};

/// A message as delivered by the event source
///
/// Delivery is at-least-once with no ordering across topics; the same
/// `(topic, partition, offset)` may arrive more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub key: Option<Vec<u8>>,
    pub value: Vec<u8>,
    pub partition: i32,
    pub offset: i64,
}

impl Message {
    pub fn new(topic: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            key: None,
            value: value.into(),
            partition: 0,
            offset: 0,
        }
    }

    /// Build a message whose value is the JSON encoding of `payload`
    pub fn json<T: Serialize>(topic: impl Into<String>, payload: &T) -> Result<Self> {
        Ok(Self::new(topic, serde_json::to_vec(payload)?))
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_position(mut self, partition: i32, offset: i64) -> Self {
        self.partition = partition;
        self.offset = offset;
        self
    }

    /// Parse the value as the payload schema of `category`
    pub fn decode<T: DeserializeOwned>(&self, category: Category) -> Result<T> {
        serde_json::from_slice(&self.value)
            .map_err(|e| TransitError::decode(&self.topic, category.as_str(), e))
    }
}

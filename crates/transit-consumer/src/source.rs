//! Event sources
//!
//! The consumer only needs to pull one message at a time; connecting to a
//! broker, decoding schemas and committing offsets belong to the source.

use crate::error::Result;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use transit_core::Message;

/// Something that delivers messages at-least-once
pub trait EventSource: Send + Sync {
    /// Take the next message, waiting at most `timeout`.
    ///
    /// `Ok(None)` means nothing is available right now.
    fn poll(&self, timeout: Duration) -> Result<Option<Message>>;

    /// Handle fired when new messages become available.
    ///
    /// Sources without one are polled on the consumer's interval.
    fn notifier(&self) -> Option<Arc<Notify>> {
        None
    }
}

/// In-process FIFO source
///
/// Messages are delivered in publish order. `publish_json` assigns offsets
/// per topic on partition 0; `publish` keeps whatever position the message
/// already carries, which allows simulating redelivery.
#[derive(Default)]
pub struct MemorySource {
    queue: Mutex<VecDeque<Message>>,
    next_offsets: Mutex<HashMap<String, i64>>,
    notify: Arc<Notify>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, message: Message) {
        self.queue.lock().push_back(message);
        self.notify.notify_one();
    }

    /// Publish `payload` as JSON on `topic` with the next offset for that topic.
    pub fn publish_json<T: Serialize>(&self, topic: &str, payload: &T) -> Result<i64> {
        let message = Message::json(topic, payload)?;
        let offset = {
            let mut offsets = self.next_offsets.lock();
            let next = offsets.entry(topic.to_string()).or_insert(0);
            let offset = *next;
            *next += 1;
            offset
        };
        let message = message.with_position(0, offset);
        self.publish(message);
        Ok(offset)
    }

    pub fn extend(&self, messages: impl IntoIterator<Item = Message>) {
        self.queue.lock().extend(messages);
        self.notify.notify_one();
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl EventSource for MemorySource {
    fn poll(&self, _timeout: Duration) -> Result<Option<Message>> {
        Ok(self.queue.lock().pop_front())
    }

    fn notifier(&self) -> Option<Arc<Notify>> {
        Some(self.notify.clone())
    }
}

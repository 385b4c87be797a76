//! Dead Letter Log
//!
//! Keeps the most recent messages the dispatcher could not use (malformed
//! payloads, unrecognized topics) for later inspection. Bounded and in
//! memory only: oldest entries are evicted first and nothing survives a
//! restart.

use crate::dispatcher::DropReason;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use transit_core::{Message, TransitError};

/// Failed message record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub reason: DropReason,
    pub error_message: String,
    /// Raw value, lossily decoded as UTF-8
    pub value: String,
    /// RFC 3339 timestamp
    pub failed_at: String,
}

pub struct DeadLetterLog {
    capacity: usize,
    entries: Mutex<VecDeque<FailedMessage>>,
    evicted: AtomicU64,
}

impl DeadLetterLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            evicted: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a failed message, evicting the oldest entry when full
    pub fn add(&self, message: &Message, reason: DropReason, error: &TransitError) {
        if self.capacity == 0 {
            self.evicted.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let record = FailedMessage {
            topic: message.topic.clone(),
            partition: message.partition,
            offset: message.offset,
            reason,
            error_message: error.to_string(),
            value: String::from_utf8_lossy(&message.value).into_owned(),
            failed_at: chrono::Utc::now().to_rfc3339(),
        };

        let mut entries = self.entries.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
            self.evicted.fetch_add(1, Ordering::Relaxed);
        }
        entries.push_back(record);
    }

    /// Oldest first
    pub fn entries(&self) -> Vec<FailedMessage> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Number of records pushed out (or never kept) because of the bound
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    /// Remove and return everything currently held
    pub fn drain(&self) -> Vec<FailedMessage> {
        self.entries.lock().drain(..).collect()
    }
}

impl Default for DeadLetterLog {
    fn default() -> Self {
        Self::new(1000)
    }
}

//! Transit Consumer: drives the projection from an event source
//!
//! Key features:
//! - `EventSource` abstraction over whatever delivers `(topic, key, value,
//!   partition, offset)` messages
//! - In-memory source with wake-up notification for tests and replay
//! - Drain-then-sleep loop with graceful shutdown
//! - Per-partition position tracking

pub mod consumer;
pub mod error;
pub mod source;

pub use consumer::{Consumer, ConsumerStats, Position, ShutdownHandle};
pub use error::{ConsumerError, Result};
pub use source::{EventSource, MemorySource};

//! Transit Core: Types, configuration and errors for the transit projection
//!
//! This crate defines the shared vocabulary of the transit state projection:
//! - Wire payloads: station metadata, raw station rows, arrivals, turnstile
//!   summaries and weather updates
//! - Message envelope: `(topic, key, value, partition, offset)` as delivered
//!   by the event source
//! - Categories: the closed set of event kinds a topic can classify into
//! - Configuration: topic classification, network layout, consumer cadence
//! - Errors: a single error type separating bad input from programmer errors

pub mod config;
pub mod error;
pub mod observe;
pub mod types;

pub use config::{ConsumerConfig, NetworkConfig, ProjectionConfig, TopicConfig};
pub use error::{Result, TransitError};
pub use types::{
    ArrivalEvent, Category, Direction, LineColor, Message, StationId, StationMetadata,
    StationRecord, TurnstileSummary, WeatherUpdate,
};

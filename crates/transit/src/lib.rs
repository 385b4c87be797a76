//! Transit: In-memory projection of transit network state
//!
//! Folds an unordered mix of independent event streams into the current
//! state of a rail network:
//! - **Stations**: which train occupies each platform, per direction, and
//!   the last reported turnstile count
//! - **Lines**: one per route color, discovering their stations from
//!   metadata that arrives alongside (not before) the train events
//! - **Dispatcher**: classifies each message by topic and routes it to the
//!   owning line, absorbing bad input instead of failing the stream
//! - **Weather**: a small independent model with partial updates
//!
//! # Quick Start
//!
//! ```
//! use transit::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let dispatcher = Dispatcher::from_config(&ProjectionConfig::default())?;
//!
//! let summary = TurnstileSummary { station_id: 40010, count: 42 };
//! let outcome = dispatcher.dispatch(&Message::json("TURNSTILE_SUMMARY", &summary)?)?;
//!
//! // The station has not been registered yet: dropped, not an error.
//! assert!(outcome.is_dropped());
//! # Ok(())
//! # }
//! ```

pub mod dead_letter;
pub mod dispatcher;
pub mod line;
pub mod network;
pub mod prelude;
pub mod snapshot;
pub mod station;
pub mod weather;

// Re-export core types
pub use transit_core::{
    config::{ConsumerConfig, NetworkConfig, ProjectionConfig, TopicConfig},
    error::{Result, TransitError},
    observe,
    types::{
        ArrivalEvent, Category, Direction, LineColor, Message, StationId, StationMetadata,
        StationRecord, TurnstileSummary, WeatherUpdate,
    },
};

pub use dead_letter::{DeadLetterLog, FailedMessage};
pub use dispatcher::{
    DispatchOutcome, DispatchStats, DispatchStatsSnapshot, Dispatcher, DropReason,
};
pub use line::{ArrivalOutcome, Departure, Line, Registration};
pub use network::{Network, SharedNetwork};
pub use snapshot::{LineSnapshot, NetworkSnapshot};
pub use station::{Occupant, Station};
pub use weather::Weather;

//! Transit Prelude
//!
//! Import this to get all commonly used types:
//!
//! ```
//! use transit::prelude::*;
//! ```

// Core types
pub use crate::{
    ArrivalEvent, Category, Direction, LineColor, Message, Result, StationId, StationMetadata,
    StationRecord, TransitError, TurnstileSummary, WeatherUpdate,
};

// Configs
pub use crate::{ConsumerConfig, NetworkConfig, ProjectionConfig, TopicConfig};

// Projection state
pub use crate::{Line, Network, NetworkSnapshot, Occupant, SharedNetwork, Station, Weather};

// Dispatch
pub use crate::{DeadLetterLog, DispatchOutcome, Dispatcher, DropReason, FailedMessage};

pub use tracing;

pub mod category;
pub mod message;
pub mod network;
pub mod payload;

pub use category::Category;
pub use message::Message;
pub use network::{Direction, LineColor, StationId};
pub use payload::{ArrivalEvent, StationMetadata, StationRecord, TurnstileSummary, WeatherUpdate};

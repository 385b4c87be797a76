pub mod consumer;
pub mod network;
pub mod projection;
pub mod topics;

pub use consumer::ConsumerConfig;
pub use network::NetworkConfig;
pub use projection::ProjectionConfig;
pub use topics::TopicConfig;

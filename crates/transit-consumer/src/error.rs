use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsumerError {
    #[error("Transit error: {0}")]
    Transit(#[from] transit_core::TransitError),

    #[error("Event source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, ConsumerError>;

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransitError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed {category} payload on topic '{topic}': {message}")]
    Decode {
        topic: String,
        category: &'static str,
        message: String,
    },

    #[error("Unrecognized topic: {0}")]
    UnrecognizedCategory(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl TransitError {
    /// Build a decode error for a payload that failed to parse.
    pub fn decode(topic: &str, category: &'static str, err: impl std::fmt::Display) -> Self {
        TransitError::Decode {
            topic: topic.to_string(),
            category,
            message: err.to_string(),
        }
    }

    /// True for failures caused by the input stream rather than by this code.
    ///
    /// Data-quality failures are absorbed by the dispatcher; everything else
    /// is a bug and propagates.
    pub fn is_data_quality(&self) -> bool {
        matches!(
            self,
            TransitError::Decode { .. } | TransitError::UnrecognizedCategory(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TransitError>;

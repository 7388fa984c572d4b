use thiserror::Error;

/// Error types shared by the rate pipeline.
///
/// Most variants describe expected conditions that a component recovers from
/// locally (an absent rate, a missing model). Only `Storage` is meant to reach
/// the caller as a hard failure.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Insufficient history: need {required} observations, got {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Malformed cache entry {key}: {reason}")]
    MalformedCacheEntry { key: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Xml(#[from] quick_xml::de::DeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FxError {
    /// Whether this error is one of the recoverable conditions that should
    /// surface as "absent" rather than propagate.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FxError::Storage(_) | FxError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, FxError>;

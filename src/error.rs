use thiserror::Error;

pub type RecordResult<T> = Result<T, RecordError>;

/// Failures raised by the record store and its codec.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Stored bytes for `key` could not be decompressed or decoded.
    #[error("stored record {key} is corrupted: {reason}")]
    DataIntegrity { key: String, reason: String },

    #[error("stored schema version {found} is not supported (expected {expected})")]
    UnsupportedSchema { found: u32, expected: u32 },

    /// The record's key season disagrees with the season inside its abyss snapshot.
    #[error("record season {record} does not match snapshot season {snapshot}")]
    SeasonMismatch { record: u32, snapshot: u32 },

    #[error("record backend unavailable: {0}")]
    Unavailable(String),

    #[error("failed to encode record: {0}")]
    Serialization(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RecordError {
    /// True when the error means the stored bytes are unusable rather than unreachable.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            RecordError::DataIntegrity { .. } | RecordError::UnsupportedSchema { .. }
        )
    }
}

/// Failure reported by an external collaborator (fetch client, renderer, transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct UpstreamError(pub String);

impl UpstreamError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub(crate) fn serde_error(err: serde_json::Error) -> RecordError {
    RecordError::Serialization(err.to_string())
}

pub(crate) fn integrity_error(key: impl Into<String>, reason: impl ToString) -> RecordError {
    RecordError::DataIntegrity {
        key: key.into(),
        reason: reason.to_string(),
    }
}

pub(crate) fn invalid_config(message: impl Into<String>) -> RecordError {
    RecordError::InvalidConfig(message.into())
}

#[cfg(feature = "redis")]
pub(crate) fn redis_error(err: redis::RedisError) -> RecordError {
    RecordError::Unavailable(err.to_string())
}

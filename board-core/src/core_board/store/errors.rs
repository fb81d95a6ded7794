/*
    errors.rs - Error types for the board store

    One enum covers both caller-input failures (empty or oversized content,
    unknown index, malformed actor id) and storage faults from the durable log.
*/

use thiserror::Error;

/// Errors that can occur in the board store
#[derive(Debug, Error)]
pub enum BoardError {
    /// Content was the empty string
    #[error("Message content is empty")]
    EmptyContent,

    /// Content exceeded the length bound
    #[error("Message content is {len} bytes, the limit is {max}")]
    ContentTooLong { len: usize, max: usize },

    /// No record at this index yet
    #[error("Message with index {0} doesn't exist")]
    NotFound(u64),

    /// Actor id text could not be parsed
    #[error("Invalid actor id: {0}")]
    InvalidActorId(String),

    /// Storage I/O error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Corrupted data detected while replaying the log
    #[error("Corrupted data: {0}")]
    CorruptedData(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Store settings that cannot be opened
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),
}

impl BoardError {
    /// Stable machine-readable name for this error kind
    pub fn kind(&self) -> &'static str {
        match self {
            BoardError::EmptyContent => "empty_content",
            BoardError::ContentTooLong { .. } => "content_too_long",
            BoardError::NotFound(_) => "not_found",
            BoardError::InvalidActorId(_) => "invalid_actor_id",
            BoardError::Storage(_) => "storage",
            BoardError::CorruptedData(_) => "corrupted_data",
            BoardError::Serialization(_) => "serialization",
            BoardError::InvalidConfig(_) => "invalid_config",
        }
    }

    /// True when the caller has to change its input before retrying
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            BoardError::EmptyContent
                | BoardError::ContentTooLong { .. }
                | BoardError::InvalidActorId(_)
        )
    }
}

/// Result type for store operations
pub type BoardResult<T> = Result<T, BoardError>;

impl From<std::io::Error> for BoardError {
    fn from(err: std::io::Error) -> Self {
        BoardError::Storage(err.to_string())
    }
}

impl From<bincode::Error> for BoardError {
    fn from(err: bincode::Error) -> Self {
        BoardError::Serialization(err.to_string())
    }
}

//! Persistence error types

use thiserror::Error;

/// Failure loading, validating, or saving the world document
#[derive(Error, Debug)]
pub enum PersistError {
    /// Document is not valid JSON, or has the wrong shape
    #[error("world document could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    /// A block record failed validation
    #[error("block {index} is invalid: {reason}")]
    InvalidBlock {
        /// Position of the record in the `blocks` array
        index: usize,
        /// What was wrong with it
        reason: &'static str,
    },

    /// Network request failed before a response arrived
    #[error("transport error: {0}")]
    Transport(String),

    /// Server answered with a non-success status
    #[error("server responded with status {0}")]
    Status(u16),

    /// Local file I/O (save server)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! Partitioner error types.

use std::io;

use thiserror::Error;

/// Errors that can occur while partitioning test files.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// The requested configuration cannot be satisfied.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The size of a candidate file could not be read.
    #[error("cannot access {file}: {source}")]
    FileAccess {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PartitionError {
    pub fn config(msg: impl Into<String>) -> Self {
        PartitionError::Configuration(msg.into())
    }
}

pub type PartitionResult<T> = Result<T, PartitionError>;

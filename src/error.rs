//! Unified error type for all store operations.

use thiserror::Error;

/// Things that can go wrong when using the store.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// File system problem (mkdir, read, write, rename).
    #[error("i/o error: {0}")]
    Io(String),
    /// Failed to encode the map to bytes.
    #[error("serialization error: {0}")]
    Serialize(String),
    /// Bytes on disk are not valid JSON, or don't match the value type.
    #[error("deserialization error: {0}")]
    Deserialize(String),
    /// Bad configuration (path with no file name, etc.).
    #[error("config error: {0}")]
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the API group rewriter

use thiserror::Error;

/// Result type for the rewriter
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the rewriter
///
/// Document indices are zero-based positions in the input stream.
#[derive(Debug, Error)]
pub enum Error {
    /// The input stream could not be read
    #[error("Read error: {0}")]
    ReadError(#[source] std::io::Error),
    /// Malformed YAML in the input stream
    #[error("Decode error in document {document}: {source}")]
    DecodeError {
        document: usize,
        #[source]
        source: serde_yaml::Error,
    },
    /// A document could not be serialized to the sink
    #[error("Encode error in document {document}: {source}")]
    EncodeError {
        document: usize,
        #[source]
        source: serde_yaml::Error,
    },
    /// The sink rejected a write or flush
    #[error("Write error in document {document}: {source}")]
    WriteError {
        document: usize,
        #[source]
        source: std::io::Error,
    },
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

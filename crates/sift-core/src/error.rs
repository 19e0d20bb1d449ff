//! Error types for sift.

use thiserror::Error;

/// Result type alias using sift's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sift operations.
///
/// Extraction errors never cross the dispatch boundary: the registry turns
/// them into error-banner content plus an [`crate::ExtractionDiagnostic`].
#[derive(Error, Debug)]
pub enum Error {
    /// Content could not be extracted from the file (corrupt, protected, undecodable)
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The file format is recognized but not supported
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Inference/generation failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Speech-to-text failed
    #[error("Transcription error: {0}")]
    Transcription(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Persistence collaborator rejected the notes
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

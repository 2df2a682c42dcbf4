//! Error types for slide-deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating, writing, or reading a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The topic cannot be used as a deck heading and file-name stem.
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    /// The theme label is not one of the four known themes.
    #[error("Unknown theme '{0}' (expected light, dark, blue, or default)")]
    UnknownTheme(String),

    /// The backend label is not a known text-generation backend.
    #[error("Unknown backend '{0}' (expected gemini or openai)")]
    UnknownVariant(String),

    /// The API credential for the selected backend is not set.
    #[error("Missing API credential: set the {0} environment variable")]
    MissingCredential(String),

    /// The request to the text-generation service could not be completed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The text-generation service answered with a non-success status.
    #[error("API error (status {status}): {body}")]
    ApiError { status: u16, body: String },

    /// The text-generation service answered without any text.
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing or parsing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}

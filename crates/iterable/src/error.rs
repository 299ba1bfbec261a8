//! Error types for the Iterable SDK.

/// Errors that can occur when using the Iterable SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed caller input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The shared identity was read before it was created.
    #[error("Shared identity has not been initialized")]
    NotInitialized,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API request failed with HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

//! Error types for riskscan

/// Result type alias using riskscan's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for riskscan operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Page fetch failed before a response was received
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Remote server answered with a non-2xx status
    #[error("http status {status}")]
    HttpStatus {
        /// Numeric status code
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Model endpoint could not be reached or timed out
    #[error("transport error: {0}")]
    Transport(String),

    /// Model output did not honour the JSON contract
    #[error("contract violation: {0}")]
    Contract(String),

    /// Retry budget exhausted; wraps the last underlying cause
    #[error("model call failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding errors
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new contract violation
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::Contract(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Whether the model client may retry after this error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::HttpStatus { .. } | Self::Contract(_)
        )
    }
}

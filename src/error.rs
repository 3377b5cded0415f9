//! Error types for the relay.

/// Errors from the remote completion service.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Authentication rejected by the service.
    #[error("Authentication failed; check OPENAI_API_KEY")]
    AuthFailed,

    /// Service asked us to slow down.
    #[error("Rate limited by the completion service")]
    RateLimited,

    /// Transport-level or HTTP failure.
    #[error("Completion request failed: {reason}")]
    RequestFailed { reason: String },

    /// Response body did not match the expected shape.
    #[error("Invalid response from completion service: {reason}")]
    InvalidResponse { reason: String },
}

/// Top-level errors for one relay run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad or missing operator-supplied input. No remote call is made.
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Remote completion failure. Not retried; nothing is persisted.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Filesystem failure while reading or writing an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

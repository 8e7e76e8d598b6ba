use thiserror::Error;

/// Errors surfaced by the telemetry API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A selection hint named a provider that is not registered. Fatal for
    /// facade initialization: no partial facade is published.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied argument failed validation at the API boundary.
    /// Detected eagerly; the operation leaves no observable state change.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Explicit initialization was requested after the facade was built.
    #[error("telemetry is already initialized")]
    AlreadyInitialized,
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

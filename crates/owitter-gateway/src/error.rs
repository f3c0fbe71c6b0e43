use thiserror::Error;

/// Errors produced by the gateway layer.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The backend rejected the call.  `message` is the provider's own text
    /// and is surfaced to the user verbatim.
    #[error("{message}")]
    Provider { code: String, message: String },

    /// Transport-level HTTP failure (connection refused, TLS, etc.).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A document or blob addressed by id/path does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation requires a signed-in account.
    #[error("Not signed in")]
    Unauthenticated,
}

impl GatewayError {
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Provider-supplied message text, if this is a provider rejection.
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            Self::Provider { message, .. } => Some(message),
            _ => None,
        }
    }
}

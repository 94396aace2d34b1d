use jtm_store::StoreError;
use thiserror::Error;

/// Error returned when a JTM document cannot be imported.
///
/// JTM defines a single error kind. Store identity-constraint violations and
/// malformed JSON text are reported through the same variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JtmError {
    /// The document violates the JTM grammar or cannot be applied to the store.
    #[error("invalid JTM: {0}")]
    InvalidFormat(String),
}

impl JtmError {
    /// Creates an `InvalidFormat` error.
    pub fn invalid(message: impl Into<String>) -> Self {
        JtmError::InvalidFormat(message.into())
    }

    /// Returns the descriptive message.
    pub fn message(&self) -> &str {
        match self {
            JtmError::InvalidFormat(message) => message,
        }
    }
}

impl From<StoreError> for JtmError {
    fn from(err: StoreError) -> Self {
        JtmError::InvalidFormat(err.to_string())
    }
}

impl From<serde_json::Error> for JtmError {
    fn from(err: serde_json::Error) -> Self {
        JtmError::InvalidFormat(format!("malformed JSON: {}", err))
    }
}

/// Result alias for JTM operations.
pub type Result<T> = std::result::Result<T, JtmError>;

use thiserror::Error;

/// Error raised when a wire frame cannot be encoded or decoded.
#[derive(Error, Debug)]
#[error("protocol error: {message}")]
pub struct ProtocolError {
    pub message: String,
}

impl ProtocolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("failed to parse JSON: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

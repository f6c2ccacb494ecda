use hunter_core::ProtocolError;
use hunter_core::query::QueryFormError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors from the discovery client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The channel could not be opened at all.
    #[error("failed to open channel: {source}")]
    Connect {
        #[source]
        source: tungstenite::Error,
    },

    /// An established channel failed.
    #[error("channel transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// A frame could not be encoded or decoded.
    #[error("frame error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The channel closed before the response cycle settled.
    #[error("channel closed before the response cycle settled")]
    Closed,

    /// The synchronous query endpoint failed.
    #[error("query endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The form did not pass the required-field gate.
    #[error("invalid query form: {0}")]
    Form(#[from] QueryFormError),
}

pub type ClientResult<T> = Result<T, ClientError>;

//! Wire frame types for the discovery channel.
//!
//! The backend multiplexes one JSON text-frame protocol over a single
//! WebSocket: the client sends exactly one [`QueryRequest`] per submission
//! and receives a sequence of [`InboundEvent`] frames tagged by `type`.
//! There is no correlation id anywhere in the protocol; frames belong to
//! whichever response cycle is currently open.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// The single client-to-server frame: one natural-language query.
///
/// Built once per submission and immutable after send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Serialize to the JSON text frame sent over the channel.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Frame kinds for the server-to-client side of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Start,
    Stream,
    Complete,
    Error,
}

/// Signals a new response cycle. The backend also echoes the query and a
/// status line; neither affects client state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// One fragment of the backend's running transcript.
///
/// Final-answer fragments and intermediate tool-invocation narration arrive
/// interleaved on the same frame type; telling them apart is the client's
/// job (see [`crate::classify`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Signals the response cycle ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A server-reported failure. `message` is optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Union of all server-to-client frames, tagged by the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundEvent {
    Start(StartEvent),
    Stream(StreamEvent),
    Complete(CompleteEvent),
    Error(ErrorEvent),
}

impl InboundEvent {
    /// Get the frame kind.
    pub fn event_type(&self) -> EventType {
        match self {
            InboundEvent::Start(_) => EventType::Start,
            InboundEvent::Stream(_) => EventType::Stream,
            InboundEvent::Complete(_) => EventType::Complete,
            InboundEvent::Error(_) => EventType::Error,
        }
    }

    /// Decode one JSON text frame.
    pub fn from_json(frame: &str) -> Result<Self> {
        Ok(serde_json::from_str(frame)?)
    }

    pub fn start() -> Self {
        InboundEvent::Start(StartEvent {
            message: None,
            query: None,
        })
    }

    pub fn stream(content: impl Into<String>) -> Self {
        InboundEvent::Stream(StreamEvent {
            content: content.into(),
            role: None,
        })
    }

    pub fn complete() -> Self {
        InboundEvent::Complete(CompleteEvent { message: None })
    }

    pub fn error(message: impl Into<String>) -> Self {
        InboundEvent::Error(ErrorEvent {
            message: Some(message.into()),
        })
    }
}

/// Response body of the synchronous request/response endpoint.
///
/// Served by the same external agent process as the streaming channel;
/// `status` is `"completed"` on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: String,
    pub response: String,
    pub status: String,
}

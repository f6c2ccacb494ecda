//! Core types for the Event Hunter discovery protocol.
//!
//! This crate holds everything that is pure and wire-facing: the JSON frame
//! types exchanged with the backend ([`event`]), the natural-language query
//! composer ([`query`]), and the heuristic that separates user-facing result
//! fragments from agent-internal narration ([`classify`]). No I/O lives here;
//! the transport and session machinery are in `hunter-client`.

pub mod classify;
pub mod error;
pub mod event;
pub mod query;

pub use classify::{FragmentClassifier, HeuristicClassifier};
pub use error::{ProtocolError, Result};
pub use event::{InboundEvent, QueryRequest, QueryResponse};
pub use query::{DateRange, QueryForm, QueryFormError, Vertical};

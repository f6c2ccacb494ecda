//! Client library for the Event Hunter discovery protocol.
//!
//! One discovery session is one WebSocket channel to the backend agent
//! process. The [`Supervisor`] owns the channel, submits composed queries,
//! and folds the inbound frame stream into a [`SessionState`] through the
//! reducer in [`session`], filtering agent-internal narration with the
//! classifier from `hunter-core`. A synchronous HTTP client for the
//! request/response endpoint lives in [`http`].

pub mod channel;
pub mod error;
pub mod http;
pub mod session;
pub mod stream;
pub mod subscriber;
pub mod supervisor;
pub mod verify;

pub use channel::Channel;
pub use error::{ClientError, ClientResult};
pub use http::QueryClient;
pub use session::{Applied, Session, SessionState};
pub use subscriber::SessionSubscriber;
pub use supervisor::Supervisor;

pub use hunter_core as core;

//! The session state reducer.
//!
//! All inbound frames fold into one mutable [`SessionState`] on the
//! caller's single event-processing task; there is no concurrent mutation.
//! The transition table:
//!
//! ```text
//! IDLE    --start-->              LOADING   (result and error cleared)
//! LOADING --stream, accepted-->   LOADING   (result replaced, not appended)
//! LOADING --stream, discarded-->  LOADING   (unchanged)
//! LOADING --complete-->           DONE
//! LOADING --error-->              ERROR     (result preserved)
//! any     --start-->              LOADING   (cycle restarts; no reentrancy guard)
//! ```
//!
//! A fragment from a previous cycle arriving after a new `start` is treated
//! as belonging to the new cycle; the protocol carries no correlation id to
//! tell them apart.

use hunter_core::classify::{FragmentClassifier, HeuristicClassifier};
use hunter_core::event::InboundEvent;

/// Fixed user-facing string for transport failures.
pub const CONNECT_FAILED_MESSAGE: &str = "Connection to the event discovery service failed";

/// Fallback for `error` frames that carry no message.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred while processing the query";

/// The single state bag the UI renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub connected: bool,
    pub loading: bool,
    /// The last fragment accepted by the classifier, not a concatenation.
    pub result: String,
    pub error: String,
}

/// What folding one frame did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Started,
    ResultUpdated,
    Discarded,
    Completed,
    Failed(String),
}

/// Owns a [`SessionState`] and the classifier that filters fragments.
pub struct Session<C = HeuristicClassifier> {
    state: SessionState,
    classifier: C,
}

impl Session<HeuristicClassifier> {
    pub fn new() -> Self {
        Self::with_classifier(HeuristicClassifier)
    }
}

impl Default for Session<HeuristicClassifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FragmentClassifier> Session<C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self {
            state: SessionState::default(),
            classifier,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The channel opened.
    pub fn channel_opened(&mut self) {
        self.state.connected = true;
    }

    /// The channel closed normally. Connectivity flips; nothing else.
    pub fn channel_closed(&mut self) {
        self.state.connected = false;
    }

    /// The channel failed to open or died. Surfaces the fixed error string
    /// and forces the not-loading state.
    pub fn channel_failed(&mut self) {
        self.state.connected = false;
        self.state.loading = false;
        self.state.error = CONNECT_FAILED_MESSAGE.to_string();
    }

    /// A query was sent; the loading gate closes until the cycle settles.
    pub fn query_sent(&mut self) {
        self.state.loading = true;
    }

    /// Fold one inbound frame into the state.
    pub fn apply(&mut self, event: &InboundEvent) -> Applied {
        match event {
            InboundEvent::Start(_) => {
                self.state.loading = true;
                self.state.result.clear();
                self.state.error.clear();
                Applied::Started
            }
            InboundEvent::Stream(e) => {
                if self.classifier.is_final(&e.content) {
                    self.state.result = e.content.clone();
                    Applied::ResultUpdated
                } else {
                    Applied::Discarded
                }
            }
            InboundEvent::Complete(_) => {
                self.state.loading = false;
                Applied::Completed
            }
            InboundEvent::Error(e) => {
                self.state.loading = false;
                let message = e
                    .message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
                self.state.error = message.clone();
                Applied::Failed(message)
            }
        }
    }
}

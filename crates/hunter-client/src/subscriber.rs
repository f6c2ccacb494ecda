use crate::session::SessionState;

/// Observer hooks for a discovery session.
///
/// Every method has a no-op default; implement only what you need. The
/// supervisor calls these after folding each frame into the session state,
/// on the same task that processes events.
#[async_trait::async_trait]
pub trait SessionSubscriber: Send + Sync {
    /// A new response cycle began.
    async fn on_start(&self) {}

    /// The classifier accepted a fragment; `result` is the new displayed
    /// result in full.
    async fn on_result_updated(&self, result: &str) {
        let _ = result;
    }

    /// The classifier discarded a fragment as agent-internal narration.
    async fn on_fragment_discarded(&self, fragment: &str) {
        let _ = fragment;
    }

    /// The response cycle ended normally.
    async fn on_complete(&self, state: &SessionState) {
        let _ = state;
    }

    /// The server reported an error, or the channel failed.
    async fn on_error(&self, message: &str) {
        let _ = message;
    }
}

//! Channel lifecycle management and the event-processing loop.
//!
//! A [`Supervisor`] is one discovery session: it opens the channel on
//! construction, gates submissions so at most one query is outstanding,
//! pumps inbound frames into the [`Session`] reducer on a single task, and
//! fans results out to subscribers. There is no automatic reconnect; once
//! the channel is gone, constructing a new supervisor is the reopen
//! trigger.

use std::sync::Arc;

use futures::StreamExt;
use hunter_core::classify::{FragmentClassifier, HeuristicClassifier};
use hunter_core::event::{InboundEvent, QueryRequest};
use hunter_core::query::QueryForm;
use log::{debug, warn};

use crate::channel::Channel;
use crate::error::ClientError;
use crate::session::{Applied, Session, SessionState};
use crate::stream::EventStream;
use crate::subscriber::SessionSubscriber;
use crate::verify::ProtocolTracker;

pub struct Supervisor<C: FragmentClassifier = HeuristicClassifier> {
    channel: Channel,
    events: EventStream<'static>,
    session: Session<C>,
    tracker: ProtocolTracker,
    subscribers: Vec<Arc<dyn SessionSubscriber>>,
}

impl<C: FragmentClassifier> std::fmt::Debug for Supervisor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor").finish_non_exhaustive()
    }
}

impl Supervisor<HeuristicClassifier> {
    /// Open a session with the default content-heuristic classifier.
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        Self::connect_with(url, HeuristicClassifier).await
    }
}

impl<C: FragmentClassifier> Supervisor<C> {
    /// Open a session with a custom classifier.
    ///
    /// Fails hard when the socket cannot open; the caller surfaces the
    /// fixed connect-failure string (see
    /// [`crate::session::CONNECT_FAILED_MESSAGE`]).
    pub async fn connect_with(url: &str, classifier: C) -> Result<Self, ClientError> {
        let (channel, events) = Channel::connect(url).await?;
        let mut session = Session::with_classifier(classifier);
        session.channel_opened();
        Ok(Self {
            channel,
            events,
            session,
            tracker: ProtocolTracker::new(),
            subscribers: Vec::new(),
        })
    }

    pub fn add_subscriber(&mut self, subscriber: Arc<dyn SessionSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn is_connected(&self) -> bool {
        self.state().connected
    }

    /// Validate, compose, and send one query.
    ///
    /// Returns `Ok(false)` when the submission is gated by
    /// `!connected || loading`: the query is silently dropped, matching the
    /// disabled submit button in the UI. This is defense in depth, not a
    /// recoverable path, so it is not an error.
    pub async fn submit(&mut self, form: &QueryForm) -> Result<bool, ClientError> {
        form.validate()?;
        let state = self.session.state();
        if !state.connected || state.loading {
            warn!(
                "submission dropped: connected={} loading={}",
                state.connected, state.loading
            );
            return Ok(false);
        }

        let request = QueryRequest::new(form.compose());
        debug!("submitting query: {}", request.query);
        match self.channel.send(&request).await {
            Ok(()) => {
                self.session.query_sent();
                Ok(true)
            }
            Err(err) => {
                self.session.channel_failed();
                self.notify_error(crate::session::CONNECT_FAILED_MESSAGE).await;
                Err(err)
            }
        }
    }

    /// Pump inbound frames into the session until the cycle settles.
    ///
    /// Returns at `complete` or `error`. A stream that ends first means the
    /// channel died mid-cycle: the session is marked failed and
    /// [`ClientError::Closed`] is returned. There is no client-side
    /// timeout; a stalled backend stalls this future.
    pub async fn run_to_completion(&mut self) -> Result<&SessionState, ClientError> {
        while let Some(frame) = self.events.next().await {
            match frame {
                Ok(event) => {
                    self.tracker.observe(&event);
                    let applied = self.session.apply(&event);
                    self.notify(&event, &applied).await;
                    if matches!(applied, Applied::Completed | Applied::Failed(_)) {
                        return Ok(self.session.state());
                    }
                }
                Err(err) => {
                    self.session.channel_failed();
                    self.notify_error(crate::session::CONNECT_FAILED_MESSAGE).await;
                    return Err(err);
                }
            }
        }

        self.session.channel_failed();
        self.notify_error(crate::session::CONNECT_FAILED_MESSAGE).await;
        Err(ClientError::Closed)
    }

    /// One full query cycle: submit, then pump until settled.
    ///
    /// A gated submission returns the unchanged state.
    pub async fn run_query(&mut self, form: &QueryForm) -> Result<&SessionState, ClientError> {
        if !self.submit(form).await? {
            return Ok(self.session.state());
        }
        self.run_to_completion().await
    }

    /// Tear down the session. Closes the channel unconditionally.
    pub async fn close(self) {
        self.channel.close().await;
    }

    async fn notify(&self, event: &InboundEvent, applied: &Applied) {
        for subscriber in &self.subscribers {
            match applied {
                Applied::Started => subscriber.on_start().await,
                Applied::ResultUpdated => {
                    subscriber
                        .on_result_updated(&self.session.state().result)
                        .await;
                }
                Applied::Discarded => {
                    if let InboundEvent::Stream(e) = event {
                        subscriber.on_fragment_discarded(&e.content).await;
                    }
                }
                Applied::Completed => subscriber.on_complete(self.session.state()).await,
                Applied::Failed(message) => subscriber.on_error(message).await,
            }
        }
    }

    async fn notify_error(&self, message: &str) {
        for subscriber in &self.subscribers {
            subscriber.on_error(message).await;
        }
    }
}

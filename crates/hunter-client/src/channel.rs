//! WebSocket transport for one discovery session.
//!
//! A [`Channel`] is the write half of a single WebSocket connection; the
//! matching read half is returned as a typed [`EventStream`] at connect
//! time. The transport guarantees ordering and reliability, so no
//! reordering, deduplication, queuing, or timeout logic exists here. There
//! is also no reconnect: once the channel is gone, opening a new one is the
//! caller's job.

use crate::error::ClientError;
use crate::stream::EventStream;
use futures::{SinkExt, StreamExt};
use hunter_core::event::{InboundEvent, QueryRequest};
use log::debug;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type WsSink = futures::stream::SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// The outbound half of a discovery channel.
pub struct Channel {
    sink: WsSink,
}

impl Channel {
    /// Open the channel and split it into a sender and a typed frame stream.
    ///
    /// Text frames are decoded into [`InboundEvent`]s; ping, pong, and
    /// binary frames are skipped; a close frame or transport error ends the
    /// stream. Decode failures surface as stream items, not as a dropped
    /// connection.
    pub async fn connect(url: &str) -> Result<(Self, EventStream<'static>), ClientError> {
        let (socket, _response) = connect_async(url)
            .await
            .map_err(|source| ClientError::Connect { source })?;
        debug!("channel open: {url}");

        let (sink, read) = socket.split();
        let events = read
            .filter_map(|frame| async move {
                match frame {
                    Ok(Message::Text(text)) => Some(
                        InboundEvent::from_json(text.as_str()).map_err(ClientError::from),
                    ),
                    Ok(Message::Close(_)) => {
                        debug!("channel closed by server");
                        None
                    }
                    // Control and binary frames carry no protocol payload.
                    Ok(_) => None,
                    Err(err) => Some(Err(ClientError::Transport(err))),
                }
            })
            .boxed();

        Ok((Self { sink }, events))
    }

    /// Send one query frame. Sent exactly once per submission by the
    /// supervisor; the request is immutable after send.
    pub async fn send(&mut self, request: &QueryRequest) -> Result<(), ClientError> {
        let frame = request.to_json()?;
        self.sink.send(Message::Text(frame.into())).await?;
        Ok(())
    }

    /// Tear the channel down unconditionally.
    pub async fn close(mut self) {
        let _ = self.sink.send(Message::Close(None)).await;
        let _ = self.sink.close().await;
    }
}

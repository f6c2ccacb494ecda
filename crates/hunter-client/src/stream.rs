use crate::error::ClientError;
use futures::stream::BoxStream;
use hunter_core::event::InboundEvent;

pub type EventStream<'a> = BoxStream<'a, Result<InboundEvent, ClientError>>;

//! Frame transport.
//!
//! The emitter writes into a [`FrameSink`]. In production that is a
//! [`ChannelSink`] whose receiving half is the HTTP response body: every
//! flush hands one chunk to hyper, and dropping the body (peer gone) closes
//! the channel.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use std::io;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Frames buffered between the emitter and the response body.
///
/// One slot: the emitter never runs ahead of the transport by more than a
/// single frame.
const CHANNEL_CAPACITY: usize = 1;

/// Transport errors surfaced to the emitter.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("receiver closed")]
    Closed,
}

/// Destination for emitted frames.
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Buffer a frame for the next flush.
    async fn write(&mut self, frame: &[u8]) -> Result<(), SinkError>;

    /// Push everything written since the last flush to the peer.
    async fn flush(&mut self) -> Result<(), SinkError>;

    /// Resolves once the peer has gone away.
    async fn closed(&self);
}

/// Body stream paired with a [`ChannelSink`].
pub type FrameStream = ReceiverStream<Result<Bytes, io::Error>>;

/// Create a sink and the body stream that drains it.
pub fn channel() -> (ChannelSink, FrameStream) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    (
        ChannelSink {
            tx,
            pending: BytesMut::new(),
        },
        ReceiverStream::new(rx),
    )
}

/// [`FrameSink`] backed by a bounded mpsc channel.
pub struct ChannelSink {
    tx: mpsc::Sender<Result<Bytes, io::Error>>,
    pending: BytesMut,
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn write(&mut self, frame: &[u8]) -> Result<(), SinkError> {
        if self.tx.is_closed() {
            return Err(SinkError::Closed);
        }

        self.pending.extend_from_slice(frame);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        // Empty chunks carry nothing on the wire; hyper drops them anyway.
        if self.pending.is_empty() {
            return Ok(());
        }

        let chunk = self.pending.split().freeze();
        self.tx.send(Ok(chunk)).await.map_err(|_| SinkError::Closed)
    }

    async fn closed(&self) {
        self.tx.closed().await;
    }
}

//! Paced frame emission.
//!
//! Writes `frame_count` frames of `frame_size` bytes, one per tick of a
//! `1/fps` ticker. Every frame is written and flushed before the pacing
//! wait, and the wait is the only place cancellation is observed.
//!
//! ```text
//! fill -> write -> flush -> wait(tick | peer closed | shutdown) -> ...
//! ```

use crate::models::{FrameGeometry, StreamConfig};
use crate::services::frame_source::FrameSource;
use crate::services::sink::FrameSink;
use std::fmt;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Why a stream ended before its last frame without being cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The frame source could not fill the buffer.
    Fill,
    /// The transport rejected a write or flush.
    Write,
}

impl AbortReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbortReason::Fill => "fill",
            AbortReason::Write => "write",
        }
    }
}

/// Terminal state of one stream.
///
/// `frames` counts frames that were written and flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed { frames: u64 },
    Cancelled { frames: u64 },
    Aborted { frames: u64, reason: AbortReason },
}

impl StreamOutcome {
    pub fn frames(&self) -> u64 {
        match self {
            StreamOutcome::Completed { frames }
            | StreamOutcome::Cancelled { frames }
            | StreamOutcome::Aborted { frames, .. } => *frames,
        }
    }

    /// Bounded label for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamOutcome::Completed { .. } => "completed",
            StreamOutcome::Cancelled { .. } => "cancelled",
            StreamOutcome::Aborted { .. } => "aborted",
        }
    }
}

impl fmt::Display for StreamOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamOutcome::Aborted { frames, reason } => {
                write!(f, "aborted ({}) after {} frames", reason.as_str(), frames)
            }
            other => write!(f, "{} after {} frames", other.as_str(), other.frames()),
        }
    }
}

/// Emits frames for one stream at a fixed rate.
#[derive(Debug, Clone, Copy)]
pub struct PacedEmitter {
    geometry: FrameGeometry,
    interval: Duration,
}

impl PacedEmitter {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            geometry: config.geometry(),
            interval: config.frame_interval(),
        }
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Drive the stream to completion, cancellation or failure.
    ///
    /// Mid-stream failures are never returned as errors: once bytes have
    /// reached the peer the only option left is to stop writing.
    pub async fn run<S, K>(
        &self,
        source: &mut S,
        sink: &mut K,
        cancel: &CancellationToken,
    ) -> StreamOutcome
    where
        S: FrameSource + ?Sized,
        K: FrameSink + ?Sized,
    {
        let frame_count = self.geometry.frame_count;
        if frame_count == 0 {
            return StreamOutcome::Completed { frames: 0 };
        }

        // Bounded by the resolver's frame size limit
        let frame_size = usize::try_from(self.geometry.frame_size).unwrap_or(usize::MAX);
        let mut buffer = vec![0u8; frame_size];

        // First tick one interval after the first frame
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut frames = 0u64;

        while frames < frame_count {
            if let Err(e) = source.fill(&mut buffer) {
                debug!(target: "vs.stream", error = %e, frames, "Frame source failed, ending stream");
                return StreamOutcome::Aborted {
                    frames,
                    reason: AbortReason::Fill,
                };
            }

            let written = match sink.write(&buffer).await {
                Ok(()) => sink.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                debug!(target: "vs.stream", error = %e, frames, "Transport write failed, ending stream");
                return StreamOutcome::Aborted {
                    frames,
                    reason: AbortReason::Write,
                };
            }

            frames += 1;

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    return StreamOutcome::Cancelled { frames };
                }
                () = sink.closed() => {
                    return StreamOutcome::Cancelled { frames };
                }
                _ = ticker.tick() => {}
            }
        }

        StreamOutcome::Completed { frames }
    }
}

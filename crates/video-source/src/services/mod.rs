//! Stream generation services.
//!
//! - `params` - query parameters -> `StreamConfig`
//! - `frame_source` - seeded frame payloads
//! - `emitter` - paced write loop
//! - `sink` - transport the emitter writes into

pub mod emitter;
pub mod frame_source;
pub mod params;
pub mod sink;

pub use emitter::{AbortReason, PacedEmitter, StreamOutcome};
pub use frame_source::{FrameSource, FrameSourceError, SeededFrameSource};
pub use params::{ParameterError, ParameterResolver};
pub use sink::{ChannelSink, FrameSink, FrameStream, SinkError};

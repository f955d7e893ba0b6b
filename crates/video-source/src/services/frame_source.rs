//! Deterministic frame payloads.
//!
//! Each stream owns its own generator seeded from the request, so the same
//! seed always yields the same byte sequence and concurrent streams never
//! share random state.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use thiserror::Error;

/// The generator could not produce more bytes. Ends the stream quietly.
#[derive(Debug, Error)]
#[error("frame source exhausted: {0}")]
pub struct FrameSourceError(pub String);

/// Fills frame buffers with payload bytes.
pub trait FrameSource: Send {
    /// Overwrite `buffer` with the next bytes of the stream.
    ///
    /// # Errors
    ///
    /// Returns [`FrameSourceError`] when no more bytes can be produced.
    fn fill(&mut self, buffer: &mut [u8]) -> Result<(), FrameSourceError>;
}

/// Seeded pseudo-random frame source.
///
/// Output is reproducible for a given seed and sequence of `fill` calls
/// within one build of this crate.
pub struct SeededFrameSource {
    rng: StdRng,
}

impl SeededFrameSource {
    pub fn new(seed: i64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(u64::from_ne_bytes(seed.to_ne_bytes())),
        }
    }
}

impl FrameSource for SeededFrameSource {
    fn fill(&mut self, buffer: &mut [u8]) -> Result<(), FrameSourceError> {
        self.rng
            .try_fill_bytes(buffer)
            .map_err(|e| FrameSourceError(e.to_string()))
    }
}

//! Video Source models.
//!
//! Contains the resolved stream configuration and the frame geometry derived
//! from it. Both are request-scoped values.

use serde::Serialize;
use std::time::Duration;

/// Default PRNG seed.
pub const DEFAULT_SEED: i64 = 0;

/// Default stream duration in milliseconds.
pub const DEFAULT_DURATION_MS: u64 = 2000;

/// Default frame rate.
pub const DEFAULT_FPS: u32 = 30;

/// Default bitrate in bits per second (6 Mb/s).
pub const DEFAULT_BITRATE: u64 = 6_000_000;

/// Fully resolved streaming parameters for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Seed for the frame payload generator.
    pub seed: i64,

    /// Stream duration in milliseconds. Bounds the frame count, not wall-clock time.
    pub duration_ms: u64,

    /// Frames per second.
    pub fps: u32,

    /// Target bitrate in bits per second.
    pub bitrate: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            duration_ms: DEFAULT_DURATION_MS,
            fps: DEFAULT_FPS,
            bitrate: DEFAULT_BITRATE,
        }
    }
}

impl StreamConfig {
    /// Frame count and frame size for this configuration.
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::from_config(self)
    }

    /// Time between two consecutive frames.
    ///
    /// Never zero: frame rates above one frame per nanosecond are clamped so
    /// the pacing timer always has a valid period.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1)
            .checked_div(self.fps)
            .unwrap_or(Duration::ZERO)
            .max(Duration::from_nanos(1))
    }
}

/// Frame layout derived from a [`StreamConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameGeometry {
    /// `floor(fps * duration_ms / 1000)`
    pub frame_count: u64,

    /// `floor(bitrate / (8 * fps))`. Zero is a legal degenerate size.
    pub frame_size: u64,
}

impl FrameGeometry {
    /// Derive the geometry. A zero frame rate yields an empty stream.
    pub fn from_config(config: &StreamConfig) -> Self {
        let fps = u64::from(config.fps);

        // u128 keeps fps * duration_ms exact for every accepted input
        let frame_count = u128::from(fps) * u128::from(config.duration_ms) / 1000;
        let frame_count = u64::try_from(frame_count).unwrap_or(u64::MAX);

        let frame_size = config.bitrate.checked_div(8 * fps).unwrap_or(0);

        Self {
            frame_count,
            frame_size,
        }
    }

    /// Total number of body bytes a completed stream carries.
    pub fn total_bytes(&self) -> u128 {
        u128::from(self.frame_count) * u128::from(self.frame_size)
    }
}

/// Readiness probe response.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    /// "ready" or "draining".
    pub status: &'static str,
}

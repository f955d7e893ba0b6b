//! Video Source Library
//!
//! This library provides the core functionality for the synthetic video
//! source - an HTTP service that streams deterministic pseudo-random
//! "frames" at a paced rate so downstream pipelines can be load tested
//! without a real camera or encoder.
//!
//! A request names a seed, a duration, a frame rate and a bitrate. The
//! service answers with `duration * fps / 1000` frames of
//! `bitrate / (8 * fps)` bytes each, one frame per tick. The same seed
//! always yields the same bytes.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/video.rs -> services/params.rs   (resolve request)
//!                                    -> services/emitter.rs  (pace frames)
//!                                         |- frame_source.rs (seeded PRNG)
//!                                         '- sink.rs         (body channel)
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Stream configuration and frame geometry
//! - `observability` - Prometheus metrics
//! - `routes` - Axum router setup
//! - `services` - Parameter resolution, frame generation and pacing

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;

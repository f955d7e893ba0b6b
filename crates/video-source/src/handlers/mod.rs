//! HTTP request handlers for Video Source.

pub mod health;
pub mod metrics;
pub mod video;

pub use health::{health_check, readiness_check};
pub use metrics::metrics_handler;
pub use video::stream_video;

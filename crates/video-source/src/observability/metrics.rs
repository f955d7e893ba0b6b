//! Metrics definitions for Video Source.
//!
//! All metrics follow Prometheus naming conventions:
//! - `vs_` prefix for Video Source
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: 7 values max
//! - `endpoint`: 5 values (`/video`, `/health`, `/ready`, `/metrics`, `/other`)
//! - `outcome`: 3 values (completed, cancelled, aborted)
//! - `parameter`: 5 values (seed, duration, fps, bitrate, frame_size)

use crate::services::StreamOutcome;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        // Time to response headers; streamed bodies are not included
        .set_buckets_for_metric(
            Matcher::Prefix("vs_http_request".to_string()),
            &[
                0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // Stream lifetimes run from milliseconds to minutes
        .set_buckets_for_metric(
            Matcher::Full("vs_stream_duration_seconds".to_string()),
            &[
                0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 300.0, 900.0, 3600.0,
            ],
        )
        .map_err(|e| format!("Failed to set stream duration buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `vs_http_requests_total`, `vs_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("vs_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("vs_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize endpoint path to bound label cardinality.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/video" => "/video",
        "/health" => "/health",
        "/ready" => "/ready",
        "/metrics" => "/metrics",
        _ => "/other",
    }
}

// ============================================================================
// Stream Metrics
// ============================================================================

/// Record a rejected stream request.
///
/// Metric: `vs_parameter_rejections_total`
/// Labels: `parameter`
pub fn record_parameter_rejection(parameter: &'static str) {
    counter!("vs_parameter_rejections_total", "parameter" => parameter).increment(1);
}

/// Record the start of a stream.
///
/// Metric: `vs_streams_active`
pub fn record_stream_started() {
    gauge!("vs_streams_active").increment(1.0);
}

/// Record the end of a stream.
///
/// Metric: `vs_streams_active`, `vs_streams_total`, `vs_stream_frames_total`,
/// `vs_stream_bytes_total`, `vs_stream_duration_seconds`
/// Labels: `outcome` on `vs_streams_total` and `vs_stream_duration_seconds`
pub fn record_stream_finished(outcome: &StreamOutcome, frame_size: u64, duration: Duration) {
    let frames = outcome.frames();

    gauge!("vs_streams_active").decrement(1.0);

    counter!("vs_streams_total", "outcome" => outcome.as_str()).increment(1);
    counter!("vs_stream_frames_total").increment(frames);
    counter!("vs_stream_bytes_total").increment(frames.saturating_mul(frame_size));

    histogram!("vs_stream_duration_seconds", "outcome" => outcome.as_str())
        .record(duration.as_secs_f64());
}

//! Observability for Video Source.
//!
//! Metrics are exported in Prometheus format on `/metrics`. Labels are
//! bounded; per-request values (seed, raw parameter values) never become
//! labels.

pub mod metrics;

pub use metrics::{
    init_metrics_recorder, record_http_request, record_parameter_rejection,
    record_stream_finished, record_stream_started,
};

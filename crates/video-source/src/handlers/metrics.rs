//! Prometheus metrics endpoint handler.
//!
//! Unauthenticated so Prometheus can scrape it. Only operational data with
//! bounded label cardinality is exposed.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// ```text
/// # TYPE vs_streams_total counter
/// vs_streams_total{outcome="completed"} 42
/// ```
#[tracing::instrument(skip_all, name = "vs.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}

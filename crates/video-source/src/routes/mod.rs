//! HTTP routes for Video Source.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Cancelled on shutdown. Every stream runs under a child of this token.
    pub shutdown: CancellationToken,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/video` - Synthetic video stream (any method)
/// - `/health` - Liveness probe (simple "OK")
/// - `/ready` - Readiness probe (503 while draining)
/// - `/metrics` - Prometheus metrics endpoint
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - Request timeout (covers time to response headers, not the streamed body)
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let request_timeout = Duration::from_secs(state.config.request_timeout_seconds);

    let public_routes = Router::new()
        .route("/video", any(handlers::stream_video))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (the last layer added runs first):
    // 1. TraceLayer - Log request details (innermost)
    // 2. TimeoutLayer - Timeout until response headers
    // 3. http_metrics_middleware - Record ALL responses, timeouts included (outermost)
    public_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(http_metrics_middleware))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::services::{FrameSource, SeededFrameSource};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::collections::HashMap;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            config: Config::from_vars(&HashMap::new()).unwrap(),
            shutdown: CancellationToken::new(),
        })
    }

    fn test_app(state: Arc<AppState>) -> Router {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        build_routes(state, handle)
    }

    async fn send_get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        (status, headers, body.to_vec())
    }

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_video_streams_seeded_frames() {
        let (status, headers, body) = send_get(
            test_app(test_state()),
            "/video?seed=11&duration=300&fps=20&bitrate=16000",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );

        // 6 frames of 100 bytes
        assert_eq!(body.len(), 600);
        let mut expected = vec![0u8; 600];
        let mut source = SeededFrameSource::new(11);
        for frame in expected.chunks_mut(100) {
            source.fill(frame).unwrap();
        }
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_request_timeout_does_not_cut_streamed_body() {
        let state = Arc::new(AppState {
            config: Config::from_vars(&HashMap::from([(
                "VS_REQUEST_TIMEOUT_SECONDS".to_string(),
                "1".to_string(),
            )]))
            .unwrap(),
            shutdown: CancellationToken::new(),
        });

        // 30 frames at 20 fps: the body outlives the one second timeout
        let (status, _, body) = send_get(
            test_app(state),
            "/video?duration=1500&fps=20&bitrate=16000",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.len(), 3000);
    }

    #[tokio::test]
    async fn test_video_accepts_any_method() {
        let request = Request::builder()
            .method("POST")
            .uri("/video?duration=10")
            .body(Body::empty())
            .unwrap();

        let response = test_app(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_video_rejects_invalid_seed_before_streaming() {
        let (status, headers, body) = send_get(test_app(test_state()), "/video?seed=abc").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let message = String::from_utf8(body).unwrap();
        assert!(message.contains("seed"), "unexpected message: {message}");
        assert!(message.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_video_rejects_non_positive_values() {
        for uri in ["/video?duration=0", "/video?fps=-5", "/video?bitrate=0"] {
            let (status, _, body) = send_get(test_app(test_state()), uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert!(String::from_utf8(body).unwrap().contains("must be greater than 0"));
        }
    }

    #[tokio::test]
    async fn test_video_rejects_frames_over_limit() {
        let state = Arc::new(AppState {
            config: Config::from_vars(&HashMap::from([(
                "VS_MAX_FRAME_BYTES".to_string(),
                "1000".to_string(),
            )]))
            .unwrap(),
            shutdown: CancellationToken::new(),
        });

        let (status, _, body) = send_get(test_app(state), "/video?fps=1&bitrate=16000").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(String::from_utf8(body).unwrap().contains("exceeds the limit"));
    }

    #[tokio::test]
    async fn test_video_degenerate_frame_size_is_empty_success() {
        let (status, _, body) =
            send_get(test_app(test_state()), "/video?fps=1000&bitrate=10&duration=20").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_video_refused_while_shutting_down() {
        let state = test_state();
        state.shutdown.cancel();

        let (status, _, _) = send_get(test_app(state), "/video").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let (status, _, body) = send_get(test_app(test_state()), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_ready_reflects_shutdown() {
        let state = test_state();

        let (status, _, body) = send_get(test_app(state.clone()), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ready");

        state.shutdown.cancel();

        let (status, _, body) = send_get(test_app(state), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "draining");
    }

    #[tokio::test]
    async fn test_metrics_endpoint_responds() {
        let (status, _, _) = send_get(test_app(test_state()), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let (status, _, _) = send_get(test_app(test_state()), "/v1/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

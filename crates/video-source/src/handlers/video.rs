//! Synthetic video stream handler.
//!
//! `ANY /video?seed=&duration=&fps=&bitrate=`
//!
//! Parameters are resolved before anything is written, so a rejected request
//! never carries stream bytes. Once the response starts, the body is fed by a
//! per-request emitter task through a one-slot channel; each frame becomes
//! one body chunk.

use crate::errors::VsError;
use crate::models::StreamConfig;
use crate::observability::{
    record_parameter_rejection, record_stream_finished, record_stream_started,
};
use crate::routes::AppState;
use crate::services::{
    sink, FrameSink, PacedEmitter, ParameterResolver, SeededFrameSource, StreamOutcome,
};
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, instrument, Instrument};

/// Handler for `/video`.
///
/// # Response
///
/// - 200 OK: `application/octet-stream` body of concatenated frames
/// - 500 Internal Server Error: a parameter was rejected (plain-text reason)
/// - 503 Service Unavailable: the server is shutting down
#[instrument(skip_all, name = "vs.video.stream")]
pub async fn stream_video(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, VsError> {
    if state.shutdown.is_cancelled() {
        return Err(VsError::ShuttingDown);
    }

    let config = ParameterResolver::new(state.config.max_frame_bytes)
        .resolve(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .inspect_err(|e| record_parameter_rejection(e.parameter()))?;

    let (sink, body) = sink::channel();
    spawn_stream(config, sink, state.shutdown.child_token());

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from_stream(body),
    )
        .into_response())
}

/// Run one stream on its own task.
///
/// The task owns the frame source, the frame buffer and the sink; nothing is
/// shared with other streams. It ends on completion, on `cancel`, or when the
/// sink's peer goes away.
pub fn spawn_stream<K>(
    config: StreamConfig,
    mut sink: K,
    cancel: CancellationToken,
) -> JoinHandle<StreamOutcome>
where
    K: FrameSink + 'static,
{
    let emitter = PacedEmitter::new(&config);
    let geometry = emitter.geometry();

    let span = info_span!(
        "vs.stream",
        seed = config.seed,
        duration_ms = config.duration_ms,
        fps = config.fps,
        bitrate = config.bitrate,
        frame_count = geometry.frame_count,
        frame_size = geometry.frame_size,
        total_bytes = %geometry.total_bytes(),
    );

    tokio::spawn(
        async move {
            debug!(target: "vs.stream", "Stream started");
            record_stream_started();
            let started = Instant::now();

            let mut source = SeededFrameSource::new(config.seed);
            let outcome = emitter.run(&mut source, &mut sink, &cancel).await;

            record_stream_finished(&outcome, geometry.frame_size, started.elapsed());
            debug!(
                target: "vs.stream",
                outcome = outcome.as_str(),
                frames = outcome.frames(),
                elapsed_ms = saturating_millis(started.elapsed()),
                "Stream ended: {}",
                outcome
            );

            outcome
        }
        .instrument(span),
    )
}

fn saturating_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

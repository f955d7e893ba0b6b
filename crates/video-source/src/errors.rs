//! Video Source error types.
//!
//! Only errors raised before a stream starts reach the client. The message
//! is returned as a plain-text body followed by a newline.

use crate::services::ParameterError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Video Source error type.
///
/// Maps to HTTP status codes:
/// - InvalidParameter: 500 Internal Server Error
/// - ShuttingDown: 503 Service Unavailable
#[derive(Debug, Error)]
pub enum VsError {
    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),

    #[error("server is shutting down")]
    ShuttingDown,
}

impl VsError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            VsError::InvalidParameter(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VsError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for VsError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let VsError::InvalidParameter(err) = &self {
            tracing::debug!(
                target: "vs.handlers.video",
                parameter = err.parameter(),
                error = %err,
                "Rejected stream request"
            );
        }

        let mut response = (status, format!("{}\n", self)).into_response();

        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );

        response
    }
}

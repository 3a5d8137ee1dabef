//! HTTP error mapping.

use adforge_error::{AdforgeError, AdforgeErrorKind, PipelineErrorKind, StoreErrorKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// An API-boundary error: an internal error plus the status it maps to.
///
/// Client mistakes (invalid brief, unknown job) surface with their detail;
/// everything else collapses to a generic 500 so provider internals and
/// stack context never leak to callers.
#[derive(Debug)]
pub struct ApiError(AdforgeError);

impl From<AdforgeError> for ApiError {
    fn from(err: AdforgeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0.kind() {
            AdforgeErrorKind::Pipeline(p) => match &p.kind {
                PipelineErrorKind::InvalidBrief { violations } => (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "invalid brief",
                        "violations": violations,
                    }),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "creative generation failed"}),
                ),
            },
            AdforgeErrorKind::Store(s) => match &s.kind {
                StoreErrorKind::NotFound(what) => {
                    (StatusCode::NOT_FOUND, json!({"error": format!("{} not found", what)}))
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "creative generation failed"}),
                ),
            },
            _ => {
                tracing::error!(error = %self.0, "Unhandled internal error at API boundary");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "creative generation failed"}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_error::PipelineError;

    #[test]
    fn invalid_brief_maps_to_bad_request() {
        let err: AdforgeError = PipelineError::new(PipelineErrorKind::InvalidBrief {
            violations: vec!["angles: at least 2 entries required".to_string()],
        })
        .into();
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_failure_maps_to_generic_500() {
        let err: AdforgeError = PipelineError::new(PipelineErrorKind::GenerationFailed(
            "creative generation failed".to_string(),
        ))
        .into();
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! HTTP surface for the Adforge creative generation engine.
//!
//! Exposes the caller-facing synchronous contract: a generation request that
//! returns the best batch plus an honest quality report, and a status-polling
//! request for asynchronous progress. Raw provider errors never cross this
//! boundary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod handlers;
mod normalize;

pub use error::ApiError;
pub use handlers::{AppState, GenerateBody};
pub use normalize::{normalize_brief, RawAngle, RawBriefInput};

use adforge_interface::CreativeDriver;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the API router over an application state.
pub fn router<D: CreativeDriver + 'static>(state: AppState<D>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/generations", post(handlers::generate::<D>))
        .route("/v1/generations/:id", get(handlers::job_status::<D>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

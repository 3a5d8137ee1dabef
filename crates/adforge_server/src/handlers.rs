//! API handlers.

use crate::error::ApiError;
use crate::normalize::{normalize_brief, RawBriefInput};
use adforge_core::{Brief, StyleMode};
use adforge_error::{PipelineError, PipelineErrorKind};
use adforge_interface::{CreativeDriver, JobStore};
use adforge_pipeline::{GenerationOrchestrator, GenerationRequest};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state.
pub struct AppState<D> {
    /// The generation pipeline
    pub orchestrator: Arc<GenerationOrchestrator<D>>,
    /// Job store for status polling
    pub jobs: Arc<dyn JobStore>,
}

impl<D> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            jobs: Arc::clone(&self.jobs),
        }
    }
}

/// Request body for POST /v1/generations.
///
/// Accepts either a full structured `brief` or loose `raw` form fields that
/// are normalized deterministically; `brief` wins when both are present.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    /// Owning user; defaults to "anonymous"
    #[serde(default)]
    pub user_id: Option<String>,
    /// Full structured brief
    #[serde(default)]
    pub brief: Option<Brief>,
    /// Loose form-style input, normalized into a brief
    #[serde(default)]
    pub raw: Option<RawBriefInput>,
    /// Premium v2 path when set
    #[serde(default)]
    pub style_mode: Option<StyleMode>,
    /// Brand voice hints for the v2 path
    #[serde(default)]
    pub brand_voice: Option<String>,
    /// Strategy document id
    #[serde(default)]
    pub strategy_id: Option<String>,
    /// Reference-ad document ids
    #[serde(default)]
    pub research_ids: Vec<String>,
    /// Pre-created job id
    #[serde(default)]
    pub job_id: Option<Uuid>,
}

/// POST /v1/generations — run one generation job synchronously.
pub async fn generate<D: CreativeDriver>(
    State(state): State<AppState<D>>,
    Json(body): Json<GenerateBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let brief = match (body.brief, body.raw) {
        (Some(brief), _) => brief,
        (None, Some(raw)) => normalize_brief(raw),
        (None, None) => {
            let err: adforge_error::AdforgeError =
                PipelineError::new(PipelineErrorKind::InvalidBrief {
                    violations: vec!["body: either `brief` or `raw` is required".to_string()],
                })
                .into();
            return Err(err.into());
        }
    };

    let request = GenerationRequest {
        user_id: body.user_id.unwrap_or_else(|| "anonymous".to_string()),
        brief,
        style_mode: body.style_mode,
        brand_voice: body.brand_voice,
        strategy_id: body.strategy_id,
        research_ids: body.research_ids,
        job_id: body.job_id,
    };

    let outcome = state.orchestrator.run(request).await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "output": outcome.output,
            "quality": outcome.quality,
            "jobId": outcome.job_id,
            "warning": outcome.warning,
        })),
    ))
}

/// GET /v1/generations/{id} — poll a job's progress.
pub async fn job_status<D: CreativeDriver>(
    State(state): State<AppState<D>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let job = state.jobs.get(id).await?;
    Ok(Json(json!({
        "status": job.status,
        "progress": job.progress,
        "progress_meta": job.phase,
        "outputs": job.output,
        "score": job.score,
    })))
}

/// GET /health.
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

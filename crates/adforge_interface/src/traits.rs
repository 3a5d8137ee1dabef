//! Trait definitions for AI providers and stores.

use crate::ContextDocument;
use adforge_core::{CompletionRequest, CompletionResponse, GenerationJob, JobUpdate};
use adforge_error::AdforgeResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Core trait that all AI provider backends must implement.
///
/// This is the single-shot completion seam the pipeline calls through. A
/// request may carry a response-schema hint; the pipeline never relies on
/// the provider honoring it.
#[async_trait]
pub trait CreativeDriver: Send + Sync {
    /// Run one completion call and return the raw generated text.
    async fn complete(&self, req: &CompletionRequest) -> AdforgeResult<CompletionResponse>;

    /// Provider name (e.g., "openai", "mock").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-4o-mini").
    fn model_name(&self) -> &str;
}

/// Persistence seam for generation job records.
///
/// Progress tracking is an observability aid, not a correctness dependency:
/// the orchestrator logs and continues when an update fails, so
/// implementations should fail fast rather than block generation.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a new job record, returning its id.
    async fn create(&self, job: GenerationJob) -> AdforgeResult<Uuid>;

    /// Apply a partial update to a job record.
    async fn update(&self, job_id: Uuid, update: JobUpdate) -> AdforgeResult<()>;

    /// Persist the final output and score and mark the job complete.
    async fn finalize(
        &self,
        job_id: Uuid,
        output: adforge_core::CreativeOutput,
        score: u8,
    ) -> AdforgeResult<()>;

    /// Fetch a job record.
    async fn get(&self, job_id: Uuid) -> AdforgeResult<GenerationJob>;
}

/// Read-only lookup of supporting context documents (strategy blueprints,
/// reference-ad snippets) keyed by id.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Fetch a context document, or `None` if the id is unknown.
    async fn get_document(&self, id: &str) -> AdforgeResult<Option<ContextDocument>>;
}

//! The generation orchestrator: brief in, best-scoring batch out.
//!
//! State machine: validating_input → generating → sanity_filtering →
//! evaluating → (target_met | improving → evaluating) → finalizing →
//! complete, with `error` reachable from any step. The improve loop is
//! strictly sequential — evaluation of candidate N completes before
//! generation of candidate N+1 begins — and replacement is monotonic: a new
//! candidate displaces the running best only on a strictly higher score.

use crate::config::PipelineConfig;
use crate::evaluator::QualityEvaluator;
use crate::fallback::fallback_output;
use crate::progress::ProgressReporter;
use crate::prompts::{
    generation_system, improve_prompt, v1_generation_prompt, v1_output_schema,
    v2_generation_prompt, v2_output_schema,
};
use crate::repair::parse_with_repair;
use crate::sanity::sanitize;
use crate::state::{LoopDecision, LoopState};
use adforge_cache::ContextCache;
use adforge_core::{
    ensure_valid, Brief, CompletionRequest, CreativeOutput, GenerationJob, JobPhase, PhaseMeta,
    QualityEvaluation, StyleMode, Validate, Violation,
};
use adforge_error::{
    AdforgeError, AdforgeErrorKind, AdforgeResult, PipelineError, PipelineErrorKind, SchemaError,
    SchemaErrorKind,
};
use adforge_interface::{ContextDocument, ContextStore, CreativeDriver, JobStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// One generation request entering the pipeline.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Owning user
    pub user_id: String,
    /// The validated-on-entry brief
    pub brief: Brief,
    /// Premium v2 path when set; v1 otherwise
    pub style_mode: Option<StyleMode>,
    /// Brand voice hints for the v2 path
    pub brand_voice: Option<String>,
    /// Strategy document id to include as context
    pub strategy_id: Option<String>,
    /// Reference-ad document ids to include as context
    pub research_ids: Vec<String>,
    /// Pre-created job id; a fresh one is assigned when absent
    pub job_id: Option<Uuid>,
}

impl GenerationRequest {
    /// A plain v1 request with no supporting context.
    pub fn new(user_id: impl Into<String>, brief: Brief) -> Self {
        Self {
            user_id: user_id.into(),
            brief,
            style_mode: None,
            brand_voice: None,
            strategy_id: None,
            research_ids: Vec::new(),
            job_id: None,
        }
    }
}

/// How far short of (or past) target the returned batch landed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QualityReport {
    /// The configured target threshold
    pub target: u8,
    /// Achieved satisfaction
    pub satisfaction: u8,
    /// Issues reported by the last accepted evaluation
    pub issues: Vec<String>,
}

/// Result returned to the synchronous caller.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerationOutcome {
    /// The best-scoring batch found
    pub output: CreativeOutput,
    /// Honest quality report, even below target
    pub quality: QualityReport,
    /// The job record tracking this generation
    pub job_id: Uuid,
    /// Set when a fallback or degraded path was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Drives brief → generation → sanity filter → evaluation → bounded
/// improve-retry → best-candidate selection, checkpointing progress to the
/// job store as it goes.
pub struct GenerationOrchestrator<D> {
    driver: Arc<D>,
    evaluator: QualityEvaluator<D>,
    jobs: Arc<dyn JobStore>,
    contexts: Arc<dyn ContextStore>,
    cache: Mutex<ContextCache>,
    config: PipelineConfig,
}

impl<D: CreativeDriver> GenerationOrchestrator<D> {
    /// Creates an orchestrator over the injected collaborators.
    pub fn new(
        driver: Arc<D>,
        jobs: Arc<dyn JobStore>,
        contexts: Arc<dyn ContextStore>,
        config: PipelineConfig,
    ) -> Self {
        let evaluator = QualityEvaluator::new(Arc::clone(&driver), *config.repair_ceiling());
        Self {
            driver,
            evaluator,
            jobs,
            contexts,
            cache: Mutex::new(ContextCache::default()),
            config,
        }
    }

    /// Replace the default context cache (e.g. with different TTL settings).
    pub fn with_cache(mut self, cache: ContextCache) -> Self {
        self.cache = Mutex::new(cache);
        self
    }

    /// The active pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one generation job to completion.
    ///
    /// # Errors
    ///
    /// - `PipelineErrorKind::InvalidBrief` when the brief fails entry
    ///   validation (client error, never retried).
    /// - `PipelineErrorKind::GenerationFailed` for any internal failure; the
    ///   job record carries the generic message, raw provider errors are
    ///   logged but never surfaced to the caller.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, mode = ?request.style_mode))]
    pub async fn run(&self, request: GenerationRequest) -> AdforgeResult<GenerationOutcome> {
        // Entry validation: reject before a job record exists.
        let violations = request.brief.validate();
        if !violations.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::InvalidBrief {
                violations: violations.iter().map(Violation::render).collect(),
            })
            .into());
        }

        // Job record creation is best-effort, like every progress write.
        let mut job = GenerationJob::new(request.user_id.clone(), request.brief.clone());
        if let Some(id) = request.job_id {
            job.id = id;
        }
        let job_id = job.id;
        if let Err(e) = self.jobs.create(job).await {
            warn!(job_id = %job_id, error = %e, "Failed to create job record, continuing");
        }

        let reporter = ProgressReporter::new(Arc::clone(&self.jobs), job_id);
        reporter
            .checkpoint(5, PhaseMeta::new(JobPhase::ValidatingInput, 0))
            .await;

        let context = self.load_context(&request).await;

        match self.run_loop(&request, &context, &reporter, job_id).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Generation job failed");
                reporter.fail("creative generation failed").await;
                Err(PipelineError::new(PipelineErrorKind::GenerationFailed(
                    "creative generation failed".to_string(),
                ))
                .into())
            }
        }
    }

    /// The generate → filter → evaluate → improve loop.
    async fn run_loop(
        &self,
        request: &GenerationRequest,
        context: &[ContextDocument],
        reporter: &ProgressReporter,
        job_id: Uuid,
    ) -> AdforgeResult<GenerationOutcome> {
        let brief_json = serde_json::to_string_pretty(&request.brief).map_err(|e| {
            SchemaError::new(SchemaErrorKind::Malformed(format!(
                "failed to serialize brief: {}",
                e
            )))
        })?;

        let schema = match request.style_mode {
            Some(_) => v2_output_schema(),
            None => v1_output_schema(),
        };
        let generation_prompt = match request.style_mode {
            Some(mode) => v2_generation_prompt(
                &brief_json,
                mode,
                request.brand_voice.as_deref(),
                context,
            ),
            None => v1_generation_prompt(&brief_json, context),
        };

        let mut state = LoopState::new();
        let mut warning = None;

        // Initial generation. A terminal parse failure here falls back to the
        // deterministic local batch; a provider failure is fatal because no
        // candidate exists yet.
        reporter
            .checkpoint(10, PhaseMeta::new(JobPhase::Generating, 0))
            .await;
        state.record_attempt();
        let initial = match self
            .generate_candidate(&generation_prompt, &schema, request.style_mode, reporter, 0)
            .await
        {
            Ok(output) => output,
            Err(e) if is_schema_failure(&e) => {
                warn!(
                    job_id = %job_id,
                    error = %e,
                    "Initial output unrepairable, substituting deterministic fallback"
                );
                warning = Some(
                    "provider output failed validation; returning deterministic fallback"
                        .to_string(),
                );
                fallback_output(&request.brief, request.style_mode)
            }
            Err(e) => return Err(e),
        };

        reporter
            .checkpoint(30, PhaseMeta::new(JobPhase::Evaluating, 0))
            .await;
        let evaluation = self
            .evaluator
            .evaluate(&request.brief, &initial, context)
            .await;
        state.offer(evaluation.selection_score());
        let mut best_output = initial;
        let mut best_eval = evaluation;

        // Improve loop: strictly sequential, monotonic replacement.
        loop {
            match state.decide(&self.config) {
                LoopDecision::Continue => {}
                decision => {
                    info!(
                        job_id = %job_id,
                        ?decision,
                        attempts = state.attempts_used(),
                        best = state.best_score(),
                        elapsed_ms = state.elapsed().as_millis() as u64,
                        "Improve loop finished"
                    );
                    break;
                }
            }

            let attempt = state.attempts_used();
            let progress = improve_progress(attempt, *self.config.max_attempts());
            reporter
                .checkpoint(progress, PhaseMeta::new(JobPhase::Improving, attempt))
                .await;

            let prior_json = serde_json::to_string_pretty(&best_output).map_err(|e| {
                SchemaError::new(SchemaErrorKind::Malformed(format!(
                    "failed to serialize prior output: {}",
                    e
                )))
            })?;
            let prompt = improve_prompt(
                &prior_json,
                best_eval.issues(),
                *self.config.target_satisfaction(),
            );

            state.record_attempt();
            let candidate = match self
                .generate_candidate(&prompt, &schema, request.style_mode, reporter, attempt)
                .await
            {
                Ok(output) => output,
                Err(e) => {
                    // An improve attempt that cannot produce a candidate is a
                    // wasted attempt, not a fatal error: the running best is
                    // still a complete, valid result.
                    warn!(
                        job_id = %job_id,
                        attempt,
                        error = %e,
                        "Improve attempt failed, keeping current best"
                    );
                    continue;
                }
            };

            reporter
                .checkpoint(progress, PhaseMeta::new(JobPhase::Evaluating, attempt))
                .await;
            let evaluation = self
                .evaluator
                .evaluate(&request.brief, &candidate, context)
                .await;
            let score = evaluation.selection_score();
            if state.offer(score) {
                info!(job_id = %job_id, attempt, score, "Improve attempt produced a new best candidate");
                best_output = candidate;
                best_eval = evaluation;
            } else {
                debug!(
                    job_id = %job_id,
                    attempt,
                    score,
                    best = state.best_score(),
                    "Improve attempt did not beat current best, discarding"
                );
            }
        }

        // Finalize: embed the v2 scorecard, persist, report honestly.
        reporter
            .checkpoint(95, PhaseMeta::new(JobPhase::Finalizing, state.attempts_used()))
            .await;
        if let (CreativeOutput::V2(batch), QualityEvaluation::V2(eval)) =
            (&mut best_output, &best_eval)
        {
            batch.evaluation = Some(eval.clone());
        }

        let satisfaction = best_eval.satisfaction();
        if let Err(e) = self
            .jobs
            .finalize(job_id, best_output.clone(), satisfaction)
            .await
        {
            warn!(job_id = %job_id, error = %e, "Failed to finalize job record, continuing");
        }

        Ok(GenerationOutcome {
            output: best_output,
            quality: QualityReport {
                target: *self.config.target_satisfaction(),
                satisfaction,
                issues: best_eval.issues().to_vec(),
            },
            job_id,
            warning,
        })
    }

    /// One provider call producing a validated, sanity-filtered candidate.
    async fn generate_candidate(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        style_mode: Option<StyleMode>,
        reporter: &ProgressReporter,
        attempt: u32,
    ) -> AdforgeResult<CreativeOutput> {
        let request = CompletionRequest {
            system: Some(generation_system().to_string()),
            prompt: prompt.to_string(),
            response_schema: Some(schema.clone()),
            ..CompletionRequest::default()
        };
        let raw = self.driver.complete(&request).await?.text;

        let expectation = match style_mode {
            Some(_) => "a creative output JSON object with schema_version \"2.0\"",
            None => "a creative output JSON object with version \"1.0\"",
        };
        let outcome = parse_with_repair::<CreativeOutput, _, _>(
            &raw,
            expectation,
            *self.config.repair_ceiling(),
            |instruction| {
                let driver = Arc::clone(&self.driver);
                let schema = schema.clone();
                async move {
                    let repair_request = CompletionRequest {
                        system: Some(generation_system().to_string()),
                        prompt: instruction,
                        response_schema: Some(schema),
                        ..CompletionRequest::default()
                    };
                    driver.complete(&repair_request).await.map(|r| r.text)
                }
            },
        )
        .await?;

        let output = outcome.value;
        let version_matches = matches!(
            (&output, style_mode),
            (CreativeOutput::V1(_), None) | (CreativeOutput::V2(_), Some(_))
        );
        if !version_matches {
            return Err(SchemaError::new(SchemaErrorKind::Invalid {
                violations: vec![format!(
                    "output: schema version {} does not match the requested mode",
                    output.version()
                )],
            })
            .into());
        }

        reporter
            .checkpoint(
                improve_progress(attempt, *self.config.max_attempts()).max(15),
                PhaseMeta::new(JobPhase::SanityFiltering, attempt),
            )
            .await;
        let (cleaned, report) = sanitize(&output);
        if !report.is_clean() {
            debug!(
                dropped_empty = report.dropped_empty.len(),
                dropped_duplicates = report.dropped_duplicates.len(),
                truncated_fields = report.truncated_fields,
                "Sanity filter adjusted candidate"
            );
        }

        // Dropping empties/duplicates can push the batch below its minimum
        // cardinality; that candidate is unusable.
        ensure_valid(&cleaned)?;
        Ok(cleaned)
    }

    /// Resolve supporting context through the cache. Lookup failures and
    /// unknown ids are skipped — context is an enrichment, not a dependency.
    async fn load_context(&self, request: &GenerationRequest) -> Vec<ContextDocument> {
        let mut ids = Vec::new();
        if let Some(id) = &request.strategy_id {
            ids.push(id.clone());
        }
        ids.extend(request.research_ids.iter().cloned());

        let mut docs = Vec::new();
        for id in ids {
            {
                let mut cache = self.cache.lock().await;
                if let Some(entry) = cache.get(&id) {
                    docs.push(entry.document().clone());
                    continue;
                }
            }
            match self.contexts.get_document(&id).await {
                Ok(Some(doc)) => {
                    self.cache.lock().await.insert(doc.clone(), None);
                    docs.push(doc);
                }
                Ok(None) => {
                    warn!(id = %id, "Context document not found, skipping");
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Context lookup failed, skipping");
                }
            }
        }
        docs
    }
}

/// Progress percentage for an improve attempt: 30% after the initial
/// evaluation, climbing toward 90% as attempts are spent.
fn improve_progress(attempt: u32, max_attempts: u32) -> u8 {
    let step = 60 * attempt / max_attempts.max(1);
    (30 + step).min(90) as u8
}

fn is_schema_failure(error: &AdforgeError) -> bool {
    matches!(error.kind(), AdforgeErrorKind::Schema(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn improve_progress_is_bounded() {
        assert_eq!(improve_progress(0, 3), 30);
        assert_eq!(improve_progress(1, 3), 50);
        assert_eq!(improve_progress(2, 3), 70);
        assert_eq!(improve_progress(3, 3), 90);
        assert_eq!(improve_progress(10, 3), 90);
        assert_eq!(improve_progress(1, 0), 90);
    }
}

//! End-to-end tests for the generation orchestrator, driven by a scripted
//! provider.

use adforge_core::{Brief, CreativeOutput, JobStatus, StyleMode};
use adforge_error::AdforgeErrorKind;
use adforge_interface::JobStore;
use adforge_pipeline::{
    fallback_output, fallback_v1, fallback_v2, GenerationOrchestrator, GenerationRequest,
    PipelineConfig,
};
use adforge_providers::MockDriver;
use adforge_store::{MemoryContextStore, MemoryJobStore};
use std::sync::Arc;
use uuid::Uuid;

fn brief() -> Brief {
    serde_json::from_str(include_str!("../../adforge_core/testdata/brief.json")).unwrap()
}

fn config(target: u8, max_attempts: u32) -> PipelineConfig {
    PipelineConfig::builder()
        .target_satisfaction(target)
        .max_attempts(max_attempts)
        .max_duration_ms(60_000u64)
        .repair_ceiling(2u32)
        .build()
        .unwrap()
}

/// A valid v1 batch JSON whose hooks carry `tag` so candidates are
/// distinguishable.
fn batch_json(brief: &Brief, tag: &str) -> String {
    let mut batch = fallback_v1(brief);
    for creative in &mut batch.creatives {
        creative.copy.hook = format!("[{}] {}", tag, creative.copy.hook)
            .chars()
            .take(80)
            .collect();
    }
    serde_json::to_string(&CreativeOutput::V1(batch)).unwrap()
}

/// A valid v2 batch JSON tagged the same way.
fn v2_batch_json(brief: &Brief, tag: &str) -> String {
    let mut batch = fallback_v2(brief, StyleMode::HookMatrix);
    for (i, variant) in batch.variants.iter_mut().enumerate() {
        variant.hook = format!("[{} {}] {}", tag, i, variant.hook)
            .chars()
            .take(80)
            .collect();
    }
    serde_json::to_string(&CreativeOutput::V2(batch)).unwrap()
}

fn eval_json(score: i64, issues: &[&str]) -> String {
    let issues: Vec<String> = issues.iter().map(|s| s.to_string()).collect();
    serde_json::json!({"satisfaction": score, "issues": issues}).to_string()
}

fn v2_eval_json(dimension_score: u8, compliance_risk: bool) -> String {
    serde_json::json!({
        "scores": {
            "hook_power": dimension_score,
            "clarity": dimension_score,
            "proof": dimension_score,
            "offer": dimension_score,
            "objection_handling": dimension_score,
            "platform_fit": dimension_score,
            "novelty": dimension_score
        },
        "compliance_risk": compliance_risk,
        "generic_output": false,
        "issues": [],
        "weakest_dimensions": []
    })
    .to_string()
}

fn harness(
    driver: Arc<MockDriver>,
    config: PipelineConfig,
) -> (GenerationOrchestrator<MockDriver>, Arc<MemoryJobStore>) {
    let jobs = Arc::new(MemoryJobStore::new());
    let contexts = Arc::new(MemoryContextStore::default());
    let orchestrator = GenerationOrchestrator::new(driver, jobs.clone(), contexts, config);
    (orchestrator, jobs)
}

fn first_hook(output: &CreativeOutput) -> &str {
    match output {
        CreativeOutput::V1(batch) => &batch.creatives[0].copy.hook,
        CreativeOutput::V2(batch) => &batch.variants[0].hook,
    }
}

#[tokio::test]
async fn happy_path_exits_after_first_evaluation() {
    let brief = brief();
    let driver = Arc::new(MockDriver::scripted([
        batch_json(&brief, "A"),
        eval_json(96, &[]),
    ]));
    let (orchestrator, jobs) = harness(driver.clone(), config(95, 3));

    let job_id = Uuid::new_v4();
    let mut request = GenerationRequest::new("user-1", brief);
    request.job_id = Some(job_id);

    let outcome = orchestrator.run(request).await.unwrap();

    // One generation + one evaluation, no improve calls.
    assert_eq!(driver.call_count(), 2);
    assert_eq!(outcome.quality.satisfaction, 96);
    assert_eq!(outcome.quality.target, 95);
    assert!(outcome.warning.is_none());
    assert!(first_hook(&outcome.output).contains("[A]"));

    let job = jobs.get(job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.progress, 100);
    assert_eq!(job.score, Some(96));
    assert!(job.output.is_some());
}

#[tokio::test]
async fn improve_loop_keeps_best_not_last() {
    let brief = brief();
    let driver = Arc::new(MockDriver::scripted([
        batch_json(&brief, "A"),
        eval_json(60, &["hooks are interchangeable"]),
        batch_json(&brief, "B"),
        eval_json(70, &["cta is flat"]),
        batch_json(&brief, "C"),
        eval_json(65, &[]),
    ]));
    let (orchestrator, _) = harness(driver.clone(), config(95, 3));

    let outcome = orchestrator
        .run(GenerationRequest::new("user-1", brief))
        .await
        .unwrap();

    // Three generation attempts, three evaluations.
    assert_eq!(driver.call_count(), 6);
    // The winner is the 70-scoring candidate, not the last one generated.
    assert_eq!(outcome.quality.satisfaction, 70);
    assert!(first_hook(&outcome.output).contains("[B]"));
    assert_eq!(outcome.quality.issues, vec!["cta is flat".to_string()]);

    // The first improve prompt quoted the prior output and its issues.
    let improve_prompt = &driver.requests()[2].prompt;
    assert!(improve_prompt.contains("hooks are interchangeable"));
    assert!(improve_prompt.contains("[A]"));
}

#[tokio::test]
async fn malformed_response_is_repaired_once() {
    let brief = brief();
    let driver = Arc::new(MockDriver::scripted([
        "Sure thing! Here is prose with no payload at all.".to_string(),
        batch_json(&brief, "A"),
        eval_json(97, &[]),
    ]));
    let (orchestrator, _) = harness(driver.clone(), config(95, 3));

    let outcome = orchestrator
        .run(GenerationRequest::new("user-1", brief))
        .await
        .unwrap();

    // Initial call + one repair call + one evaluation.
    assert_eq!(driver.call_count(), 3);
    assert!(outcome.warning.is_none());
    assert_eq!(outcome.quality.satisfaction, 97);

    // The repair instruction quoted the failure back to the provider.
    let repair_prompt = &driver.requests()[1].prompt;
    assert!(repair_prompt.contains("did not match the required format"));
}

#[tokio::test]
async fn repair_exhaustion_substitutes_deterministic_fallback() {
    let brief = brief();
    let driver = Arc::new(MockDriver::scripted([
        "garbage one".to_string(),
        "garbage two".to_string(),
        "garbage three".to_string(),
        eval_json(50, &["fallback copy is flat"]),
    ]));
    let (orchestrator, jobs) = harness(driver.clone(), config(95, 1));

    let job_id = Uuid::new_v4();
    let mut request = GenerationRequest::new("user-1", brief.clone());
    request.job_id = Some(job_id);

    let outcome = orchestrator.run(request).await.unwrap();

    // Still a success, flagged with a warning, carrying the deterministic
    // fallback batch.
    assert!(outcome.warning.is_some());
    assert_eq!(outcome.output, fallback_output(&brief, None));
    assert_eq!(outcome.quality.satisfaction, 50);
    assert_eq!(driver.call_count(), 4);

    let job = jobs.get(job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.score, Some(50));
}

#[tokio::test]
async fn provider_failure_yields_sanitized_error_and_error_state() {
    let brief = brief();
    // Empty script: the first provider call fails outright.
    let driver = Arc::new(MockDriver::new());
    let (orchestrator, jobs) = harness(driver, config(95, 3));

    let job_id = Uuid::new_v4();
    let mut request = GenerationRequest::new("user-1", brief);
    request.job_id = Some(job_id);

    let err = orchestrator.run(request).await.unwrap_err();
    let rendered = format!("{}", err);
    assert!(rendered.contains("creative generation failed"));
    // Raw provider internals never reach the caller.
    assert!(!rendered.contains("mock script exhausted"));

    let job = jobs.get(job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Error);
    assert_eq!(
        job.phase.message.as_deref(),
        Some("creative generation failed")
    );
}

#[tokio::test]
async fn invalid_brief_is_a_client_error_without_provider_calls() {
    let mut brief = brief();
    brief.angles.truncate(1);
    let driver = Arc::new(MockDriver::new());
    let (orchestrator, _) = harness(driver.clone(), config(95, 3));

    let err = orchestrator
        .run(GenerationRequest::new("user-1", brief))
        .await
        .unwrap_err();

    match err.kind() {
        AdforgeErrorKind::Pipeline(p) => assert!(p.is_client_error()),
        other => panic!("expected pipeline error, got {:?}", other),
    }
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn killed_candidate_is_never_selected_as_best() {
    let brief = brief();
    let driver = Arc::new(MockDriver::scripted([
        v2_batch_json(&brief, "A"),
        // Perfect scores but a compliance kill flag: selection score 0.
        v2_eval_json(5, true),
        v2_batch_json(&brief, "B"),
        // Mediocre but clean: 21/35 -> 60.
        v2_eval_json(3, false),
    ]));
    let (orchestrator, _) = harness(driver.clone(), config(95, 2));

    let mut request = GenerationRequest::new("user-1", brief);
    request.style_mode = Some(StyleMode::HookMatrix);

    let outcome = orchestrator.run(request).await.unwrap();

    assert_eq!(driver.call_count(), 4);
    assert_eq!(outcome.quality.satisfaction, 60);
    assert!(first_hook(&outcome.output).contains("[B"));

    // The final v2 batch carries its embedded scorecard.
    match &outcome.output {
        CreativeOutput::V2(batch) => {
            let evaluation = batch.evaluation.as_ref().unwrap();
            assert!(!evaluation.killed());
            assert_eq!(evaluation.scores.clarity, 3);
            assert!(!evaluation.weakest_dimensions.is_empty());
        }
        CreativeOutput::V1(_) => panic!("expected a v2 output"),
    }
}

#[tokio::test]
async fn failed_improve_attempt_keeps_current_best() {
    let brief = brief();
    let driver = Arc::new(MockDriver::scripted([
        batch_json(&brief, "A"),
        eval_json(60, &["too generic"]),
        // Improve attempt returns junk three times: wasted attempt.
        "junk".to_string(),
        "junk".to_string(),
        "junk".to_string(),
    ]));
    let (orchestrator, _) = harness(driver.clone(), config(95, 2));

    let outcome = orchestrator
        .run(GenerationRequest::new("user-1", brief))
        .await
        .unwrap();

    // The 60-scoring initial candidate survives the failed improve attempt.
    assert_eq!(outcome.quality.satisfaction, 60);
    assert!(first_hook(&outcome.output).contains("[A]"));
    assert!(outcome.warning.is_none());
    assert_eq!(driver.call_count(), 5);
}

#[tokio::test]
async fn evaluation_failure_counts_as_worst_score() {
    let brief = brief();
    let driver = Arc::new(MockDriver::scripted([
        batch_json(&brief, "A"),
        eval_json(70, &[]),
        batch_json(&brief, "B"),
        // Evaluation of B never parses: B scores 0 and is discarded.
        "not an evaluation".to_string(),
        "still not".to_string(),
        "nope".to_string(),
    ]));
    let (orchestrator, _) = harness(driver.clone(), config(95, 2));

    let outcome = orchestrator
        .run(GenerationRequest::new("user-1", brief))
        .await
        .unwrap();

    assert_eq!(outcome.quality.satisfaction, 70);
    assert!(first_hook(&outcome.output).contains("[A]"));
}

#[tokio::test]
async fn quality_report_is_honest_below_target() {
    let brief = brief();
    let driver = Arc::new(MockDriver::scripted([
        batch_json(&brief, "A"),
        eval_json(58, &["hook does not name the audience"]),
    ]));
    let (orchestrator, _) = harness(driver, config(95, 1));

    let outcome = orchestrator
        .run(GenerationRequest::new("user-1", brief))
        .await
        .unwrap();

    assert_eq!(outcome.quality.target, 95);
    assert_eq!(outcome.quality.satisfaction, 58);
    assert_eq!(
        outcome.quality.issues,
        vec!["hook does not name the audience".to_string()]
    );
}

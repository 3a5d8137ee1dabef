//! Integration tests for the in-memory job store.

use adforge_core::{
    CreativeBatch, CreativeOutput, GenerationJob, JobPhase, JobStatus, JobUpdate, PhaseMeta,
};
use adforge_interface::JobStore;
use adforge_store::MemoryJobStore;

fn sample_job() -> GenerationJob {
    let brief = serde_json::from_str(include_str!(
        "../../adforge_core/testdata/brief.json"
    ))
    .unwrap();
    GenerationJob::new("user-1", brief)
}

fn sample_output() -> CreativeOutput {
    let batch: CreativeBatch = serde_json::from_str(include_str!(
        "../../adforge_core/testdata/creative_batch.json"
    ))
    .unwrap();
    CreativeOutput::V1(batch)
}

#[tokio::test]
async fn full_job_lifecycle() {
    let store = MemoryJobStore::new();
    let id = store.create(sample_job()).await.unwrap();

    // Checkpoint through the pipeline phases.
    for (progress, phase) in [
        (5u8, JobPhase::ValidatingInput),
        (10, JobPhase::Generating),
        (15, JobPhase::SanityFiltering),
        (30, JobPhase::Evaluating),
        (50, JobPhase::Improving),
    ] {
        store
            .update(id, JobUpdate::checkpoint(progress, PhaseMeta::new(phase, 0)))
            .await
            .unwrap();
    }

    let mid = store.get(id).await.unwrap();
    assert_eq!(mid.status, JobStatus::InProgress);
    assert_eq!(mid.progress, 50);
    assert!(!mid.is_terminal());

    store.finalize(id, sample_output(), 72).await.unwrap();

    let done = store.get(id).await.unwrap();
    assert_eq!(done.status, JobStatus::Complete);
    assert_eq!(done.progress, 100);
    assert_eq!(done.score, Some(72));
    assert_eq!(done.phase.phase, JobPhase::Complete);
    assert!(done.is_terminal());
    assert!(done.output.is_some());
}

#[tokio::test]
async fn error_state_carries_message() {
    let store = MemoryJobStore::new();
    let id = store.create(sample_job()).await.unwrap();

    store
        .update(id, JobUpdate::failed("creative generation failed"))
        .await
        .unwrap();

    let job = store.get(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Error);
    assert_eq!(
        job.phase.message.as_deref(),
        Some("creative generation failed")
    );
    assert!(job.is_terminal());
    assert!(job.output.is_none());
}

#[tokio::test]
async fn progress_is_capped_at_one_hundred() {
    let store = MemoryJobStore::new();
    let id = store.create(sample_job()).await.unwrap();

    store
        .update(
            id,
            JobUpdate {
                progress: Some(255),
                ..JobUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(store.get(id).await.unwrap().progress, 100);
}

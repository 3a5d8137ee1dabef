//! In-memory store implementations.

use adforge_core::{CreativeOutput, GenerationJob, JobPhase, JobStatus, JobUpdate, PhaseMeta};
use adforge_error::{AdforgeResult, StoreError, StoreErrorKind};
use adforge_interface::{ContextDocument, ContextStore, JobStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory [`JobStore`] backed by a `RwLock<HashMap>`.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<Uuid, GenerationJob>>,
}

impl MemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether the store holds no jobs.
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, job: GenerationJob) -> AdforgeResult<Uuid> {
        let id = job.id;
        self.jobs.write().await.insert(id, job);
        tracing::debug!(job_id = %id, "Created job record");
        Ok(id)
    }

    async fn update(&self, job_id: Uuid, update: JobUpdate) -> AdforgeResult<()> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&job_id).ok_or_else(|| {
            StoreError::new(StoreErrorKind::NotFound(format!("job {}", job_id)))
        })?;

        if let Some(status) = update.status {
            job.status = status;
        }
        if let Some(progress) = update.progress {
            job.progress = progress.min(100);
        }
        if let Some(phase) = update.phase {
            job.phase = phase;
        }
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn finalize(
        &self,
        job_id: Uuid,
        output: CreativeOutput,
        score: u8,
    ) -> AdforgeResult<()> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&job_id).ok_or_else(|| {
            StoreError::new(StoreErrorKind::NotFound(format!("job {}", job_id)))
        })?;

        job.output = Some(output);
        job.score = Some(score);
        job.status = JobStatus::Complete;
        job.progress = 100;
        job.phase = PhaseMeta::new(JobPhase::Complete, job.phase.attempt);
        job.updated_at = Utc::now();
        tracing::debug!(job_id = %job_id, score, "Finalized job record");
        Ok(())
    }

    async fn get(&self, job_id: Uuid) -> AdforgeResult<GenerationJob> {
        self.jobs
            .read()
            .await
            .get(&job_id)
            .cloned()
            .ok_or_else(|| {
                StoreError::new(StoreErrorKind::NotFound(format!("job {}", job_id))).into()
            })
    }
}

/// In-memory [`ContextStore`] seeded with a fixed document set.
#[derive(Default)]
pub struct MemoryContextStore {
    documents: HashMap<String, ContextDocument>,
}

impl MemoryContextStore {
    /// Create a store holding the given documents, keyed by id.
    pub fn new(documents: impl IntoIterator<Item = ContextDocument>) -> Self {
        Self {
            documents: documents
                .into_iter()
                .map(|doc| (doc.id.clone(), doc))
                .collect(),
        }
    }
}

#[async_trait]
impl ContextStore for MemoryContextStore {
    async fn get_document(&self, id: &str) -> AdforgeResult<Option<ContextDocument>> {
        Ok(self.documents.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::Brief;
    use adforge_interface::ContextKind;

    fn sample_brief() -> Brief {
        serde_json::from_str(include_str!(
            "../../adforge_core/testdata/brief.json"
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let store = MemoryJobStore::new();
        let job = GenerationJob::new("user-1", sample_brief());
        let id = store.create(job.clone()).await.unwrap();

        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched.user_id, "user-1");
        assert_eq!(fetched.status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn update_applies_only_set_fields() {
        let store = MemoryJobStore::new();
        let id = store
            .create(GenerationJob::new("user-1", sample_brief()))
            .await
            .unwrap();

        store
            .update(
                id,
                JobUpdate::checkpoint(15, PhaseMeta::new(JobPhase::Generating, 0)),
            )
            .await
            .unwrap();

        let job = store.get(id).await.unwrap();
        assert_eq!(job.status, JobStatus::InProgress);
        assert_eq!(job.progress, 15);
        assert_eq!(job.phase.phase, JobPhase::Generating);
        assert!(job.output.is_none());
    }

    #[tokio::test]
    async fn update_missing_job_is_not_found() {
        let store = MemoryJobStore::new();
        let result = store.update(Uuid::new_v4(), JobUpdate::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn context_store_lookup() {
        let store = MemoryContextStore::new([ContextDocument::new(
            "strat-1",
            ContextKind::Strategy,
            "Q3 strategy",
            "Lead with the ritual angle.",
        )]);

        let doc = store.get_document("strat-1").await.unwrap().unwrap();
        assert_eq!(doc.kind, ContextKind::Strategy);
        assert!(store.get_document("nope").await.unwrap().is_none());
    }
}

//! Best-effort progress reporting to the job store.
//!
//! Progress tracking is an observability aid, not a correctness dependency:
//! a failed write is logged and swallowed so it can never abort generation.

use adforge_core::{JobUpdate, PhaseMeta};
use adforge_interface::JobStore;
use std::sync::Arc;
use uuid::Uuid;

/// Writes phase checkpoints for one job, tolerating store failures.
pub struct ProgressReporter {
    store: Arc<dyn JobStore>,
    job_id: Uuid,
}

impl ProgressReporter {
    /// Reporter for a job.
    pub fn new(store: Arc<dyn JobStore>, job_id: Uuid) -> Self {
        Self { store, job_id }
    }

    /// The job being reported on.
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Record a phase checkpoint. Failures are logged and swallowed.
    pub async fn checkpoint(&self, progress: u8, phase: PhaseMeta) {
        let update = JobUpdate::checkpoint(progress, phase.clone());
        if let Err(e) = self.store.update(self.job_id, update).await {
            tracing::warn!(
                job_id = %self.job_id,
                progress,
                phase = %phase.phase,
                error = %e,
                "Failed to write progress checkpoint, continuing"
            );
        }
    }

    /// Mark the job failed with a message. Failures are logged and swallowed.
    pub async fn fail(&self, message: &str) {
        if let Err(e) = self.store.update(self.job_id, JobUpdate::failed(message)).await {
            tracing::warn!(
                job_id = %self.job_id,
                error = %e,
                "Failed to mark job as errored, continuing"
            );
        }
    }
}

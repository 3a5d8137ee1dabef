//! Generation job records.
//!
//! A [`GenerationJob`] is created when a request enters the pipeline and
//! mutated only by the orchestrator handling that request. Polling clients
//! read it; nothing else writes to it.

use crate::brief::Brief;
use crate::creative::CreativeOutput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a generation job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    /// Created, not yet picked up
    Pending,
    /// Orchestrator is working on it
    InProgress,
    /// Terminal: output populated
    Complete,
    /// Terminal: phase metadata carries the error
    Error,
}

/// Pipeline phase a job is currently in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobPhase {
    /// Brief entry validation
    ValidatingInput,
    /// Initial provider call
    Generating,
    /// Deterministic post-processing
    SanityFiltering,
    /// Quality evaluation
    Evaluating,
    /// Improve-retry iteration
    Improving,
    /// Persisting the final result
    Finalizing,
    /// Done
    Complete,
    /// Failed
    Error,
}

/// Free-form phase metadata attached to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseMeta {
    /// Active pipeline phase
    pub phase: JobPhase,
    /// Improve attempt number (0 for the initial generation)
    pub attempt: u32,
    /// Optional human-readable note (error text for failed jobs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PhaseMeta {
    /// Metadata for a phase with no note.
    pub fn new(phase: JobPhase, attempt: u32) -> Self {
        Self {
            phase,
            attempt,
            message: None,
        }
    }

    /// Metadata carrying a note.
    pub fn with_message(phase: JobPhase, attempt: u32, message: impl Into<String>) -> Self {
        Self {
            phase,
            attempt,
            message: Some(message.into()),
        }
    }
}

/// Persisted progress record for one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationJob {
    /// Job identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: String,
    /// Snapshot of the submitted brief
    pub brief: Brief,
    /// Current status
    pub status: JobStatus,
    /// Percent complete, 0 to 100
    pub progress: u8,
    /// Active phase metadata
    pub phase: PhaseMeta,
    /// Final output, null until complete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<CreativeOutput>,
    /// Final satisfaction score, null until complete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl GenerationJob {
    /// Create a fresh pending job for a brief.
    pub fn new(user_id: impl Into<String>, brief: Brief) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            brief,
            status: JobStatus::Pending,
            progress: 0,
            phase: PhaseMeta::new(JobPhase::ValidatingInput, 0),
            output: None,
            score: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the job reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Complete | JobStatus::Error)
    }
}

/// Partial update applied to a job record. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    /// New status
    pub status: Option<JobStatus>,
    /// New progress percent
    pub progress: Option<u8>,
    /// New phase metadata
    pub phase: Option<PhaseMeta>,
}

impl JobUpdate {
    /// Update carrying only a progress + phase checkpoint.
    pub fn checkpoint(progress: u8, phase: PhaseMeta) -> Self {
        Self {
            status: Some(JobStatus::InProgress),
            progress: Some(progress),
            phase: Some(phase),
        }
    }

    /// Update marking the job failed with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Error),
            progress: None,
            phase: Some(PhaseMeta::with_message(JobPhase::Error, 0, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_brief() -> Brief {
        serde_json::from_str(include_str!("../testdata/brief.json")).unwrap()
    }

    #[test]
    fn new_job_is_pending() {
        let job = GenerationJob::new("user-1", sample_brief());
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.progress, 0);
        assert!(job.output.is_none());
        assert!(!job.is_terminal());
    }

    #[test]
    fn status_renders_snake_case() {
        assert_eq!(JobStatus::InProgress.to_string(), "in_progress");
        assert_eq!(JobPhase::SanityFiltering.to_string(), "sanity_filtering");
    }

    #[test]
    fn failed_update_carries_message() {
        let update = JobUpdate::failed("generation failed");
        assert_eq!(update.status, Some(JobStatus::Error));
        let phase = update.phase.unwrap();
        assert_eq!(phase.phase, JobPhase::Error);
        assert_eq!(phase.message.as_deref(), Some("generation failed"));
    }
}

//! Iterative creative-generation quality loop.
//!
//! This crate is the core of Adforge: a bounded-retry pipeline that generates
//! structured ad content via an AI provider, validates it against a strict
//! schema (repairing malformed responses), scores it against a quality
//! rubric, and iteratively improves it until a target quality threshold is
//! met or the time/attempt budget is exhausted.
//!
//! Entry point: [`GenerationOrchestrator`]. The surrounding pieces —
//! [`extract_json`], the repair loop, [`sanitize`], [`QualityEvaluator`],
//! and the deterministic fallback builders — are exposed for reuse and
//! direct testing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod evaluator;
mod extraction;
mod fallback;
mod orchestrator;
mod progress;
mod prompts;
mod repair;
mod sanity;
mod state;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use evaluator::QualityEvaluator;
pub use extraction::extract_json;
pub use fallback::{fallback_output, fallback_v1, fallback_v2};
pub use orchestrator::{
    GenerationOrchestrator, GenerationOutcome, GenerationRequest, QualityReport,
};
pub use progress::ProgressReporter;
pub use repair::{parse_with_repair, RepairOutcome};
pub use sanity::{sanitize, SanityReport};
pub use state::{LoopDecision, LoopState};

//! Core data types for the Adforge creative generation engine.
//!
//! This crate provides the foundation data model shared across the Adforge
//! workspace: briefs, creative outputs (v1 and v2), quality evaluations,
//! generation job records, the completion request/response pair exchanged
//! with AI providers, and the schema-validation machinery that guards every
//! external-data entry point.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod brief;
mod completion;
mod creative;
mod job;
mod quality;
mod telemetry;
mod validate;

pub use brief::{
    Angle, AspectRatio, Audience, Brief, FunnelStage, Goal, Language, Offer, Product, RiskFlag,
    RiskSeverity, ToneOfVoice,
};
pub use completion::{CompletionRequest, CompletionRequestBuilder, CompletionResponse};
pub use creative::{
    CopyBlock, Creative, CreativeBatch, CreativeOutput, CreativeScore, ImageMeta, ScriptBlock,
    StyleMode, Variant, VariantBatch, VariantPlatform, VariantTone, MAX_BULLETS, MAX_BULLET_CHARS,
    MAX_CREATIVES, MAX_CTA_CHARS, MAX_HOOK_CHARS, MAX_ON_SCREEN_LINES, MAX_PRIMARY_TEXT_CHARS,
    MAX_RATIONALE_CHARS, MAX_RENDER_INTENT_CHARS, MAX_VARIANTS, MIN_CREATIVES, MIN_ON_SCREEN_LINES,
    MIN_VARIANTS,
};
pub use job::{GenerationJob, JobPhase, JobStatus, JobUpdate, PhaseMeta};
pub use quality::{
    clamp_dimension, clamp_satisfaction, BatchEvaluation, DimensionEvaluation, DimensionScores,
    QualityEvaluation,
};
pub use telemetry::init_telemetry;
pub use validate::{ensure_valid, parse_document, Validate, Violation};

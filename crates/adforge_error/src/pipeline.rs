//! Generation pipeline error types.

/// Specific error conditions for the generation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Submitted brief failed entry validation
    #[display("Invalid brief: {}", violations.join("; "))]
    InvalidBrief {
        /// One rendered `path: constraint` entry per violated field
        violations: Vec<String>,
    },
    /// Provider failed after all transient retries
    #[display("Provider unavailable: {}", _0)]
    ProviderUnavailable(String),
    /// Orchestrator hit an unexpected internal failure
    #[display("Generation failed: {}", _0)]
    GenerationFailed(String),
    /// Pipeline configuration is out of range
    #[display("Configuration error: {}", _0)]
    Configuration(String),
}

/// Pipeline error with location tracking.
///
/// # Examples
///
/// ```
/// use adforge_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::InvalidBrief {
///     violations: vec!["angles: at least 2 entries required".to_string()],
/// });
/// assert!(format!("{}", err).contains("angles"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the caller is at fault (client error) rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self.kind, PipelineErrorKind::InvalidBrief { .. })
    }
}

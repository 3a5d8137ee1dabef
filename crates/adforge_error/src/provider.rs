//! AI provider error types.

/// Specific error conditions for AI provider calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Transport-level failure before a response was received
    #[display("HTTP error: {}", _0)]
    Http(String),
    /// Provider returned a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or error message
        message: String,
    },
    /// Provider response body could not be decoded
    #[display("Failed to parse provider response: {}", _0)]
    Parse(String),
    /// Request exceeded its deadline
    #[display("Provider request timed out after {}ms", _0)]
    Timeout(u64),
    /// Provider signalled rate limiting (429)
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// Retry budget for transient failures was exhausted
    #[display("Retries exhausted after {} attempts: {}", attempts, message)]
    RetriesExhausted {
        /// Attempts made including the initial call
        attempts: u32,
        /// Last observed failure
        message: String,
    },
}

impl ProviderErrorKind {
    /// Whether a call failing with this kind may be retried.
    ///
    /// Timeouts, rate limits, transport failures, and 5xx responses are
    /// transient; 4xx responses and decode failures are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) | Self::RateLimited(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Parse(_) | Self::RetriesExhausted { .. } => false,
        }
    }
}

/// Provider error with location tracking.
///
/// # Examples
///
/// ```
/// use adforge_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::Timeout(30_000));
/// assert!(format!("{}", err).contains("timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The specific error condition
    pub kind: ProviderErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the failed call may be retried.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

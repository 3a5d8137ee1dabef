//! Job and context store error types.

/// Specific error conditions for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StoreErrorKind {
    /// Requested record does not exist
    #[display("Not found: {}", _0)]
    NotFound(String),
    /// Backing store could not be reached
    #[display("Store unavailable: {}", _0)]
    Unavailable(String),
    /// Record could not be serialized or deserialized
    #[display("Serialization error: {}", _0)]
    Serialization(String),
}

/// Store error with location tracking.
///
/// # Examples
///
/// ```
/// use adforge_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::NotFound("job 42".to_string()));
/// assert!(format!("{}", err).contains("Not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The specific error condition
    pub kind: StoreErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoreError {
    /// Create a new StoreError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

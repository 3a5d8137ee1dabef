//! Schema validation error types.

/// Specific error conditions for schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SchemaErrorKind {
    /// No JSON document could be located in the raw text
    #[display("No JSON found in response (length: {})", _0)]
    NoJson(usize),
    /// JSON syntax error
    #[display("Malformed JSON: {}", _0)]
    Malformed(String),
    /// Document parsed but violated the declared shape
    #[display("Schema violations: {}", violations.join("; "))]
    Invalid {
        /// One rendered `path: constraint` entry per violated field
        violations: Vec<String>,
    },
    /// Repair attempts were exhausted without a conforming document
    #[display("Repair exhausted after {} attempts; last failure: {}", attempts, last)]
    RepairExhausted {
        /// Parse attempts made including the initial one
        attempts: u32,
        /// The failure that ended the loop
        last: String,
    },
}

/// Schema validation error with location tracking.
///
/// # Examples
///
/// ```
/// use adforge_error::{SchemaError, SchemaErrorKind};
///
/// let err = SchemaError::new(SchemaErrorKind::Invalid {
///     violations: vec!["creatives[0].copy.hook: length 97 exceeds 80".to_string()],
/// });
/// assert!(format!("{}", err).contains("hook"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Schema Error: {} at line {} in {}", kind, line, file)]
pub struct SchemaError {
    /// The specific error condition
    pub kind: SchemaErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SchemaError {
    /// Create a new SchemaError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SchemaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

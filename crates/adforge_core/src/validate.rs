//! Schema validation for externally sourced documents.
//!
//! Every value that crosses an external-data boundary (provider responses,
//! client request bodies) is deserialized with `deny_unknown_fields` and then
//! passed through [`Validate`] before it is trusted. Validation collects every
//! violation rather than stopping at the first, so repair instructions can
//! quote the complete failure list.

use adforge_error::{AdforgeResult, SchemaError, SchemaErrorKind};
use serde::de::DeserializeOwned;

/// A single violated constraint at a field path.
///
/// # Examples
///
/// ```
/// use adforge_core::Violation;
///
/// let v = Violation::new("creatives[0].copy.hook", "length 97 exceeds 80 chars");
/// assert_eq!(v.render(), "creatives[0].copy.hook: length 97 exceeds 80 chars");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field
    pub path: String,
    /// The constraint that was violated
    pub constraint: String,
}

impl Violation {
    /// Create a violation for a field path.
    pub fn new(path: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            constraint: constraint.into(),
        }
    }

    /// Render as a `path: constraint` line for error messages and repair
    /// instructions.
    pub fn render(&self) -> String {
        format!("{}: {}", self.path, self.constraint)
    }
}

/// Document types that can report every violated constraint.
pub trait Validate {
    /// Collect all violations. An empty vector means the value conforms.
    fn validate(&self) -> Vec<Violation>;
}

/// Check a value against its declared shape, failing with the full violation
/// list.
pub fn ensure_valid<T: Validate>(value: &T) -> Result<(), SchemaError> {
    let violations = value.validate();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::new(SchemaErrorKind::Invalid {
            violations: violations.iter().map(Violation::render).collect(),
        }))
    }
}

/// Parse a JSON document into a validated value.
///
/// Deserialization enforces the closed world (`deny_unknown_fields` on every
/// document type rejects extra keys); [`Validate`] then enforces the content
/// contracts — length bounds, list cardinalities, referential integrity.
///
/// # Errors
///
/// Returns `SchemaErrorKind::Malformed` on a syntax/shape error and
/// `SchemaErrorKind::Invalid` with the full violation list on a content error.
pub fn parse_document<T>(json: &str) -> AdforgeResult<T>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_str(json)
        .map_err(|e| SchemaError::new(SchemaErrorKind::Malformed(e.to_string())))?;
    ensure_valid(&value)?;
    Ok(value)
}

/// Record a violation if `text` exceeds `max` characters.
pub(crate) fn check_max_chars(path: &str, text: &str, max: usize, out: &mut Vec<Violation>) {
    let len = text.chars().count();
    if len > max {
        out.push(Violation::new(
            path,
            format!("length {} exceeds {} chars", len, max),
        ));
    }
}

/// Record a violation if `text` is empty or whitespace.
pub(crate) fn check_non_empty(path: &str, text: &str, out: &mut Vec<Violation>) {
    if text.trim().is_empty() {
        out.push(Violation::new(path, "must not be empty"));
    }
}

/// Record a violation if a list is outside `[min, max]` entries.
pub(crate) fn check_count(
    path: &str,
    count: usize,
    min: usize,
    max: usize,
    out: &mut Vec<Violation>,
) {
    if count < min {
        out.push(Violation::new(
            path,
            format!("{} entries, at least {} required", count, min),
        ));
    } else if count > max {
        out.push(Violation::new(
            path,
            format!("{} entries, at most {} allowed", count, max),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        name: String,
    }

    impl Validate for Sample {
        fn validate(&self) -> Vec<Violation> {
            let mut out = Vec::new();
            check_non_empty("name", &self.name, &mut out);
            out
        }
    }

    #[test]
    fn parse_document_accepts_conforming_json() {
        let sample: Sample = parse_document(r#"{"name": "ok"}"#).unwrap();
        assert_eq!(sample.name, "ok");
    }

    #[test]
    fn parse_document_rejects_unknown_fields() {
        let result: AdforgeResult<Sample> = parse_document(r#"{"name": "ok", "extra": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn parse_document_reports_violations() {
        let result: AdforgeResult<Sample> = parse_document(r#"{"name": "  "}"#);
        let err = result.unwrap_err();
        assert!(format!("{}", err).contains("must not be empty"));
    }

    #[test]
    fn check_max_chars_counts_characters_not_bytes() {
        let mut out = Vec::new();
        check_max_chars("hook", "äöü", 3, &mut out);
        assert!(out.is_empty());
    }
}

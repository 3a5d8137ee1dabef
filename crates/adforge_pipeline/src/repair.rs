//! Bounded repair loop for non-conforming provider output.
//!
//! When a raw response fails extraction or schema validation, the loop asks
//! the provider to fix its own output, quoting the specific violations, up to
//! a small fixed ceiling. Each repair attempt is one external provider call;
//! callers budget for that cost. On exhaustion a terminal parse failure
//! surfaces to the caller — the orchestrator then substitutes a deterministic
//! fallback rather than failing the user's request.

use crate::extraction::extract_json;
use adforge_core::{parse_document, Validate};
use adforge_error::{AdforgeError, AdforgeResult, SchemaError, SchemaErrorKind};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Result of a successful parse, with repair accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome<T> {
    /// The validated document
    pub value: T,
    /// Provider calls spent on repair (0 when the raw text parsed directly)
    pub repair_calls: u32,
}

impl<T> RepairOutcome<T> {
    /// Whether any repair call was needed.
    pub fn repaired(&self) -> bool {
        self.repair_calls > 0
    }
}

/// Parse raw provider text into a validated document, asking the provider to
/// repair its own output on failure.
///
/// `expectation` is a one-line description of the expected document, quoted
/// in the repair instruction. `reask` issues a new provider call given a
/// repair instruction string and returns the new raw text.
///
/// # Errors
///
/// - `SchemaErrorKind::RepairExhausted` once `repair_ceiling` repair calls
///   have been spent without a conforming document.
/// - Any error from `reask` (provider failures) propagates unchanged.
pub async fn parse_with_repair<T, F, Fut>(
    raw: &str,
    expectation: &str,
    repair_ceiling: u32,
    reask: F,
) -> AdforgeResult<RepairOutcome<T>>
where
    T: DeserializeOwned + Validate,
    F: Fn(String) -> Fut,
    Fut: Future<Output = AdforgeResult<String>>,
{
    let mut current = raw.to_string();
    let mut repair_calls = 0u32;

    loop {
        match try_parse::<T>(&current) {
            Ok(value) => {
                if repair_calls > 0 {
                    tracing::info!(repair_calls, "Provider output repaired successfully");
                }
                return Ok(RepairOutcome { value, repair_calls });
            }
            Err(failure) => {
                if repair_calls >= repair_ceiling {
                    tracing::warn!(
                        attempts = repair_calls + 1,
                        last_failure = %failure,
                        "Repair ceiling reached, surfacing terminal parse failure"
                    );
                    return Err(SchemaError::new(SchemaErrorKind::RepairExhausted {
                        attempts: repair_calls + 1,
                        last: failure.to_string(),
                    })
                    .into());
                }

                let instruction = repair_instruction(expectation, &failure, &current);
                tracing::debug!(
                    repair_call = repair_calls + 1,
                    failure = %failure,
                    "Issuing repair instruction"
                );
                current = reask(instruction).await?;
                repair_calls += 1;
            }
        }
    }
}

/// One extraction + validation attempt.
fn try_parse<T>(raw: &str) -> Result<T, AdforgeError>
where
    T: DeserializeOwned + Validate,
{
    let json = extract_json(raw)?;
    parse_document(&json)
}

/// Build the follow-up prompt asking the provider to correct its output.
fn repair_instruction(expectation: &str, failure: &AdforgeError, previous: &str) -> String {
    format!(
        "Your previous response did not match the required format.\n\
         Expected: {expectation}\n\
         Validation errors:\n{failure}\n\n\
         Your previous response was:\n{previous}\n\n\
         Return the corrected JSON document only. No markdown fences, no \
         commentary, no fields beyond the declared schema."
    )
}

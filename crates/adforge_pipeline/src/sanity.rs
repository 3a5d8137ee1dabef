//! Deterministic post-processing of generated batches.
//!
//! The sanity filter runs after schema validation and before evaluation. It
//! is pure and synchronous: no provider calls, no side effects beyond
//! returning a cleaned copy. Length bounds are re-enforced here even though
//! the validator already checked them — a provider that ignores instructions
//! during repair must not be able to smuggle overlong copy past the pipeline.

use adforge_core::{
    CreativeOutput, MAX_BULLETS, MAX_BULLET_CHARS, MAX_CTA_CHARS, MAX_HOOK_CHARS,
    MAX_ON_SCREEN_LINES, MAX_PRIMARY_TEXT_CHARS, MAX_RATIONALE_CHARS, MAX_RENDER_INTENT_CHARS,
};
use std::collections::HashSet;

/// What the sanity filter removed or adjusted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanityReport {
    /// Ids (v1) or hooks (v2) of candidates dropped for empty required copy
    pub dropped_empty: Vec<String>,
    /// Ids/hooks of candidates dropped as near-duplicate hooks
    pub dropped_duplicates: Vec<String>,
    /// Number of fields truncated back to their declared bounds
    pub truncated_fields: u32,
}

impl SanityReport {
    /// Whether the filter changed anything.
    pub fn is_clean(&self) -> bool {
        self.dropped_empty.is_empty()
            && self.dropped_duplicates.is_empty()
            && self.truncated_fields == 0
    }
}

/// Apply the sanity filter to a creative output, returning a cleaned copy and
/// a report of what changed.
pub fn sanitize(output: &CreativeOutput) -> (CreativeOutput, SanityReport) {
    let mut report = SanityReport::default();
    let cleaned = match output {
        CreativeOutput::V1(batch) => {
            let mut batch = batch.clone();
            let mut seen_hooks = HashSet::new();
            batch.creatives.retain(|creative| {
                if creative.copy.hook.trim().is_empty()
                    || creative.copy.primary_text.trim().is_empty()
                    || creative.copy.cta.trim().is_empty()
                {
                    report.dropped_empty.push(creative.id.clone());
                    return false;
                }
                if !seen_hooks.insert(normalize_hook(&creative.copy.hook)) {
                    report.dropped_duplicates.push(creative.id.clone());
                    return false;
                }
                true
            });
            for creative in &mut batch.creatives {
                truncate_in_place(&mut creative.copy.hook, MAX_HOOK_CHARS, &mut report);
                truncate_in_place(
                    &mut creative.copy.primary_text,
                    MAX_PRIMARY_TEXT_CHARS,
                    &mut report,
                );
                truncate_in_place(&mut creative.copy.cta, MAX_CTA_CHARS, &mut report);
                if creative.copy.bullets.len() > MAX_BULLETS {
                    creative.copy.bullets.truncate(MAX_BULLETS);
                    report.truncated_fields += 1;
                }
                for bullet in &mut creative.copy.bullets {
                    truncate_in_place(bullet, MAX_BULLET_CHARS, &mut report);
                }
                truncate_in_place(
                    &mut creative.score.rationale,
                    MAX_RATIONALE_CHARS,
                    &mut report,
                );
                truncate_in_place(
                    &mut creative.image.render_intent,
                    MAX_RENDER_INTENT_CHARS,
                    &mut report,
                );
            }
            CreativeOutput::V1(batch)
        }
        CreativeOutput::V2(batch) => {
            let mut batch = batch.clone();
            let mut seen_hooks = HashSet::new();
            batch.variants.retain(|variant| {
                if variant.hook.trim().is_empty() || variant.cta.trim().is_empty() {
                    report.dropped_empty.push(variant.hook.clone());
                    return false;
                }
                if !seen_hooks.insert(normalize_hook(&variant.hook)) {
                    report.dropped_duplicates.push(variant.hook.clone());
                    return false;
                }
                true
            });
            for variant in &mut batch.variants {
                if variant.on_screen_text.len() > MAX_ON_SCREEN_LINES {
                    variant.on_screen_text.truncate(MAX_ON_SCREEN_LINES);
                    report.truncated_fields += 1;
                }
            }
            CreativeOutput::V2(batch)
        }
    };

    if !report.is_clean() {
        tracing::debug!(
            dropped_empty = report.dropped_empty.len(),
            dropped_duplicates = report.dropped_duplicates.len(),
            truncated_fields = report.truncated_fields,
            "Sanity filter adjusted batch"
        );
    }

    (cleaned, report)
}

/// Case-, whitespace-, and punctuation-insensitive hook form used for
/// duplicate collapsing.
fn normalize_hook(hook: &str) -> String {
    hook.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Truncate a string to `max` characters on a char boundary, counting the
/// adjustment in the report.
fn truncate_in_place(text: &mut String, max: usize, report: &mut SanityReport) {
    if text.chars().count() > max {
        *text = text.chars().take(max).collect();
        report.truncated_fields += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::CreativeBatch;

    fn sample_output() -> CreativeOutput {
        let batch: CreativeBatch = serde_json::from_str(include_str!(
            "../../adforge_core/testdata/creative_batch.json"
        ))
        .unwrap();
        CreativeOutput::V1(batch)
    }

    #[test]
    fn clean_batch_passes_through() {
        let output = sample_output();
        let (cleaned, report) = sanitize(&output);
        assert!(report.is_clean());
        assert_eq!(cleaned, output);
    }

    #[test]
    fn empty_required_copy_is_dropped() {
        let mut output = sample_output();
        if let CreativeOutput::V1(batch) = &mut output {
            batch.creatives[0].copy.cta = "   ".to_string();
        }
        let (cleaned, report) = sanitize(&output);
        assert_eq!(report.dropped_empty, vec!["c-1".to_string()]);
        assert_eq!(cleaned.candidate_count(), 1);
    }

    #[test]
    fn near_duplicate_hooks_collapse_keeping_first() {
        let mut output = sample_output();
        if let CreativeOutput::V1(batch) = &mut output {
            let hook = batch.creatives[0].copy.hook.clone();
            batch.creatives[1].copy.hook = format!("  {}!! ", hook.to_uppercase());
        }
        let (cleaned, report) = sanitize(&output);
        assert_eq!(report.dropped_duplicates, vec!["c-2".to_string()]);
        if let CreativeOutput::V1(batch) = &cleaned {
            assert_eq!(batch.creatives.len(), 1);
            assert_eq!(batch.creatives[0].id, "c-1");
        }
    }

    #[test]
    fn overlong_copy_is_truncated_defensively() {
        let mut output = sample_output();
        if let CreativeOutput::V1(batch) = &mut output {
            batch.creatives[0].copy.hook = "ä".repeat(MAX_HOOK_CHARS + 20);
        }
        let (cleaned, report) = sanitize(&output);
        assert_eq!(report.truncated_fields, 1);
        if let CreativeOutput::V1(batch) = &cleaned {
            assert_eq!(batch.creatives[0].copy.hook.chars().count(), MAX_HOOK_CHARS);
        }
    }

    #[test]
    fn sanitize_is_deterministic() {
        let mut output = sample_output();
        if let CreativeOutput::V1(batch) = &mut output {
            batch.creatives[1].copy.hook = batch.creatives[0].copy.hook.clone();
        }
        let first = sanitize(&output);
        let second = sanitize(&output);
        assert_eq!(first, second);
    }

    #[test]
    fn normalize_hook_strips_case_space_punctuation() {
        assert_eq!(
            normalize_hook("  Still counting SHEEP, at 2am?! "),
            normalize_hook("still counting sheep at 2am")
        );
    }
}

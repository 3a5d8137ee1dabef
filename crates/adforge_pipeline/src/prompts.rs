//! Prompt construction for generation, improvement, and evaluation calls.
//!
//! Prompts are plain strings assembled from pre-serialized JSON fragments;
//! the orchestrator and evaluator own serialization so these builders stay
//! pure. Every prompt that expects JSON back says so explicitly — providers
//! that wrap output in prose anyway are handled by extraction and repair.

use adforge_core::{StyleMode, MAX_CREATIVES, MAX_VARIANTS, MIN_CREATIVES, MIN_VARIANTS};
use adforge_interface::ContextDocument;
use std::fmt::Write;

/// System instruction for generation calls.
pub(crate) fn generation_system() -> &'static str {
    "You are a senior direct-response creative strategist. You write ad copy \
     that respects every stated constraint. You output ONLY valid JSON \
     matching the requested schema, with no markdown fences and no extra keys."
}

/// System instruction for evaluation calls.
pub(crate) fn evaluation_system() -> &'static str {
    "You are a ruthless creative director grading ad batches. You never \
     reward generic copy. You output ONLY valid JSON matching the requested \
     schema, with no markdown fences and no extra keys."
}

/// Render supporting context documents into a prompt section.
fn context_section(context: &[ContextDocument]) -> String {
    if context.is_empty() {
        return String::new();
    }
    let mut section = String::from("\n\nSupporting context:\n");
    for doc in context {
        let _ = write!(section, "\n[{} — {}]\n{}\n", doc.kind, doc.title, doc.body);
    }
    section
}

/// Initial generation prompt for a v1 creative batch.
pub(crate) fn v1_generation_prompt(brief_json: &str, context: &[ContextDocument]) -> String {
    format!(
        "Generate a batch of ad creatives for the brief below.\n\n\
         Brief:\n{brief_json}{context}\n\n\
         Rules:\n\
         - Return a JSON object with fields: version (\"1.0\"), brief (echo \
           the brief above verbatim), creatives (array of {MIN_CREATIVES} to \
           {MAX_CREATIVES} items).\n\
         - Each creative: id, angle_id (must be one of the brief's angle \
           ids), format (the brief's format), copy {{hook <= 80 chars, \
           primary_text <= 700 chars, cta <= 30 chars, bullets: up to 6 of \
           <= 90 chars}}, score {{value 0-100, rationale <= 240 chars}}, \
           image {{input_image_used, render_intent <= 200 chars}}.\n\
         - Cover at least two different angles. No duplicate hooks.\n\
         - Respect every offer constraint and risk flag note.\n\
         - Write in the brief's language and tone.\n\
         Output ONLY the JSON object.",
        context = context_section(context),
    )
}

/// Initial generation prompt for a v2 variant batch.
pub(crate) fn v2_generation_prompt(
    brief_json: &str,
    style_mode: StyleMode,
    brand_voice: Option<&str>,
    context: &[ContextDocument],
) -> String {
    let voice = brand_voice
        .map(|v| format!("\nBrand voice hints: {v}\n"))
        .unwrap_or_default();
    format!(
        "Generate a variant batch ({style_mode} mode) for the brief below.\n\n\
         Brief:\n{brief_json}{voice}{context}\n\n\
         Rules:\n\
         - Return a JSON object with fields: schema_version (\"2.0\"), \
           style_mode (\"{style_mode}\"), brand_voice (optional), variants \
           (array of {MIN_VARIANTS} to {MAX_VARIANTS} items).\n\
         - Each variant: platform (meta|tiktok|youtube_shorts|linkedin), \
           language, tone (raw|premium|direct|empathetic), hook, proof_type, \
           offer_type, on_screen_text (2-8 lines), script {{hook, problem, \
           proof, offer, cta}}, cta.\n\
         - Spread variants across platforms and tones. No duplicate hooks.\n\
         - Respect every offer constraint and risk flag note.\n\
         Output ONLY the JSON object.",
        context = context_section(context),
    )
}

/// Improve prompt referencing the prior output and its evaluation issues.
pub(crate) fn improve_prompt(prior_json: &str, issues: &[String], target: u8) -> String {
    let mut issue_list = String::new();
    for issue in issues {
        let _ = writeln!(issue_list, "- {issue}");
    }
    if issue_list.is_empty() {
        issue_list.push_str("- Overall quality below target; sharpen hooks and proof.\n");
    }
    format!(
        "The batch below scored under the target of {target}/100. Revise it \
         to fix the listed issues. Keep the same schema and the same brief. \
         Keep what already works; rewrite what doesn't.\n\n\
         Issues found by the grader:\n{issue_list}\n\
         Previous batch:\n{prior_json}\n\n\
         Output ONLY the revised JSON object."
    )
}

/// Evaluation prompt for a v1 batch.
pub(crate) fn v1_evaluation_prompt(
    brief_json: &str,
    output_json: &str,
    context: &[ContextDocument],
) -> String {
    format!(
        "Grade the following ad creative batch against its brief.\n\n\
         Brief:\n{brief_json}\n\n\
         Batch:\n{output_json}{context}\n\n\
         Judge the batch holistically: hook strength, message clarity, \
         angle coverage, offer handling, constraint compliance, and how far \
         the copy is from generic ad-speak.\n\
         Return a JSON object: {{\"satisfaction\": <integer 0-100>, \
         \"issues\": [<specific, actionable issue strings>]}}.\n\
         Output ONLY the JSON object.",
        context = context_section(context),
    )
}

/// Evaluation prompt for a v2 batch.
pub(crate) fn v2_evaluation_prompt(
    brief_json: &str,
    output_json: &str,
    context: &[ContextDocument],
) -> String {
    format!(
        "Grade the following variant batch against its brief.\n\n\
         Brief:\n{brief_json}\n\n\
         Batch:\n{output_json}{context}\n\n\
         Score each dimension 0-5: hook_power, clarity, proof, offer, \
         objection_handling, platform_fit, novelty. Set compliance_risk true \
         if any variant violates an offer constraint or risk flag note. Set \
         generic_output true if the batch reads like interchangeable \
         ad-speak.\n\
         Return a JSON object: {{\"scores\": {{<the seven dimensions>}}, \
         \"compliance_risk\": <bool>, \"generic_output\": <bool>, \
         \"issues\": [<specific issue strings>], \"weakest_dimensions\": \
         [<dimension names, weakest first>]}}.\n\
         Output ONLY the JSON object.",
        context = context_section(context),
    )
}

/// Coarse JSON-schema hint for v1 output, for providers with constrained
/// decoding.
pub(crate) fn v1_output_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "required": ["version", "brief", "creatives"],
        "properties": {
            "version": {"const": "1.0"},
            "brief": {"type": "object"},
            "creatives": {
                "type": "array",
                "minItems": MIN_CREATIVES,
                "maxItems": MAX_CREATIVES
            }
        }
    })
}

/// Coarse JSON-schema hint for v2 output.
pub(crate) fn v2_output_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "required": ["schema_version", "style_mode", "variants"],
        "properties": {
            "schema_version": {"const": "2.0"},
            "variants": {
                "type": "array",
                "minItems": MIN_VARIANTS,
                "maxItems": MAX_VARIANTS
            }
        }
    })
}

/// Coarse JSON-schema hint for a v1 evaluation.
pub(crate) fn v1_evaluation_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "required": ["satisfaction", "issues"],
        "properties": {
            "satisfaction": {"type": "integer", "minimum": 0, "maximum": 100},
            "issues": {"type": "array", "items": {"type": "string"}}
        }
    })
}

/// Coarse JSON-schema hint for a v2 evaluation.
pub(crate) fn v2_evaluation_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "required": ["scores", "compliance_risk", "generic_output", "issues"],
        "properties": {
            "scores": {"type": "object"},
            "compliance_risk": {"type": "boolean"},
            "generic_output": {"type": "boolean"},
            "issues": {"type": "array", "items": {"type": "string"}}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_interface::ContextKind;

    #[test]
    fn v1_prompt_embeds_brief_and_context() {
        let context = vec![ContextDocument::new(
            "strat-1",
            ContextKind::Strategy,
            "Q3 plan",
            "Lead with the ritual angle.",
        )];
        let prompt = v1_generation_prompt("{\"brand_name\": \"Lumen\"}", &context);
        assert!(prompt.contains("Lumen"));
        assert!(prompt.contains("ritual angle"));
        assert!(prompt.contains("ONLY the JSON object"));
    }

    #[test]
    fn improve_prompt_quotes_issues_and_prior_output() {
        let prompt = improve_prompt(
            "{\"version\": \"1.0\"}",
            &["hooks are interchangeable".to_string()],
            95,
        );
        assert!(prompt.contains("hooks are interchangeable"));
        assert!(prompt.contains("{\"version\": \"1.0\"}"));
        assert!(prompt.contains("95"));
    }

    #[test]
    fn improve_prompt_without_issues_still_directs() {
        let prompt = improve_prompt("{}", &[], 95);
        assert!(prompt.contains("sharpen hooks"));
    }

    #[test]
    fn v2_prompt_names_style_mode() {
        let prompt = v2_generation_prompt("{}", StyleMode::UgcScript, Some("dry humor"), &[]);
        assert!(prompt.contains("ugc_script"));
        assert!(prompt.contains("dry humor"));
    }
}

//! Deterministic fallback outputs.
//!
//! When the provider cannot produce a conforming document even after the
//! repair loop, the orchestrator substitutes a locally built batch derived
//! only from the brief. Given identical brief fields the result is
//! byte-for-byte identical across invocations — no randomness, no clocks.

use adforge_core::{
    Brief, CopyBlock, Creative, CreativeBatch, CreativeOutput, CreativeScore, ImageMeta,
    ScriptBlock, StyleMode, Variant, VariantBatch, VariantPlatform, VariantTone, MAX_CTA_CHARS,
    MAX_HOOK_CHARS, MAX_PRIMARY_TEXT_CHARS, MIN_VARIANTS,
};

/// Conservative self-score attached to fallback creatives.
const FALLBACK_SCORE: u8 = 40;

/// Build a fallback output matching the requested schema version.
pub fn fallback_output(brief: &Brief, style_mode: Option<StyleMode>) -> CreativeOutput {
    match style_mode {
        Some(mode) => CreativeOutput::V2(fallback_v2(brief, mode)),
        None => CreativeOutput::V1(fallback_v1(brief)),
    }
}

/// Deterministic v1 batch: one plain creative per angle, first two angles.
pub fn fallback_v1(brief: &Brief) -> CreativeBatch {
    let creatives = brief
        .angles
        .iter()
        .take(2)
        .enumerate()
        .map(|(i, angle)| Creative {
            id: format!("fallback-{}", i + 1),
            angle_id: angle.id.clone(),
            format: brief.format,
            copy: CopyBlock {
                hook: clip(
                    format!("{}: {}", brief.brand_name, angle.label),
                    MAX_HOOK_CHARS,
                ),
                primary_text: clip(
                    format!(
                        "{} — {}. Made for {}. {}",
                        brief.product.name,
                        angle.rationale,
                        brief.audience.summary,
                        brief
                            .offer
                            .summary
                            .as_deref()
                            .unwrap_or("Learn more today.")
                    ),
                    MAX_PRIMARY_TEXT_CHARS,
                ),
                cta: clip(default_cta(brief).to_string(), MAX_CTA_CHARS),
                bullets: Vec::new(),
            },
            score: CreativeScore {
                value: FALLBACK_SCORE,
                rationale: "Deterministic fallback built from brief fields".to_string(),
            },
            image: ImageMeta {
                input_image_used: false,
                render_intent: clip(
                    format!("Product-focused visual for {}", brief.product.name),
                    adforge_core::MAX_RENDER_INTENT_CHARS,
                ),
            },
        })
        .collect();

    CreativeBatch {
        version: "1.0".to_string(),
        brief: brief.clone(),
        creatives,
    }
}

/// Deterministic v2 batch: the minimum variant count, platforms and tones
/// assigned round-robin from fixed tables.
pub fn fallback_v2(brief: &Brief, style_mode: StyleMode) -> VariantBatch {
    const PLATFORMS: [VariantPlatform; 4] = [
        VariantPlatform::Meta,
        VariantPlatform::Tiktok,
        VariantPlatform::YoutubeShorts,
        VariantPlatform::Linkedin,
    ];
    const TONES: [VariantTone; 4] = [
        VariantTone::Direct,
        VariantTone::Raw,
        VariantTone::Premium,
        VariantTone::Empathetic,
    ];

    let variants = (0..MIN_VARIANTS)
        .map(|i| {
            let angle = &brief.angles[i % brief.angles.len()];
            let offer = brief
                .offer
                .summary
                .as_deref()
                .unwrap_or("Learn more today.");
            Variant {
                platform: PLATFORMS[i % PLATFORMS.len()],
                language: brief.language,
                tone: TONES[i % TONES.len()],
                hook: clip(
                    format!("{}. {} — {}", i + 1, angle.label, brief.product.name),
                    MAX_HOOK_CHARS,
                ),
                proof_type: "brand_statement".to_string(),
                offer_type: "direct_offer".to_string(),
                on_screen_text: vec![angle.label.clone(), offer.to_string()],
                script: ScriptBlock {
                    hook: angle.label.clone(),
                    problem: brief.audience.summary.clone(),
                    proof: angle.rationale.clone(),
                    offer: offer.to_string(),
                    cta: default_cta(brief).to_string(),
                },
                cta: clip(default_cta(brief).to_string(), MAX_CTA_CHARS),
            }
        })
        .collect();

    VariantBatch {
        schema_version: "2.0".to_string(),
        style_mode,
        brand_voice: None,
        variants,
        evaluation: None,
    }
}

fn default_cta(brief: &Brief) -> &'static str {
    match brief.goal {
        adforge_core::Goal::Sales => "Shop now",
        adforge_core::Goal::Leads => "Get your guide",
        adforge_core::Goal::Traffic => "Learn more",
        adforge_core::Goal::AppInstalls => "Get the app",
    }
}

fn clip(text: String, max: usize) -> String {
    if text.chars().count() > max {
        text.chars().take(max).collect()
    } else {
        text
    }
}

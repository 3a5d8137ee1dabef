//! Versioned creative output documents.
//!
//! Two schemas exist: [`CreativeBatch`] (v1, the standard generation path)
//! and [`VariantBatch`] (v2, the premium "variant" path). Both are explicit
//! variants of [`CreativeOutput`]; external JSON is never trusted until it
//! has passed through [`crate::parse_document`].
//!
//! The string length bounds here are content contracts, not cosmetic limits:
//! downstream ad platforms truncate or reject overlong copy.

use crate::brief::{AspectRatio, Brief, Language};
use crate::quality::DimensionEvaluation;
use crate::validate::{check_count, check_max_chars, check_non_empty, Validate, Violation};
use serde::{Deserialize, Serialize};

/// Maximum characters in a hook.
pub const MAX_HOOK_CHARS: usize = 80;
/// Maximum characters in primary text.
pub const MAX_PRIMARY_TEXT_CHARS: usize = 700;
/// Maximum characters in a call to action.
pub const MAX_CTA_CHARS: usize = 30;
/// Maximum bullet count per copy block.
pub const MAX_BULLETS: usize = 6;
/// Maximum characters per bullet.
pub const MAX_BULLET_CHARS: usize = 90;
/// Maximum characters in a score rationale.
pub const MAX_RATIONALE_CHARS: usize = 240;
/// Maximum characters in a render-intent description.
pub const MAX_RENDER_INTENT_CHARS: usize = 200;
/// Minimum creatives per v1 batch.
pub const MIN_CREATIVES: usize = 2;
/// Maximum creatives per v1 batch.
pub const MAX_CREATIVES: usize = 8;
/// Minimum variants per v2 batch.
pub const MIN_VARIANTS: usize = 6;
/// Maximum variants per v2 batch.
pub const MAX_VARIANTS: usize = 12;
/// Minimum on-screen text lines per variant.
pub const MIN_ON_SCREEN_LINES: usize = 2;
/// Maximum on-screen text lines per variant.
pub const MAX_ON_SCREEN_LINES: usize = 8;

/// The copy block of a single creative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyBlock {
    /// Attention hook, at most 80 chars
    pub hook: String,
    /// Main body copy, at most 700 chars
    pub primary_text: String,
    /// Call to action, at most 30 chars
    pub cta: String,
    /// Supporting bullets, at most 6 of 90 chars each
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// The model's own score for a creative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreativeScore {
    /// Score in [0, 100], clamped on deserialization
    #[serde(deserialize_with = "crate::quality::de_satisfaction")]
    pub value: u8,
    /// Why the score was given, at most 240 chars
    pub rationale: String,
}

/// Image rendering metadata for a creative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageMeta {
    /// Whether an uploaded input image was used
    pub input_image_used: bool,
    /// How the visual should be rendered, at most 200 chars
    pub render_intent: String,
}

/// One generated ad-copy candidate tied to a brief angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Creative {
    /// Stable identifier within the batch
    pub id: String,
    /// Must reference an angle declared in the source brief
    pub angle_id: String,
    /// Target placement format
    pub format: AspectRatio,
    /// The ad copy
    pub copy: CopyBlock,
    /// The model's self-assessment
    pub score: CreativeScore,
    /// Image rendering metadata
    pub image: ImageMeta,
}

/// Creative output, schema version 1.0.
///
/// Invariant: every `angle_id` in `creatives` exists in `brief.angles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreativeBatch {
    /// Format version tag, always "1.0"
    pub version: String,
    /// The brief this batch was generated from
    pub brief: Brief,
    /// Generated creatives, 2 to 8
    pub creatives: Vec<Creative>,
}

impl Validate for CreativeBatch {
    fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        if self.version != "1.0" {
            out.push(Violation::new(
                "version",
                format!("expected \"1.0\", got \"{}\"", self.version),
            ));
        }
        out.extend(self.brief.validate());
        check_count(
            "creatives",
            self.creatives.len(),
            MIN_CREATIVES,
            MAX_CREATIVES,
            &mut out,
        );
        for (i, creative) in self.creatives.iter().enumerate() {
            let at = |field: &str| format!("creatives[{}].{}", i, field);
            check_non_empty(&at("id"), &creative.id, &mut out);
            if !self.brief.has_angle(&creative.angle_id) {
                out.push(Violation::new(
                    at("angle_id"),
                    format!("'{}' not declared in brief.angles", creative.angle_id),
                ));
            }
            check_non_empty(&at("copy.hook"), &creative.copy.hook, &mut out);
            check_max_chars(&at("copy.hook"), &creative.copy.hook, MAX_HOOK_CHARS, &mut out);
            check_non_empty(&at("copy.primary_text"), &creative.copy.primary_text, &mut out);
            check_max_chars(
                &at("copy.primary_text"),
                &creative.copy.primary_text,
                MAX_PRIMARY_TEXT_CHARS,
                &mut out,
            );
            check_non_empty(&at("copy.cta"), &creative.copy.cta, &mut out);
            check_max_chars(&at("copy.cta"), &creative.copy.cta, MAX_CTA_CHARS, &mut out);
            check_count(
                &at("copy.bullets"),
                creative.copy.bullets.len(),
                0,
                MAX_BULLETS,
                &mut out,
            );
            for (j, bullet) in creative.copy.bullets.iter().enumerate() {
                check_max_chars(
                    &format!("creatives[{}].copy.bullets[{}]", i, j),
                    bullet,
                    MAX_BULLET_CHARS,
                    &mut out,
                );
            }
            check_max_chars(
                &at("score.rationale"),
                &creative.score.rationale,
                MAX_RATIONALE_CHARS,
                &mut out,
            );
            check_max_chars(
                &at("image.render_intent"),
                &creative.image.render_intent,
                MAX_RENDER_INTENT_CHARS,
                &mut out,
            );
        }
        out
    }
}

/// Style mode for the v2 generation path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StyleMode {
    /// Matrix of hooks across proof and offer types
    HookMatrix,
    /// Creator-style spoken scripts
    UgcScript,
    /// Broad asset-group coverage
    PerformanceMax,
}

/// Target platform for a v2 variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VariantPlatform {
    /// Facebook/Instagram
    Meta,
    /// TikTok
    Tiktok,
    /// YouTube Shorts
    YoutubeShorts,
    /// LinkedIn
    Linkedin,
}

/// Tone of a v2 variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VariantTone {
    /// Unpolished, native-feeling
    Raw,
    /// Elevated, aspirational
    Premium,
    /// Straight to the point
    Direct,
    /// Warm and understanding
    Empathetic,
}

/// Five-part script structure for a v2 variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptBlock {
    /// Opening hook line
    pub hook: String,
    /// Problem statement
    pub problem: String,
    /// Proof element
    pub proof: String,
    /// The offer
    pub offer: String,
    /// Closing call to action
    pub cta: String,
}

/// One v2 variant: a platform-specific scripted creative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variant {
    /// Target platform
    pub platform: VariantPlatform,
    /// Output language
    pub language: Language,
    /// Variant tone
    pub tone: VariantTone,
    /// Attention hook
    pub hook: String,
    /// Kind of proof used (e.g. "testimonial", "statistic")
    pub proof_type: String,
    /// Kind of offer used (e.g. "discount", "free_trial")
    pub offer_type: String,
    /// On-screen text lines, 2 to 8
    pub on_screen_text: Vec<String>,
    /// Five-part script
    pub script: ScriptBlock,
    /// Call to action
    pub cta: String,
}

/// Creative output, schema version 2.0 ("variant" mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantBatch {
    /// Schema version tag, always "2.0"
    pub schema_version: String,
    /// Style mode used for generation
    pub style_mode: StyleMode,
    /// Brand voice hints carried through generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_voice: Option<String>,
    /// Generated variants, 6 to 12
    pub variants: Vec<Variant>,
    /// Quality evaluation, filled by the evaluator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<DimensionEvaluation>,
}

impl Validate for VariantBatch {
    fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        if self.schema_version != "2.0" {
            out.push(Violation::new(
                "schema_version",
                format!("expected \"2.0\", got \"{}\"", self.schema_version),
            ));
        }
        check_count(
            "variants",
            self.variants.len(),
            MIN_VARIANTS,
            MAX_VARIANTS,
            &mut out,
        );
        for (i, variant) in self.variants.iter().enumerate() {
            let at = |field: &str| format!("variants[{}].{}", i, field);
            check_non_empty(&at("hook"), &variant.hook, &mut out);
            check_non_empty(&at("proof_type"), &variant.proof_type, &mut out);
            check_non_empty(&at("offer_type"), &variant.offer_type, &mut out);
            check_non_empty(&at("cta"), &variant.cta, &mut out);
            check_count(
                &at("on_screen_text"),
                variant.on_screen_text.len(),
                MIN_ON_SCREEN_LINES,
                MAX_ON_SCREEN_LINES,
                &mut out,
            );
            check_non_empty(&at("script.hook"), &variant.script.hook, &mut out);
            check_non_empty(&at("script.problem"), &variant.script.problem, &mut out);
            check_non_empty(&at("script.proof"), &variant.script.proof, &mut out);
            check_non_empty(&at("script.offer"), &variant.script.offer, &mut out);
            check_non_empty(&at("script.cta"), &variant.script.cta, &mut out);
        }
        out
    }
}

/// A versioned creative output document.
///
/// Serialized form is distinguished by the version tag fields (`version` for
/// v1, `schema_version` for v2); `deny_unknown_fields` on both variants makes
/// the untagged representation unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreativeOutput {
    /// Schema version 1.0
    V1(CreativeBatch),
    /// Schema version 2.0
    V2(VariantBatch),
}

impl CreativeOutput {
    /// The schema version tag of this document.
    pub fn version(&self) -> &str {
        match self {
            Self::V1(batch) => &batch.version,
            Self::V2(batch) => &batch.schema_version,
        }
    }

    /// Number of creatives/variants in the batch.
    pub fn candidate_count(&self) -> usize {
        match self {
            Self::V1(batch) => batch.creatives.len(),
            Self::V2(batch) => batch.variants.len(),
        }
    }
}

impl Validate for CreativeOutput {
    fn validate(&self) -> Vec<Violation> {
        match self {
            Self::V1(batch) => batch.validate(),
            Self::V2(batch) => batch.validate(),
        }
    }
}

//! Deterministic normalization of loose client input into a [`Brief`].
//!
//! Clients may submit a full structured brief or a flatter form-style
//! payload. Normalization fills enum defaults and synthesizes the minimum
//! angle set when none was provided — deterministically, so the same input
//! always yields the same brief.

use adforge_core::{
    Angle, AspectRatio, Audience, Brief, FunnelStage, Goal, Language, Offer, Product, ToneOfVoice,
};
use serde::{Deserialize, Serialize};

/// A loose angle as submitted by a client form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAngle {
    /// Stable identifier; generated from the label position when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Short label
    pub label: String,
    /// Rationale; defaults to the label when absent
    #[serde(default)]
    pub rationale: Option<String>,
}

/// Flat form-style brief input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBriefInput {
    /// Brand name
    pub brand_name: String,
    /// Product name
    pub product_name: String,
    /// Landing page URL
    #[serde(default)]
    pub product_url: Option<String>,
    /// Product category
    #[serde(default)]
    pub product_category: Option<String>,
    /// Campaign goal; defaults to sales
    #[serde(default)]
    pub goal: Option<Goal>,
    /// Funnel stage; defaults to cold
    #[serde(default)]
    pub funnel_stage: Option<FunnelStage>,
    /// Output language; defaults to English
    #[serde(default)]
    pub language: Option<Language>,
    /// Placement format; defaults to 4:5
    #[serde(default)]
    pub format: Option<AspectRatio>,
    /// Audience description
    pub audience_summary: String,
    /// Audience segments; defaults to the summary as a single segment
    #[serde(default)]
    pub segments: Vec<String>,
    /// Offer summary
    #[serde(default)]
    pub offer_summary: Option<String>,
    /// Offer constraints
    #[serde(default)]
    pub offer_constraints: Vec<String>,
    /// Tone; defaults to direct
    #[serde(default)]
    pub tone: Option<ToneOfVoice>,
    /// Angles; two defaults are synthesized when absent
    #[serde(default)]
    pub angles: Vec<RawAngle>,
}

/// Build a full [`Brief`] from loose input, filling deterministic defaults.
pub fn normalize_brief(raw: RawBriefInput) -> Brief {
    let segments = if raw.segments.is_empty() {
        vec![raw.audience_summary.clone()]
    } else {
        raw.segments
    };

    let angles: Vec<Angle> = if raw.angles.len() >= 2 {
        raw.angles
            .into_iter()
            .enumerate()
            .map(|(i, raw_angle)| Angle {
                id: raw_angle.id.unwrap_or_else(|| format!("angle-{}", i + 1)),
                rationale: raw_angle
                    .rationale
                    .unwrap_or_else(|| raw_angle.label.clone()),
                label: raw_angle.label,
            })
            .collect()
    } else {
        // Fewer than two angles supplied: synthesize the default pair.
        vec![
            Angle {
                id: "benefit-first".to_string(),
                label: format!("What {} does for you", raw.product_name),
                rationale: "Leads with the primary benefit for the stated audience".to_string(),
            },
            Angle {
                id: "problem-first".to_string(),
                label: "The problem you stopped noticing".to_string(),
                rationale: "Names the audience's pain before introducing the product".to_string(),
            },
        ]
    };

    Brief {
        brand_name: raw.brand_name,
        product: Product {
            name: raw.product_name,
            url: raw.product_url,
            category: raw.product_category,
        },
        goal: raw.goal.unwrap_or(Goal::Sales),
        funnel_stage: raw.funnel_stage.unwrap_or(FunnelStage::Cold),
        language: raw.language.unwrap_or(Language::En),
        format: raw.format.unwrap_or(AspectRatio::Portrait),
        audience: Audience {
            summary: raw.audience_summary,
            segments,
        },
        offer: Offer {
            summary: raw.offer_summary,
            constraints: raw.offer_constraints,
        },
        tone: raw.tone.unwrap_or(ToneOfVoice::Direct),
        angles,
        risk_flags: Vec::new(),
    }
}

//! The normalized creative brief.
//!
//! A [`Brief`] is created once per generation request, validated on entry,
//! and immutable thereafter. Every creative output references (but does not
//! own) the brief it was generated from.

use crate::validate::{check_count, check_non_empty, Validate, Violation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Campaign goal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Goal {
    /// Drive purchases
    Sales,
    /// Collect lead contacts
    Leads,
    /// Drive site traffic
    Traffic,
    /// Drive app installs
    AppInstalls,
}

/// Funnel stage of the target audience.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FunnelStage {
    /// No prior brand contact
    Cold,
    /// Aware but not converted
    Warm,
    /// Ready to act
    Hot,
}

/// Output language for generated copy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// German
    De,
    /// English
    En,
}

/// Target placement aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum AspectRatio {
    /// Feed square
    #[serde(rename = "1:1")]
    #[strum(serialize = "1:1")]
    Square,
    /// Feed portrait
    #[serde(rename = "4:5")]
    #[strum(serialize = "4:5")]
    Portrait,
    /// Story/Reel vertical
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    Vertical,
}

/// Tone of voice for generated copy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToneOfVoice {
    /// Straight to the point
    Direct,
    /// Light and humorous
    Playful,
    /// Elevated, aspirational
    Premium,
    /// Warm and understanding
    Empathetic,
    /// Loud, confident claims
    Bold,
    /// Sparse, understated
    Minimal,
}

/// Severity of a declared risk flag.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskSeverity {
    /// Informational
    Low,
    /// Needs review
    Medium,
    /// Must be addressed
    High,
}

/// The product being advertised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    /// Product name
    pub name: String,
    /// Landing page URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Product category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Target audience description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Audience {
    /// Free-text audience summary
    pub summary: String,
    /// Ordered audience segments, at least one
    pub segments: Vec<String>,
}

/// Offer details and constraints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Offer {
    /// Free-text offer summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Hard constraints the copy must respect (e.g. "no discount wording")
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// A distinct persuasive framing creatives may be generated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Angle {
    /// Stable identifier referenced by creatives
    pub id: String,
    /// Short human-readable label
    pub label: String,
    /// Why this angle should work for this audience
    pub rationale: String,
}

/// A declared compliance or brand risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskFlag {
    /// Risk category (e.g. "health_claim", "before_after")
    #[serde(rename = "type")]
    pub kind: String,
    /// How serious the risk is
    pub severity: RiskSeverity,
    /// What to watch for
    pub note: String,
}

/// Normalized creative input for one generation request.
///
/// Invariants: at least 2 angles, at least 1 audience segment. Enforced by
/// [`Validate`]; a brief that fails validation is rejected at the pipeline
/// entry with a client error. Created once per request, immutable
/// thereafter, and referenced (not owned) by every output generated from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Brief {
    /// Brand name
    pub brand_name: String,
    /// The product being advertised
    pub product: Product,
    /// Campaign goal
    pub goal: Goal,
    /// Funnel stage of the target audience
    pub funnel_stage: FunnelStage,
    /// Output language
    pub language: Language,
    /// Target placement format
    pub format: AspectRatio,
    /// Target audience
    pub audience: Audience,
    /// Offer details
    #[serde(default)]
    pub offer: Offer,
    /// Tone of voice
    pub tone: ToneOfVoice,
    /// Persuasive angles, at least two
    pub angles: Vec<Angle>,
    /// Declared risks
    #[serde(default)]
    pub risk_flags: Vec<RiskFlag>,
}

impl Brief {
    /// Whether `angle_id` names one of this brief's angles.
    pub fn has_angle(&self, angle_id: &str) -> bool {
        self.angles.iter().any(|a| a.id == angle_id)
    }
}

impl Validate for Brief {
    fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        check_non_empty("brand_name", &self.brand_name, &mut out);
        check_non_empty("product.name", &self.product.name, &mut out);
        check_non_empty("audience.summary", &self.audience.summary, &mut out);
        check_count(
            "audience.segments",
            self.audience.segments.len(),
            1,
            usize::MAX,
            &mut out,
        );
        for (i, segment) in self.audience.segments.iter().enumerate() {
            check_non_empty(&format!("audience.segments[{}]", i), segment, &mut out);
        }
        check_count("angles", self.angles.len(), 2, usize::MAX, &mut out);
        let mut seen = HashSet::new();
        for (i, angle) in self.angles.iter().enumerate() {
            check_non_empty(&format!("angles[{}].id", i), &angle.id, &mut out);
            check_non_empty(&format!("angles[{}].label", i), &angle.label, &mut out);
            if !seen.insert(angle.id.as_str()) {
                out.push(Violation::new(
                    format!("angles[{}].id", i),
                    format!("duplicate angle id '{}'", angle.id),
                ));
            }
        }
        for (i, flag) in self.risk_flags.iter().enumerate() {
            check_non_empty(&format!("risk_flags[{}].type", i), &flag.kind, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ensure_valid;

    fn sample_brief() -> Brief {
        serde_json::from_str(include_str!("../testdata/brief.json")).unwrap()
    }

    #[test]
    fn sample_brief_is_valid() {
        assert!(ensure_valid(&sample_brief()).is_ok());
    }

    #[test]
    fn brief_requires_two_angles() {
        let mut brief = sample_brief();
        brief.angles.truncate(1);
        let violations = brief.validate();
        assert!(violations.iter().any(|v| v.path == "angles"));
    }

    #[test]
    fn brief_requires_audience_segment() {
        let mut brief = sample_brief();
        brief.audience.segments.clear();
        let violations = brief.validate();
        assert!(violations.iter().any(|v| v.path == "audience.segments"));
    }

    #[test]
    fn duplicate_angle_ids_are_rejected() {
        let mut brief = sample_brief();
        let duplicate = brief.angles[0].clone();
        brief.angles.push(duplicate);
        let violations = brief.validate();
        assert!(violations.iter().any(|v| v.constraint.contains("duplicate")));
    }

    #[test]
    fn aspect_ratio_serializes_as_ratio_string() {
        let json = serde_json::to_string(&AspectRatio::Vertical).unwrap();
        assert_eq!(json, "\"9:16\"");
    }

    #[test]
    fn unknown_brief_fields_are_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_str(include_str!("../testdata/brief.json")).unwrap();
        value["surprise"] = serde_json::json!(true);
        let result: Result<Brief, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }
}

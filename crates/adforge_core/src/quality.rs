//! Quality evaluation artifacts.
//!
//! The quality evaluator produces a judgment artifact, never a mutation of
//! the creative batch it judged. Two shapes exist: the v1 holistic
//! satisfaction score and the v2 per-dimension scorecard with kill flags.

use crate::validate::{Validate, Violation};
use serde::{Deserialize, Deserializer, Serialize};

/// Clamp a raw satisfaction value into `[0, 100]`.
///
/// Idempotent for in-range values.
///
/// # Examples
///
/// ```
/// use adforge_core::clamp_satisfaction;
///
/// assert_eq!(clamp_satisfaction(150), 100);
/// assert_eq!(clamp_satisfaction(-10), 0);
/// assert_eq!(clamp_satisfaction(73), 73);
/// ```
pub fn clamp_satisfaction(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// Clamp a raw dimension subscore into `[0, 5]`.
pub fn clamp_dimension(value: i64) -> u8 {
    value.clamp(0, 5) as u8
}

/// Deserialize a satisfaction score, rounding and clamping out-of-range input
/// instead of rejecting it.
pub(crate) fn de_satisfaction<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_satisfaction(raw.round() as i64))
}

/// Deserialize a dimension subscore, rounding and clamping out-of-range input.
pub(crate) fn de_dimension<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_dimension(raw.round() as i64))
}

/// Holistic v1 quality evaluation: one satisfaction score plus issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchEvaluation {
    /// Overall satisfaction in [0, 100], clamped on deserialization
    #[serde(deserialize_with = "de_satisfaction")]
    pub satisfaction: u8,
    /// Concrete issues holding the batch below target
    #[serde(default)]
    pub issues: Vec<String>,
}

impl Validate for BatchEvaluation {
    fn validate(&self) -> Vec<Violation> {
        // Clamping on deserialization already guarantees the range.
        Vec::new()
    }
}

/// The seven scored dimensions of a v2 evaluation, each in [0, 5].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionScores {
    /// Stopping power of the hooks
    #[serde(deserialize_with = "de_dimension")]
    pub hook_power: u8,
    /// Clarity of the message
    #[serde(deserialize_with = "de_dimension")]
    pub clarity: u8,
    /// Strength of the proof elements
    #[serde(deserialize_with = "de_dimension")]
    pub proof: u8,
    /// Attractiveness of the offer framing
    #[serde(deserialize_with = "de_dimension")]
    pub offer: u8,
    /// How well objections are pre-empted
    #[serde(deserialize_with = "de_dimension")]
    pub objection_handling: u8,
    /// Fit with the target platform's native format
    #[serde(deserialize_with = "de_dimension")]
    pub platform_fit: u8,
    /// Distance from generic ad-speak
    #[serde(deserialize_with = "de_dimension")]
    pub novelty: u8,
}

/// Maximum possible dimension sum (7 dimensions, 5 points each).
const DIMENSION_SUM_MAX: u16 = 35;

impl DimensionScores {
    /// Sum of all seven subscores.
    pub fn sum(&self) -> u16 {
        [
            self.hook_power,
            self.clarity,
            self.proof,
            self.offer,
            self.objection_handling,
            self.platform_fit,
            self.novelty,
        ]
        .iter()
        .map(|&s| s as u16)
        .sum()
    }

    /// Dimension names paired with their scores.
    pub fn as_pairs(&self) -> [(&'static str, u8); 7] {
        [
            ("hook_power", self.hook_power),
            ("clarity", self.clarity),
            ("proof", self.proof),
            ("offer", self.offer),
            ("objection_handling", self.objection_handling),
            ("platform_fit", self.platform_fit),
            ("novelty", self.novelty),
        ]
    }
}

/// Per-dimension v2 quality evaluation with kill flags.
///
/// A true kill flag disqualifies the candidate regardless of its numeric
/// score; the orchestrator must never select a killed candidate as best.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionEvaluation {
    /// The seven scored dimensions
    pub scores: DimensionScores,
    /// Compliance kill flag
    pub compliance_risk: bool,
    /// Genericness kill flag
    pub generic_output: bool,
    /// Concrete issues holding the batch below target
    #[serde(default)]
    pub issues: Vec<String>,
    /// Weakest dimensions as reported by the evaluator, weakest first
    #[serde(default)]
    pub weakest_dimensions: Vec<String>,
}

impl DimensionEvaluation {
    /// Overall satisfaction mapped to [0, 100]: the dimension sum scaled by
    /// 100/35 and rounded. Kill flags do not change this number; use
    /// [`Self::killed`] for selection decisions.
    pub fn satisfaction(&self) -> u8 {
        let scaled = f64::from(self.scores.sum()) / f64::from(DIMENSION_SUM_MAX) * 100.0;
        clamp_satisfaction(scaled.round() as i64)
    }

    /// Whether either kill flag disqualifies this candidate.
    pub fn killed(&self) -> bool {
        self.compliance_risk || self.generic_output
    }

    /// Dimensions ranked weakest first, computed from the scores. Used to
    /// backfill `weakest_dimensions` when the evaluator omits it.
    pub fn ranked_weakest(&self) -> Vec<&'static str> {
        let mut pairs = self.scores.as_pairs();
        pairs.sort_by_key(|&(_, score)| score);
        pairs.iter().take(3).map(|&(name, _)| name).collect()
    }
}

impl Validate for DimensionEvaluation {
    fn validate(&self) -> Vec<Violation> {
        // Subscores are clamped on deserialization; nothing further to check.
        Vec::new()
    }
}

/// A quality judgment in either schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualityEvaluation {
    /// Per-dimension v2 scorecard
    V2(DimensionEvaluation),
    /// Holistic v1 score
    V1(BatchEvaluation),
}

impl QualityEvaluation {
    /// Overall satisfaction in [0, 100].
    pub fn satisfaction(&self) -> u8 {
        match self {
            Self::V1(eval) => eval.satisfaction,
            Self::V2(eval) => eval.satisfaction(),
        }
    }

    /// Issues reported by the evaluator.
    pub fn issues(&self) -> &[String] {
        match self {
            Self::V1(eval) => &eval.issues,
            Self::V2(eval) => &eval.issues,
        }
    }

    /// Whether a kill flag disqualifies the candidate (always false for v1).
    pub fn killed(&self) -> bool {
        match self {
            Self::V1(_) => false,
            Self::V2(eval) => eval.killed(),
        }
    }

    /// Score used for best-candidate comparison: the satisfaction, forced to
    /// 0 when a kill flag is set.
    pub fn selection_score(&self) -> u8 {
        if self.killed() {
            0
        } else {
            self.satisfaction()
        }
    }
}

impl Validate for QualityEvaluation {
    fn validate(&self) -> Vec<Violation> {
        match self {
            Self::V1(eval) => eval.validate(),
            Self::V2(eval) => eval.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [u8; 7]) -> DimensionScores {
        DimensionScores {
            hook_power: values[0],
            clarity: values[1],
            proof: values[2],
            offer: values[3],
            objection_handling: values[4],
            platform_fit: values[5],
            novelty: values[6],
        }
    }

    #[test]
    fn clamp_is_idempotent_in_range() {
        for v in 0..=100 {
            assert_eq!(clamp_satisfaction(v), v as u8);
            assert_eq!(clamp_satisfaction(clamp_satisfaction(v) as i64), v as u8);
        }
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_satisfaction(150), 100);
        assert_eq!(clamp_satisfaction(-10), 0);
        assert_eq!(clamp_dimension(9), 5);
        assert_eq!(clamp_dimension(-1), 0);
    }

    #[test]
    fn satisfaction_deserialization_clamps() {
        let eval: BatchEvaluation =
            serde_json::from_str(r#"{"satisfaction": 180, "issues": []}"#).unwrap();
        assert_eq!(eval.satisfaction, 100);
        let eval: BatchEvaluation =
            serde_json::from_str(r#"{"satisfaction": -4, "issues": []}"#).unwrap();
        assert_eq!(eval.satisfaction, 0);
    }

    #[test]
    fn dimension_sum_maps_to_hundred_scale() {
        let full = DimensionEvaluation {
            scores: scores([5; 7]),
            compliance_risk: false,
            generic_output: false,
            issues: vec![],
            weakest_dimensions: vec![],
        };
        assert_eq!(full.satisfaction(), 100);

        let partial = DimensionEvaluation {
            scores: scores([3; 7]),
            compliance_risk: false,
            generic_output: false,
            issues: vec![],
            weakest_dimensions: vec![],
        };
        // 21/35 * 100 = 60
        assert_eq!(partial.satisfaction(), 60);
    }

    #[test]
    fn kill_flag_forces_selection_score_to_zero() {
        let eval = QualityEvaluation::V2(DimensionEvaluation {
            scores: scores([5; 7]),
            compliance_risk: true,
            generic_output: false,
            issues: vec!["implies a medical claim".to_string()],
            weakest_dimensions: vec![],
        });
        assert_eq!(eval.satisfaction(), 100);
        assert!(eval.killed());
        assert_eq!(eval.selection_score(), 0);
    }

    #[test]
    fn ranked_weakest_orders_ascending() {
        let eval = DimensionEvaluation {
            scores: scores([5, 1, 4, 2, 5, 5, 3]),
            compliance_risk: false,
            generic_output: false,
            issues: vec![],
            weakest_dimensions: vec![],
        };
        assert_eq!(eval.ranked_weakest(), vec!["clarity", "offer", "novelty"]);
    }

    #[test]
    fn untagged_evaluation_distinguishes_versions() {
        let v1: QualityEvaluation =
            serde_json::from_str(r#"{"satisfaction": 80, "issues": ["weak CTA"]}"#).unwrap();
        assert!(matches!(v1, QualityEvaluation::V1(_)));

        let v2_json = r#"{
            "scores": {"hook_power": 4, "clarity": 4, "proof": 3, "offer": 4,
                       "objection_handling": 3, "platform_fit": 5, "novelty": 2},
            "compliance_risk": false,
            "generic_output": false,
            "issues": []
        }"#;
        let v2: QualityEvaluation = serde_json::from_str(v2_json).unwrap();
        assert!(matches!(v2, QualityEvaluation::V2(_)));
        assert_eq!(v2.satisfaction(), 71); // 25/35*100 = 71.4 -> 71
    }
}

//! # Drift Data Models
//!
//! Report and classification types produced by the drift scorer and the
//! severity classifier.
//!
//! Categorical fields are closed enums so consumers must handle every
//! state; severity and ethical tags are ordered so `>=` comparisons work.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::vector::VectorError;

/// Slack applied when comparing computed values against thresholds, so a
/// value whose exact decimal result sits on a threshold lands on the same
/// side as the exact result.
pub const THRESHOLD_TOLERANCE: f64 = 1e-9;

/// Direction of change of a nominated dimension group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    /// Mean delta above the positive threshold.
    Increase,
    /// Mean delta below the negative threshold.
    Decrease,
    /// Mean delta within the threshold band.
    Stable,
}

impl Shift {
    /// Classifies a signed delta against a symmetric threshold.
    pub fn from_delta(delta: f64, threshold: f64) -> Self {
        if delta > threshold + THRESHOLD_TOLERANCE {
            Shift::Increase
        } else if delta < -(threshold + THRESHOLD_TOLERANCE) {
            Shift::Decrease
        } else {
            Shift::Stable
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Increase => write!(f, "increase"),
            Shift::Decrease => write!(f, "decrease"),
            Shift::Stable => write!(f, "stable"),
        }
    }
}

/// Severity band of a drift magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    /// Below the moderate threshold.
    Low,
    /// Between the moderate and high thresholds.
    Moderate,
    /// At or above the high threshold.
    High,
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityBand::Low => write!(f, "low"),
            SeverityBand::Moderate => write!(f, "moderate"),
            SeverityBand::High => write!(f, "high"),
        }
    }
}

/// Risk label attached to drift on normative dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EthicalTag {
    /// No normative dimension moved past the moderate threshold.
    None,
    /// A normative dimension moved past the moderate threshold.
    BiasRisk,
    /// A normative dimension moved past the high threshold.
    EthicallyRelevant,
}

impl fmt::Display for EthicalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EthicalTag::None => write!(f, "none"),
            EthicalTag::BiasRisk => write!(f, "bias_risk"),
            EthicalTag::EthicallyRelevant => write!(f, "ethically_relevant"),
        }
    }
}

/// Weighting between textual change and score change.
///
/// `severity = text * (1 - similarity) + scores * mean(|delta|)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftWeights {
    /// Weight of `1 - text_similarity`.
    pub text: f64,
    /// Weight of the mean absolute score delta.
    pub scores: f64,
}

impl DriftWeights {
    /// Creates a weighting pair.
    pub const fn new(text: f64, scores: f64) -> Self {
        Self { text, scores }
    }
}

impl Default for DriftWeights {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

/// Time span covered by a drift report built from two periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Label of the earlier period.
    pub from_label: String,
    /// Timestamp of the earlier period.
    pub from: DateTime<Utc>,
    /// Label of the later period.
    pub to_label: String,
    /// Timestamp of the later period.
    pub to: DateTime<Utc>,
}

/// Band and ethical tag for one drift report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Severity band of the severity index.
    pub band: SeverityBand,
    /// Ethical tag derived from normative deltas.
    pub ethical_tag: EthicalTag,
}

/// Change of one agent's answer between two snapshots.
///
/// # Example
///
/// ```rust
/// use agora_drift::{DriftReport, SeverityBand};
///
/// let report = DriftReport::default();
/// assert_eq!(report.band, SeverityBand::Low);
/// assert_eq!(report.severity_index, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Signed `current - previous` per dimension, in configured order.
    pub per_dimension_delta: IndexMap<String, f64>,
    /// Aggregate change in `[0, 1]`.
    pub severity_index: f64,
    /// Band of `severity_index`.
    pub band: SeverityBand,
    /// Shift of the sentiment dimensions.
    pub sentiment_shift: Shift,
    /// Shift of the ideology dimensions.
    pub ideology_shift: Shift,
    /// Risk label from normative dimensions.
    pub ethical_tag: EthicalTag,
    /// Themes supplied by the NLP backend, copied unchanged.
    #[serde(default)]
    pub dominant_themes: Vec<String>,
    /// Explainability notes supplied by the NLP backend, copied unchanged.
    #[serde(default)]
    pub explainability_delta: Vec<String>,
    /// Periods the report was computed between, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
}

impl Default for DriftReport {
    fn default() -> Self {
        Self {
            per_dimension_delta: IndexMap::new(),
            severity_index: 0.0,
            band: SeverityBand::Low,
            sentiment_shift: Shift::Stable,
            ideology_shift: Shift::Stable,
            ethical_tag: EthicalTag::None,
            dominant_themes: Vec::new(),
            explainability_delta: Vec::new(),
            window: None,
        }
    }
}

impl DriftReport {
    /// Band and ethical tag of this report.
    pub fn classification(&self) -> Classification {
        Classification {
            band: self.band,
            ethical_tag: self.ethical_tag,
        }
    }

    /// Dimension with the largest absolute delta, if any.
    pub fn largest_change(&self) -> Option<(&str, f64)> {
        self.per_dimension_delta
            .iter()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(name, delta)| (name.as_str(), *delta))
    }
}

/// Errors that can occur while configuring or running the drift scorer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriftError {
    /// Dimension or value validation failed.
    #[error(transparent)]
    Vector(#[from] VectorError),

    /// Scorer or classifier configuration is inconsistent.
    #[error("invalid drift configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for drift operations.
pub type Result<T> = std::result::Result<T, DriftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_band_ordering() {
        assert!(SeverityBand::Low < SeverityBand::Moderate);
        assert!(SeverityBand::Moderate < SeverityBand::High);
    }

    #[test]
    fn test_ethical_tag_ordering() {
        assert!(EthicalTag::None < EthicalTag::BiasRisk);
        assert!(EthicalTag::BiasRisk < EthicalTag::EthicallyRelevant);
    }

    #[test]
    fn test_shift_from_delta() {
        assert_eq!(Shift::from_delta(0.25, 0.1), Shift::Increase);
        assert_eq!(Shift::from_delta(-0.25, 0.1), Shift::Decrease);
        assert_eq!(Shift::from_delta(0.1, 0.1), Shift::Stable);
        assert_eq!(Shift::from_delta(-0.1, 0.1), Shift::Stable);
    }

    #[test]
    fn test_enum_serialization() {
        assert_eq!(
            serde_json::to_string(&EthicalTag::EthicallyRelevant).unwrap(),
            "\"ethically_relevant\""
        );
        assert_eq!(serde_json::to_string(&SeverityBand::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&Shift::Stable).unwrap(), "\"stable\"");
    }

    #[test]
    fn test_default_weights() {
        let w = DriftWeights::default();
        assert_eq!((w.text, w.scores), (0.5, 0.5));
    }

    #[test]
    fn test_largest_change() {
        let mut report = DriftReport::default();
        report.per_dimension_delta.insert("pos".to_string(), 0.2);
        report.per_dimension_delta.insert("norm".to_string(), -0.5);

        assert_eq!(report.largest_change(), Some(("norm", -0.5)));
    }

    #[test]
    fn test_error_display() {
        let err = DriftError::InvalidConfig("weights must be finite".to_string());
        assert!(err.to_string().contains("weights must be finite"));

        let err: DriftError = VectorError::EmptyDimensions.into();
        assert_eq!(err.to_string(), "dimension set is empty");
    }
}

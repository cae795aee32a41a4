//! # Answer Drift Scoring
//!
//! Measures how much one agent's answer changed between two snapshots.
//!
//! ## Computation
//!
//! For every configured dimension `d`:
//!
//! ```text
//! delta[d]       = current[d] - previous[d]
//! severity_index = clamp01(w_text * (1 - similarity) + w_scores * mean(|delta|))
//! ```
//!
//! Sentiment and ideology shifts are the mean delta of their nominated
//! dimensions, thresholded symmetrically (default 0.1). The result is then
//! classified by the [`SeverityClassifier`].
//!
//! Text similarity, dominant themes and explainability notes come from an
//! external NLP backend; this module only consumes them.
//!
//! ## Failure Modes
//!
//! Scoring is all-or-nothing: if the two vectors disagree on their
//! dimensions, [`VectorError::DimensionMismatch`](crate::VectorError::DimensionMismatch)
//! is returned and no partial report is produced.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{DriftError, DriftReport, DriftWeights, Result, Shift, TimeWindow};
use crate::severity::{SeverityClassifier, SeverityConfig};
use crate::vector::{clamp_unit, DimensionSet, Outcome, Period, ScoreVector};

/// Configuration of a [`DriftScorer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Dimensions every compared vector must cover.
    pub dimensions: DimensionSet,
    /// Default weighting, used when an input carries none.
    #[serde(default)]
    pub weights: DriftWeights,
    /// Symmetric threshold for sentiment and ideology shifts.
    #[serde(default = "default_shift_threshold")]
    pub shift_threshold: f64,
    /// Dimensions whose mean delta drives `sentiment_shift`.
    #[serde(default)]
    pub sentiment_dimensions: Vec<String>,
    /// Dimensions whose mean delta drives `ideology_shift`.
    #[serde(default)]
    pub ideology_dimensions: Vec<String>,
    /// Band and ethical classification settings.
    #[serde(default)]
    pub severity: SeverityConfig,
}

fn default_shift_threshold() -> f64 {
    0.1
}

impl DriftConfig {
    /// Creates a config over `dimensions` with default weights and
    /// thresholds and no nominated dimension groups.
    pub fn new(dimensions: DimensionSet) -> Self {
        Self {
            dimensions,
            weights: DriftWeights::default(),
            shift_threshold: default_shift_threshold(),
            sentiment_dimensions: Vec::new(),
            ideology_dimensions: Vec::new(),
            severity: SeverityConfig {
                normative_dimensions: Vec::new(),
                ..SeverityConfig::default()
            },
        }
    }

    /// Sets the default weights.
    pub fn with_weights(mut self, weights: DriftWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the shift threshold.
    pub fn with_shift_threshold(mut self, threshold: f64) -> Self {
        self.shift_threshold = threshold;
        self
    }

    /// Sets the sentiment dimensions.
    pub fn with_sentiment<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.sentiment_dimensions = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the ideology dimensions.
    pub fn with_ideology<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.ideology_dimensions = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the normative dimensions used for ethical tagging.
    pub fn with_normative<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.severity.normative_dimensions = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the severity configuration.
    pub fn with_severity(mut self, severity: SeverityConfig) -> Self {
        self.severity = severity;
        self
    }

    /// Checks that nominated dimensions are configured and that weights and
    /// thresholds are usable.
    pub fn validate(&self) -> Result<()> {
        self.dimensions.require_all(&self.sentiment_dimensions)?;
        self.dimensions.require_all(&self.ideology_dimensions)?;
        self.dimensions
            .require_all(&self.severity.normative_dimensions)?;

        let w = self.weights;
        if !(w.text.is_finite() && w.scores.is_finite()) || w.text < 0.0 || w.scores < 0.0 {
            return Err(DriftError::InvalidConfig(format!(
                "weights must be finite and non-negative (text = {}, scores = {})",
                w.text, w.scores
            )));
        }
        if !(0.0..1.0).contains(&self.shift_threshold) {
            return Err(DriftError::InvalidConfig(format!(
                "shift threshold {} must lie in [0, 1)",
                self.shift_threshold
            )));
        }
        self.severity.bands.validate("severity band")?;
        self.severity.ethical.validate("ethical")?;
        Ok(())
    }
}

/// One drift computation request.
///
/// # Example
///
/// ```rust
/// use agora_drift::{DriftInput, DriftWeights, ScoreVector};
///
/// let input = DriftInput::new(
///     ScoreVector::from_pairs([("pos", 0.3)]),
///     ScoreVector::from_pairs([("pos", 0.7)]),
///     0.2,
/// )
/// .with_weights(DriftWeights::new(0.6, 0.4))
/// .with_themes(vec!["climate".to_string()]);
///
/// assert_eq!(input.dominant_themes.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftInput {
    /// Earlier snapshot.
    pub previous: ScoreVector,
    /// Later snapshot.
    pub current: ScoreVector,
    /// Externally computed similarity of the two answer texts.
    pub text_similarity: f64,
    /// Weighting override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<DriftWeights>,
    /// Themes supplied by the NLP backend.
    #[serde(default)]
    pub dominant_themes: Vec<String>,
    /// Explainability notes supplied by the NLP backend.
    #[serde(default)]
    pub explainability_delta: Vec<String>,
    /// Periods the snapshots came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
}

impl DriftInput {
    /// Creates a request with default weights and no annotations.
    pub fn new(previous: ScoreVector, current: ScoreVector, text_similarity: f64) -> Self {
        Self {
            previous,
            current,
            text_similarity,
            weights: None,
            dominant_themes: Vec::new(),
            explainability_delta: Vec::new(),
            window: None,
        }
    }

    /// Creates a request between two periods, recording the time window.
    pub fn between(previous: &Period, current: &Period, text_similarity: f64) -> Self {
        let mut input = Self::new(
            previous.scores.clone(),
            current.scores.clone(),
            text_similarity,
        );
        input.window = Some(TimeWindow {
            from_label: previous.label.clone(),
            from: previous.timestamp,
            to_label: current.label.clone(),
            to: current.timestamp,
        });
        input
    }

    /// Overrides the configured weights.
    pub fn with_weights(mut self, weights: DriftWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Attaches dominant themes.
    pub fn with_themes(mut self, themes: Vec<String>) -> Self {
        self.dominant_themes = themes;
        self
    }

    /// Attaches explainability notes.
    pub fn with_explainability(mut self, notes: Vec<String>) -> Self {
        self.explainability_delta = notes;
        self
    }
}

/// Computes [`DriftReport`]s for a fixed dimension set.
#[derive(Debug, Clone)]
pub struct DriftScorer {
    config: DriftConfig,
    classifier: SeverityClassifier,
}

impl DriftScorer {
    /// Creates a scorer after validating its configuration.
    pub fn new(config: DriftConfig) -> Result<Self> {
        config.validate()?;
        let classifier = SeverityClassifier::new(config.severity.clone())?;
        Ok(Self { config, classifier })
    }

    /// Active configuration.
    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Classifier used for band and ethical tagging.
    pub fn classifier(&self) -> &SeverityClassifier {
        &self.classifier
    }

    /// Scores one request.
    ///
    /// # Errors
    ///
    /// - `VectorError::DimensionMismatch` if `previous` and `current` differ
    ///   in their dimensions, or do not cover the configured set
    /// - `VectorError::UnknownDimension` for names outside the set
    /// - `VectorError::InvalidValue` for `NaN` inputs
    pub fn score(&self, input: &DriftInput) -> Result<Outcome<DriftReport>> {
        input.previous.check_same_dimensions(&input.current)?;

        let dims = &self.config.dimensions;
        let previous = input.previous.aligned(dims, "previous")?;
        let current = input.current.aligned(dims, "current")?;

        let mut warnings = previous.warnings;
        warnings.extend(current.warnings);

        let similarity = clamp_unit("text_similarity", input.text_similarity, &mut warnings)?;
        let requested = input.weights.unwrap_or(self.config.weights);
        let weights = DriftWeights::new(
            clamp_unit("weights.text", requested.text, &mut warnings)?,
            clamp_unit("weights.scores", requested.scores, &mut warnings)?,
        );

        let per_dimension_delta: IndexMap<String, f64> = dims
            .iter()
            .zip(previous.value.iter().zip(current.value.iter()))
            .map(|(name, (before, after))| (name.clone(), after - before))
            .collect();

        let mean_abs_delta = per_dimension_delta.values().map(|d| d.abs()).sum::<f64>()
            / per_dimension_delta.len() as f64;
        let severity_index =
            (weights.text * (1.0 - similarity) + weights.scores * mean_abs_delta).clamp(0.0, 1.0);

        let threshold = self.config.shift_threshold;
        let sentiment_shift = Shift::from_delta(
            mean_delta(&per_dimension_delta, &self.config.sentiment_dimensions),
            threshold,
        );
        let ideology_shift = Shift::from_delta(
            mean_delta(&per_dimension_delta, &self.config.ideology_dimensions),
            threshold,
        );

        let classification = self
            .classifier
            .classify_parts(severity_index, &per_dimension_delta);

        debug!(
            severity_index,
            band = %classification.band,
            ethical_tag = %classification.ethical_tag,
            %sentiment_shift,
            %ideology_shift,
            "scored drift"
        );

        let report = DriftReport {
            per_dimension_delta,
            severity_index,
            band: classification.band,
            sentiment_shift,
            ideology_shift,
            ethical_tag: classification.ethical_tag,
            dominant_themes: input.dominant_themes.clone(),
            explainability_delta: input.explainability_delta.clone(),
            window: input.window.clone(),
        };
        Ok(Outcome::with_warnings(report, warnings))
    }

    /// Scores two periods directly.
    pub fn score_periods(
        &self,
        previous: &Period,
        current: &Period,
        text_similarity: f64,
    ) -> Result<Outcome<DriftReport>> {
        self.score(&DriftInput::between(previous, current, text_similarity))
    }
}

/// Mean delta over `names`; 0 when the group is empty.
fn mean_delta(deltas: &IndexMap<String, f64>, names: &[String]) -> f64 {
    let values: Vec<f64> = names.iter().filter_map(|n| deltas.get(n).copied()).collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EthicalTag, SeverityBand};
    use crate::vector::{VectorError, Warning};

    fn two_dim_scorer() -> DriftScorer {
        let dims = DimensionSet::new(["pos", "norm"]).unwrap();
        let config = DriftConfig::new(dims)
            .with_sentiment(["pos"])
            .with_ideology(["norm"])
            .with_normative(["norm"]);
        DriftScorer::new(config).unwrap()
    }

    fn vector(pos: f64, norm: f64) -> ScoreVector {
        ScoreVector::from_pairs([("pos", pos), ("norm", norm)])
    }

    #[test]
    fn test_identical_vectors_have_zero_severity() {
        let scorer = two_dim_scorer();
        let v = vector(0.4, 0.6);
        let outcome = scorer.score(&DriftInput::new(v.clone(), v, 1.0)).unwrap();

        assert_eq!(outcome.value.severity_index, 0.0);
        assert_eq!(outcome.value.band, SeverityBand::Low);
        assert_eq!(outcome.value.sentiment_shift, Shift::Stable);
        assert_eq!(outcome.value.ethical_tag, EthicalTag::None);
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_formula_with_default_weights() {
        let scorer = two_dim_scorer();
        let input = DriftInput::new(vector(0.3, 0.2), vector(0.7, 0.6), 0.2);
        let report = scorer.score(&input).unwrap().value;

        // 0.5 * (1 - 0.2) + 0.5 * mean(0.4, 0.4)
        assert!((report.severity_index - 0.6).abs() < 1e-9);
        assert_eq!(report.band, SeverityBand::Moderate);
        assert!((report.per_dimension_delta["pos"] - 0.4).abs() < 1e-9);
        assert_eq!(report.sentiment_shift, Shift::Increase);
        assert_eq!(report.ideology_shift, Shift::Increase);
        assert_eq!(report.ethical_tag, EthicalTag::None);
    }

    #[test]
    fn test_text_heavy_weights_reach_high_band() {
        let scorer = two_dim_scorer();
        let input = DriftInput::new(vector(0.3, 0.2), vector(0.7, 0.6), 0.2)
            .with_weights(DriftWeights::new(0.8, 0.2));
        let report = scorer.score(&input).unwrap().value;

        assert!((report.severity_index - 0.72).abs() < 1e-9);
        assert_eq!(report.band, SeverityBand::High);
    }

    #[test]
    fn test_mismatched_dimensions_fail() {
        let scorer = two_dim_scorer();
        let previous = vector(0.3, 0.2);
        let current = ScoreVector::from_pairs([("pos", 0.7)]);

        let err = scorer
            .score(&DriftInput::new(previous, current, 0.5))
            .unwrap_err();
        assert_eq!(
            err,
            DriftError::Vector(VectorError::DimensionMismatch {
                missing: vec!["norm".to_string()],
                unexpected: vec![],
            })
        );
    }

    #[test]
    fn test_unknown_dimension_fails() {
        let scorer = two_dim_scorer();
        let previous = vector(0.3, 0.2).with("bogus", 0.1);
        let current = vector(0.3, 0.2).with("bogus", 0.1);

        let err = scorer
            .score(&DriftInput::new(previous, current, 0.5))
            .unwrap_err();
        assert!(matches!(
            err,
            DriftError::Vector(VectorError::UnknownDimension { .. })
        ));
    }

    #[test]
    fn test_out_of_range_similarity_is_clamped() {
        let scorer = two_dim_scorer();
        let v = vector(0.5, 0.5);
        let outcome = scorer.score(&DriftInput::new(v.clone(), v, 1.3)).unwrap();

        assert_eq!(outcome.value.severity_index, 0.0);
        assert_eq!(
            outcome.warnings,
            vec![Warning::ValueClamped {
                field: "text_similarity".to_string(),
                original: 1.3,
                clamped: 1.0,
            }]
        );
    }

    #[test]
    fn test_decrease_and_ethical_tag() {
        let scorer = two_dim_scorer();
        let input = DriftInput::new(vector(0.9, 0.95), vector(0.5, 0.1), 0.6);
        let report = scorer.score(&input).unwrap().value;

        assert_eq!(report.sentiment_shift, Shift::Decrease);
        assert_eq!(report.ideology_shift, Shift::Decrease);
        assert_eq!(report.ethical_tag, EthicalTag::EthicallyRelevant);
    }

    #[test]
    fn test_pass_through_fields() {
        let scorer = two_dim_scorer();
        let input = DriftInput::new(vector(0.3, 0.2), vector(0.3, 0.2), 0.9)
            .with_themes(vec!["energy".into(), "policy".into()])
            .with_explainability(vec!["cites fewer sources".into()]);
        let report = scorer.score(&input).unwrap().value;

        assert_eq!(report.dominant_themes, vec!["energy", "policy"]);
        assert_eq!(report.explainability_delta, vec!["cites fewer sources"]);
    }

    #[test]
    fn test_config_rejects_unknown_nominated_dimension() {
        let dims = DimensionSet::new(["pos", "norm"]).unwrap();
        let config = DriftConfig::new(dims).with_ideology(["left"]);
        assert!(matches!(
            DriftScorer::new(config),
            Err(DriftError::Vector(VectorError::UnknownDimension { .. }))
        ));
    }

    #[test]
    fn test_config_rejects_negative_weights() {
        let dims = DimensionSet::new(["pos"]).unwrap();
        let config = DriftConfig::new(dims).with_weights(DriftWeights::new(-0.1, 0.5));
        assert!(matches!(
            DriftScorer::new(config),
            Err(DriftError::InvalidConfig(_))
        ));
    }
}

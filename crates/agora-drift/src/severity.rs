//! # Severity Classification
//!
//! Maps a severity index into a [`SeverityBand`] and the per-dimension
//! deltas of a designated normative subset into an [`EthicalTag`].
//!
//! ## Default Thresholds
//!
//! | Output | Rule |
//! |--------|------|
//! | `high` | index >= 0.7 |
//! | `moderate` | 0.4 <= index < 0.7 |
//! | `low` | index < 0.4 |
//! | `ethically_relevant` | some normative abs(delta) > 0.7 |
//! | `bias_risk` | some normative abs(delta) > 0.4 |
//! | `none` | otherwise |
//!
//! Both threshold pairs and the normative subset are configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{
    Classification, DriftError, DriftReport, EthicalTag, Result, SeverityBand, THRESHOLD_TOLERANCE,
};

/// A `moderate`/`high` threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    /// Lower bound of the moderate tier.
    pub moderate: f64,
    /// Lower bound of the high tier.
    pub high: f64,
}

impl SeverityThresholds {
    /// Creates a threshold pair.
    pub const fn new(moderate: f64, high: f64) -> Self {
        Self { moderate, high }
    }

    /// Checks `0 <= moderate <= high <= 1`.
    pub fn validate(&self, name: &str) -> Result<()> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.moderate) || !in_unit(self.high) {
            return Err(DriftError::InvalidConfig(format!(
                "{} thresholds must lie in [0, 1] (moderate = {}, high = {})",
                name, self.moderate, self.high
            )));
        }
        if self.moderate > self.high {
            return Err(DriftError::InvalidConfig(format!(
                "{} moderate threshold {} exceeds high threshold {}",
                name, self.moderate, self.high
            )));
        }
        Ok(())
    }
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self::new(0.4, 0.7)
    }
}

/// Configuration of the severity classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityConfig {
    /// Thresholds applied to the severity index.
    pub bands: SeverityThresholds,
    /// Thresholds applied to absolute normative deltas.
    pub ethical: SeverityThresholds,
    /// Dimensions considered normative or ideological.
    pub normative_dimensions: Vec<String>,
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            bands: SeverityThresholds::default(),
            ethical: SeverityThresholds::default(),
            normative_dimensions: ["norm", "left", "right", "green"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Pure, deterministic severity classifier.
#[derive(Debug, Clone)]
pub struct SeverityClassifier {
    config: SeverityConfig,
}

impl Default for SeverityClassifier {
    fn default() -> Self {
        Self {
            config: SeverityConfig::default(),
        }
    }
}

impl SeverityClassifier {
    /// Creates a classifier after validating both threshold pairs.
    pub fn new(config: SeverityConfig) -> Result<Self> {
        config.bands.validate("severity band")?;
        config.ethical.validate("ethical")?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &SeverityConfig {
        &self.config
    }

    /// Band of a severity index.
    ///
    /// Comparisons allow [`THRESHOLD_TOLERANCE`] of rounding error, so an
    /// index computed as `0.39999999999999997` is moderate.
    pub fn band_for(&self, index: f64) -> SeverityBand {
        let bands = &self.config.bands;
        let index = index + THRESHOLD_TOLERANCE;
        if index >= bands.high {
            SeverityBand::High
        } else if index >= bands.moderate {
            SeverityBand::Moderate
        } else {
            SeverityBand::Low
        }
    }

    /// Ethical tag from the largest absolute delta on a normative dimension.
    /// Normative names absent from `deltas` are skipped.
    pub fn ethical_tag_for(&self, deltas: &IndexMap<String, f64>) -> EthicalTag {
        let peak = self
            .config
            .normative_dimensions
            .iter()
            .filter_map(|name| deltas.get(name))
            .map(|delta| delta.abs())
            .fold(0.0_f64, f64::max);

        let ethical = &self.config.ethical;
        let peak = peak - THRESHOLD_TOLERANCE;
        if peak > ethical.high {
            EthicalTag::EthicallyRelevant
        } else if peak > ethical.moderate {
            EthicalTag::BiasRisk
        } else {
            EthicalTag::None
        }
    }

    /// Classifies raw parts.
    pub fn classify_parts(&self, index: f64, deltas: &IndexMap<String, f64>) -> Classification {
        Classification {
            band: self.band_for(index),
            ethical_tag: self.ethical_tag_for(deltas),
        }
    }

    /// Classifies a report from its severity index and deltas.
    ///
    /// The report's own `band` and `ethical_tag` are ignored, so a report
    /// produced under different thresholds can be re-classified.
    pub fn classify(&self, report: &DriftReport) -> Classification {
        self.classify_parts(report.severity_index, &report.per_dimension_delta)
    }
}

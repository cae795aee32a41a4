//! Configuration types for the analysis engine.
//!
//! Every section has defaults, so a TOML file only needs the keys it
//! overrides:
//!
//! ```toml
//! dimensions = ["pos", "norm", "left", "right", "green", "emotion"]
//!
//! [council]
//! tie_break = "first_appearance"
//!
//! [drift.weights]
//! text = 0.8
//! scores = 0.2
//!
//! [severity.bands]
//! moderate = 0.35
//! high = 0.65
//! ```

use agora_council::TieBreak;
use agora_drift::{DimensionSet, DriftConfig, DriftWeights, SeverityConfig};
use agora_feed::FeedConfig;
use agora_radar::{Point, RadarGeometry, MIN_DIMENSIONS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{error::AgoraError, Result};

/// Configuration for the analysis engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ordered dimension names shared by every score vector.
    pub dimensions: Vec<String>,

    /// Vote aggregation configuration.
    pub council: CouncilConfig,

    /// Drift scoring configuration.
    pub drift: DriftSettings,

    /// Severity band and ethical tag configuration.
    pub severity: SeverityConfig,

    /// Radar geometry configuration.
    pub radar: RadarConfig,

    /// Live feed configuration.
    pub feed: FeedConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dimensions: ["pos", "norm", "left", "right", "green", "emotion"]
                .into_iter()
                .map(String::from)
                .collect(),
            council: CouncilConfig::default(),
            drift: DriftSettings::default(),
            severity: SeverityConfig::default(),
            radar: RadarConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

/// Vote aggregation configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouncilConfig {
    /// Rule that picks a winner among tied candidates.
    pub tie_break: TieBreak,
}

/// Drift scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftSettings {
    /// Weighting between text change and score change.
    pub weights: DriftWeights,

    /// Symmetric threshold for sentiment and ideology shifts.
    pub shift_threshold: f64,

    /// Dimensions driving the sentiment shift.
    pub sentiment_dimensions: Vec<String>,

    /// Dimensions driving the ideology shift.
    pub ideology_dimensions: Vec<String>,
}

impl Default for DriftSettings {
    fn default() -> Self {
        Self {
            weights: DriftWeights::default(),
            shift_threshold: 0.1,
            sentiment_dimensions: vec!["pos".to_string()],
            ideology_dimensions: vec!["norm".to_string()],
        }
    }
}

/// Radar geometry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Horizontal center coordinate.
    pub center_x: f64,

    /// Vertical center coordinate.
    pub center_y: f64,

    /// Radius of a value of 1.0.
    pub radius: f64,

    /// Number of background grid rings.
    pub grid_levels: usize,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            center_x: 150.0,
            center_y: 150.0,
            radius: 120.0,
            grid_levels: 5,
        }
    }
}

impl RadarConfig {
    /// Center and radius as a [`RadarGeometry`].
    pub fn geometry(&self) -> RadarGeometry {
        RadarGeometry::new(Point::new(self.center_x, self.center_y), self.radius)
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| AgoraError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| AgoraError::Config(e.to_string()))
    }

    /// Validated dimension set.
    pub fn dimension_set(&self) -> Result<DimensionSet> {
        DimensionSet::new(self.dimensions.iter().cloned())
            .map_err(|e| AgoraError::Drift(e.into()))
    }

    /// Drift scorer configuration assembled from the drift and severity
    /// sections.
    pub fn drift_config(&self) -> Result<DriftConfig> {
        Ok(DriftConfig::new(self.dimension_set()?)
            .with_weights(self.drift.weights)
            .with_sentiment(self.drift.sentiment_dimensions.iter().cloned())
            .with_ideology(self.drift.ideology_dimensions.iter().cloned())
            .with_severity(self.severity.clone())
            .with_shift_threshold(self.drift.shift_threshold))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Dimensions are empty, blank, duplicated or fewer than the radar
    ///   minimum
    /// - A nominated or normative dimension is not configured
    /// - Weights, thresholds, radar geometry or feed capacities are unusable
    pub fn validate(&self) -> Result<()> {
        let dimensions = self.dimension_set()?;
        if dimensions.len() < MIN_DIMENSIONS {
            return Err(AgoraError::Config(format!(
                "at least {} dimensions are required, got {}",
                MIN_DIMENSIONS,
                dimensions.len()
            )));
        }

        self.drift_config()?.validate()?;
        self.radar.geometry().validate()?;
        self.feed.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_drift::SeverityThresholds;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.dimensions.len(), 6);
        assert_eq!(config.council.tie_break, TieBreak::FirstToReachMax);
        assert_eq!(config.drift.weights, DriftWeights::new(0.5, 0.5));
        assert_eq!(config.severity.bands, SeverityThresholds::new(0.4, 0.7));
        assert_eq!(config.radar.grid_levels, 5);
        assert_eq!(config.feed.activity_capacity, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [council]
            tie_break = "first_appearance"

            [drift.weights]
            text = 0.8
            scores = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.council.tie_break, TieBreak::FirstAppearance);
        assert_eq!(config.drift.weights, DriftWeights::new(0.8, 0.2));
        assert!((config.drift.shift_threshold - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.dimensions, EngineConfig::default().dimensions);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = EngineConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_too_few_dimensions() {
        let err = EngineConfig::from_toml_str(
            r#"
            dimensions = ["pos", "norm"]

            [drift]
            sentiment_dimensions = ["pos"]
            ideology_dimensions = ["norm"]

            [severity]
            normative_dimensions = ["norm"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, AgoraError::Config(_)));
    }

    #[test]
    fn test_rejects_unconfigured_normative_dimension() {
        let config = EngineConfig {
            dimensions: vec!["pos".into(), "norm".into(), "emotion".into()],
            ..EngineConfig::default()
        };
        // Default normative subset names left/right/green.
        assert!(matches!(config.validate(), Err(AgoraError::Drift(_))));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(
            EngineConfig::from_toml_str("dimensions = 3"),
            Err(AgoraError::ConfigParse(_))
        ));
    }
}

//! # Agora Drift - Answer Change Scoring
//!
//! Measures how much a single agent's answer to the same question changed
//! between two points in time, and classifies how consequential that change
//! is.
//!
//! ## Purpose
//!
//! This crate implements three capabilities:
//!
//! 1. **Score Vectors** - Dimension-indexed scores validated against one
//!    ordered [`DimensionSet`] per engine instance.
//!
//! 2. **Drift Scoring** - Per-dimension signed deltas, an aggregate severity
//!    index blending text dissimilarity with score change, and sentiment /
//!    ideology shift labels.
//!
//! 3. **Severity Classification** - Severity bands and an ethical risk tag
//!    derived from a configurable normative dimension subset.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          AGORA DRIFT                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  previous ──┐      ┌──────────────┐       ┌─────────────────┐   │
//! │             ├────▶ │ DRIFT SCORER │ ────▶ │    SEVERITY     │   │
//! │  current  ──┘      │              │ index │   CLASSIFIER    │   │
//! │                    │ • deltas     │ delta │                 │   │
//! │  similarity ─────▶ │ • severity   │       │ • low/mod/high  │   │
//! │  (external)        │ • shifts     │       │ • ethical tag   │   │
//! │                    └──────────────┘       └─────────────────┘   │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Input Hygiene
//!
//! | Input | Handling |
//! |-------|----------|
//! | Value outside `[0, 1]` | Clamped, reported as [`Warning`] |
//! | `NaN` value | Rejected ([`VectorError::InvalidValue`]) |
//! | Name outside the set | Rejected ([`VectorError::UnknownDimension`]) |
//! | Vectors with different names | Rejected ([`VectorError::DimensionMismatch`]) |
//!
//! ## Usage
//!
//! ```rust
//! use agora_drift::{DimensionSet, DriftConfig, DriftInput, DriftScorer, ScoreVector, Shift};
//!
//! let dims = DimensionSet::new(["pos", "norm"])?;
//! let scorer = DriftScorer::new(
//!     DriftConfig::new(dims).with_sentiment(["pos"]).with_ideology(["norm"]),
//! )?;
//!
//! let previous = ScoreVector::from_pairs([("pos", 0.3), ("norm", 0.2)]);
//! let current = ScoreVector::from_pairs([("pos", 0.7), ("norm", 0.6)]);
//!
//! let outcome = scorer.score(&DriftInput::new(previous, current, 0.2))?;
//! assert!((outcome.value.severity_index - 0.6).abs() < 1e-9);
//! assert_eq!(outcome.value.sentiment_shift, Shift::Increase);
//! # Ok::<(), agora_drift::DriftError>(())
//! ```

pub mod drift;
pub mod models;
pub mod severity;
pub mod vector;

pub use drift::{DriftConfig, DriftInput, DriftScorer};
pub use models::{
    Classification, DriftError, DriftReport, DriftWeights, EthicalTag, Result, SeverityBand, Shift,
    TimeWindow, THRESHOLD_TOLERANCE,
};
pub use severity::{SeverityClassifier, SeverityConfig, SeverityThresholds};
pub use vector::{clamp_unit, DimensionSet, Outcome, Period, ScoreVector, VectorError, Warning};

//! # Agora Radar
//!
//! Radar-chart geometry for comparing one agent's score vectors across up
//! to three periods. Produces abstract points and path commands only; any
//! pixel, SVG or DOM rendering happens downstream.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`RadarProjector`] | Score vectors to closed polygons, one per period |
//! | [`RadarGrid`] | Labelled axes and concentric rings |
//! | [`summarize_change`] | Average first-to-last change and its label |
//!
//! ## Quick Start
//!
//! ```rust
//! use agora_drift::{DimensionSet, Period, ScoreVector};
//! use agora_radar::{ChangeLabel, RadarGeometry, RadarProjector};
//! use chrono::{TimeZone, Utc};
//!
//! let dims = DimensionSet::new(["pos", "norm", "left"])?;
//! let projector = RadarProjector::new(dims, RadarGeometry::default())?;
//!
//! let scores = |v: f64| ScoreVector::from_pairs([("pos", v), ("norm", v), ("left", v)]);
//! let periods = [
//!     Period::new("Week 1", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), scores(0.2)),
//!     Period::new("Week 2", Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(), scores(0.5)),
//! ];
//!
//! let polygons = projector.project(&periods)?.into_value();
//! assert_eq!(polygons.len(), 2);
//!
//! let summary = projector.summarize(&periods)?.into_value();
//! assert_eq!(summary.label, ChangeLabel::SignificantIncrease);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Limits
//!
//! - At least [`MIN_DIMENSIONS`] dimensions
//! - At most [`MAX_SELECTED_PERIODS`] periods per projection or summary

mod error;
mod grid;
mod projector;
mod summary;

pub use error::{RadarError, Result};
pub use grid::{Axis, GridRing, RadarGrid};
pub use projector::{
    PathCommand, Point, RadarGeometry, RadarPolygon, RadarProjector, MAX_SELECTED_PERIODS,
    MIN_DIMENSIONS,
};
pub use summary::{summarize_change, ChangeLabel, ChangeSummary, MIN_SUMMARY_PERIODS};

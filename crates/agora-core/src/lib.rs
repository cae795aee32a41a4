//! # Agora Core
//!
//! Configured facade over the agora analysis components.
//! Orchestrates vote aggregation, drift scoring, severity classification
//! and radar projection behind one [`AnalysisEngine`].
//!
//! ## Components
//!
//! | Concern | Crate | Produces |
//! |---------|-------|----------|
//! | Votes | `agora-council` | Consensus winner, tally, reveal sequence |
//! | Drift | `agora-drift` | Per-dimension deltas, severity index, shifts |
//! | Severity | `agora-drift` | Severity band, ethical tag |
//! | Radar | `agora-radar` | Polygons, grid, change summary |
//! | Live feed | `agora-feed` | Recompute task, timed reveal, activity log |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         AGORA CORE                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   EngineConfig ──▶ ┌─────────────────┐ ──▶ render (primitives)  │
//! │      (TOML)        │ AnalysisEngine  │                          │
//! │                    └────────┬────────┘                          │
//! │                             │                                   │
//! │         ┌───────────────────┼───────────────────┐               │
//! │         ▼                   ▼                   ▼               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐          │
//! │  │  Consensus  │    │    Drift    │    │    Radar    │          │
//! │  │   Engine    │    │   Scorer    │    │  Projector  │          │
//! │  └─────────────┘    └─────────────┘    └─────────────┘          │
//! │                                                                 │
//! │                  agora-feed (tokio) drives live updates         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use agora_core::{AnalysisEngine, DriftInput, EngineConfig, ScoreVector, SeverityBand};
//!
//! let engine = AnalysisEngine::new(EngineConfig::default())?;
//!
//! let week = |pos: f64, norm: f64| {
//!     ScoreVector::from_pairs([
//!         ("pos", pos),
//!         ("norm", norm),
//!         ("left", 0.5),
//!         ("right", 0.5),
//!         ("green", 0.5),
//!         ("emotion", 0.5),
//!     ])
//! };
//! let input = DriftInput::new(week(0.3, 0.2), week(0.7, 0.6), 0.2);
//! let report = engine.score_drift(&input)?.into_value();
//! assert_eq!(report.band, SeverityBand::Moderate);
//! # Ok::<(), agora_core::AgoraError>(())
//! ```
//!
//! ## Notes
//!
//! - Every analysis operation is a pure function of its inputs and the
//!   configuration; the engine holds no mutable analysis state
//! - Out-of-range scores are clamped and reported as warnings, never errors
//! - `NaN` scores and mismatched dimension sets are errors
//! - Tie-break rule, weights, thresholds and dimension subsets all come from
//!   [`EngineConfig`]

mod config;
mod engine;
mod error;
mod render;

pub use config::{CouncilConfig, DriftSettings, EngineConfig, RadarConfig};
pub use engine::AnalysisEngine;
pub use error::AgoraError;
pub use render::{render_consensus, render_radar, Primitive, RenderTarget};

// Re-export component types for convenience
pub use agora_council::{
    AgentId, ConsensusEngine, ConsensusResult, RevealProgress, RevealSequence, RevealStep,
    TieBreak, Vote, VoteSet, VoteTally,
};
pub use agora_drift::{
    Classification, DimensionSet, DriftInput, DriftReport, DriftWeights, EthicalTag, Outcome,
    Period, ScoreVector, SeverityBand, SeverityConfig, SeverityThresholds, Shift, TimeWindow,
    Warning,
};
pub use agora_feed::{
    ActivityConsumer, ActivityEntry, ActivityKind, FeedConfig, LiveRecompute, RevealDriver,
    Snapshot, Update,
};
pub use agora_radar::{
    ChangeLabel, ChangeSummary, PathCommand, Point, RadarGeometry, RadarGrid, RadarPolygon,
};

/// Core result type for engine operations.
pub type Result<T> = std::result::Result<T, AgoraError>;

//! The unified analysis facade.
//!
//! [`AnalysisEngine`] is the main entry point of the analysis core. It is
//! built once from an [`EngineConfig`] and exposes the four pure operations
//! plus the live feed helpers.

use crate::{config::EngineConfig, Result};

use agora_council::{ConsensusEngine, ConsensusResult, RevealSequence, VoteSet, VoteTally};
use agora_drift::{
    Classification, DimensionSet, DriftInput, DriftReport, DriftScorer, Outcome, Period,
};
use agora_feed::{
    activity_channel, ActivityConsumer, ActivityEntry, ActivityKind, ActivityProducer,
    LiveRecompute, RevealDriver,
};
use agora_radar::{ChangeSummary, RadarGrid, RadarPolygon, RadarProjector};

use tracing::{debug, info};

/// The unified analysis facade.
///
/// The engine orchestrates four components:
/// - **Vote aggregation**: consensus winner from a vote set
/// - **Drift scoring**: per-dimension and aggregate change of one answer
/// - **Severity classification**: band and ethical tag of a drift report
/// - **Radar projection**: polygons and change summaries for 1-3 periods
///
/// Every operation is a pure function of its inputs and the configuration.
/// The engine holds no mutable analysis state and can be shared across
/// threads. The only side channel is the optional activity log.
///
/// # Example
///
/// ```rust
/// use agora_core::{AnalysisEngine, EngineConfig, Vote, VoteSet};
///
/// let engine = AnalysisEngine::new(EngineConfig::default())?;
///
/// let votes = VoteSet::new(vec![
///     Vote::for_candidate("A", "X"),
///     Vote::for_candidate("B", "X"),
///     Vote::for_candidate("C", "Y"),
/// ]);
/// let result = engine.aggregate_votes(&votes);
/// assert_eq!(result.vote_count, 2);
/// # Ok::<(), agora_core::AgoraError>(())
/// ```
#[derive(Debug)]
pub struct AnalysisEngine {
    /// Configuration.
    config: EngineConfig,

    /// Vote aggregation.
    consensus: ConsensusEngine,

    /// Drift scoring and severity classification.
    drift: DriftScorer,

    /// Radar projection and change summaries.
    radar: RadarProjector,

    /// Recent activity, when a log is attached.
    activity: Option<ActivityProducer<ActivityEntry>>,
}

impl AnalysisEngine {
    /// Create a new engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let consensus = ConsensusEngine::with_tie_break(config.council.tie_break);
        let drift = DriftScorer::new(config.drift_config()?)?;
        let radar = RadarProjector::new(config.dimension_set()?, config.radar.geometry())?;

        info!(
            "Analysis engine initialized with {} dimensions",
            config.dimensions.len()
        );

        Ok(Self {
            config,
            consensus,
            drift,
            radar,
            activity: None,
        })
    }

    /// Create an engine with the default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    /// Attach a bounded activity log and return its reading half.
    ///
    /// Any previously attached log is closed.
    pub fn with_activity_log(mut self) -> Result<(Self, ActivityConsumer<ActivityEntry>)> {
        let (producer, consumer) = activity_channel(self.config.feed.activity_capacity)?;
        self.activity = Some(producer);
        Ok((self, consumer))
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Configured dimensions.
    pub fn dimensions(&self) -> &DimensionSet {
        self.radar.dimensions()
    }

    // ========================================================================
    // Votes
    // ========================================================================

    /// Aggregate a vote set into a consensus result.
    ///
    /// Never fails: an empty or fully invalid set yields no winner.
    pub fn aggregate_votes(&self, votes: &VoteSet) -> ConsensusResult {
        self.evaluate_votes(votes).0
    }

    /// Aggregate a vote set and return the full tally alongside the result.
    pub fn evaluate_votes(&self, votes: &VoteSet) -> (ConsensusResult, VoteTally) {
        let (result, tally) = self.consensus.evaluate(votes);
        self.record(ActivityKind::Consensus, || match &result.winner {
            Some(winner) => format!(
                "{} wins with {}/{} votes{}",
                winner,
                result.vote_count,
                result.total_votes,
                if result.is_tie { " (tie)" } else { "" }
            ),
            None => format!("no valid votes among {}", result.total_votes),
        });
        (result, tally)
    }

    /// Reveal state machine over a vote set, consensus computed up front.
    pub fn reveal_sequence(&self, votes: VoteSet) -> RevealSequence {
        RevealSequence::new(votes, &self.consensus)
    }

    /// Start a timed reveal at the configured interval.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start_reveal(&self, votes: VoteSet) -> Result<RevealDriver> {
        let sequence = self.reveal_sequence(votes);
        Ok(RevealDriver::start(
            sequence,
            self.config.feed.reveal_interval(),
        )?)
    }

    /// Spawn a task recomputing consensus on every newer vote set revision.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn_live_consensus(&self) -> Result<LiveRecompute<VoteSet, ConsensusResult>> {
        let consensus = self.consensus.clone();
        Ok(LiveRecompute::spawn(
            self.config.feed.update_buffer,
            move |votes: &VoteSet| consensus.aggregate(votes),
        )?)
    }

    // ========================================================================
    // Drift
    // ========================================================================

    /// Score how much one answer changed between two snapshots.
    ///
    /// # Errors
    ///
    /// Fails if the two vectors disagree on their dimensions, name an
    /// unknown dimension, or carry `NaN`. Out-of-range values are clamped
    /// and reported as warnings.
    pub fn score_drift(&self, input: &DriftInput) -> Result<Outcome<DriftReport>> {
        let outcome = self.drift.score(input)?;
        self.log_warnings("drift", &outcome);
        self.record(ActivityKind::Drift, || {
            format!(
                "severity {:.2} ({}), ethical tag {}",
                outcome.value.severity_index, outcome.value.band, outcome.value.ethical_tag
            )
        });
        Ok(outcome)
    }

    /// Score drift between two periods, recording the time window.
    pub fn score_periods(
        &self,
        previous: &Period,
        current: &Period,
        text_similarity: f64,
    ) -> Result<Outcome<DriftReport>> {
        self.score_drift(&DriftInput::between(previous, current, text_similarity))
    }

    /// Band and ethical tag of a drift report under the configured
    /// thresholds.
    pub fn classify_severity(&self, report: &DriftReport) -> Classification {
        self.drift.classifier().classify(report)
    }

    // ========================================================================
    // Radar
    // ========================================================================

    /// Project 1-3 periods onto the radar.
    pub fn project_radar(&self, periods: &[Period]) -> Result<Outcome<Vec<RadarPolygon>>> {
        let outcome = self.radar.project(periods)?;
        self.log_warnings("radar", &outcome);
        self.record(ActivityKind::Radar, || {
            format!("projected {} period(s)", outcome.value.len())
        });
        Ok(outcome)
    }

    /// Background grid with the configured number of rings.
    pub fn radar_grid(&self) -> RadarGrid {
        self.radar.grid(self.config.radar.grid_levels)
    }

    /// Summarize the change across 2-3 periods.
    pub fn summarize_change(&self, periods: &[Period]) -> Result<Outcome<ChangeSummary>> {
        let outcome = self.radar.summarize(periods)?;
        self.log_warnings("summary", &outcome);
        self.record(ActivityKind::Summary, || {
            format!(
                "{} -> {}: {} ({:+.2})",
                outcome.value.from_label,
                outcome.value.to_label,
                outcome.value.label,
                outcome.value.avg_change
            )
        });
        Ok(outcome)
    }

    // Each clamp already logs at warn level; this only summarizes.
    fn log_warnings<T>(&self, operation: &str, outcome: &Outcome<T>) {
        if !outcome.is_clean() {
            debug!(
                operation,
                count = outcome.warnings.len(),
                "computed with clamped inputs"
            );
        }
    }

    fn record(&self, kind: ActivityKind, message: impl FnOnce() -> String) {
        if let Some(producer) = &self.activity {
            let message = message();
            debug!(%kind, %message, "activity recorded");
            producer.push(ActivityEntry::now(kind, message));
        }
    }
}

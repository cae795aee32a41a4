//! # Period Change Summary
//!
//! Condenses 2-3 selected periods into one average change between the
//! earliest and the latest of them.
//!
//! | Average change | Label |
//! |----------------|-------|
//! | `> 0.2` | significant increase |
//! | `> 0.1` | moderate increase |
//! | `< -0.1` | decrease |
//! | otherwise | stable |
//!
//! Periods are ordered by timestamp before comparison; selection order does
//! not matter. Intermediate periods must match the dimensions but do not
//! affect the average.

use agora_drift::{DimensionSet, Outcome, Period};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{RadarError, Result};
use crate::projector::{check_selection, RadarProjector};

/// Smallest selection that can be summarized.
pub const MIN_SUMMARY_PERIODS: usize = 2;

/// Categorical reading of an average change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeLabel {
    /// Average change above 0.2.
    SignificantIncrease,
    /// Average change above 0.1.
    ModerateIncrease,
    /// Average change below -0.1.
    Decrease,
    /// Anything in between.
    Stable,
}

impl ChangeLabel {
    /// Label for an average change.
    pub fn from_average(avg_change: f64) -> Self {
        if avg_change > 0.2 {
            ChangeLabel::SignificantIncrease
        } else if avg_change > 0.1 {
            ChangeLabel::ModerateIncrease
        } else if avg_change < -0.1 {
            ChangeLabel::Decrease
        } else {
            ChangeLabel::Stable
        }
    }
}

impl fmt::Display for ChangeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeLabel::SignificantIncrease => write!(f, "significant increase"),
            ChangeLabel::ModerateIncrease => write!(f, "moderate increase"),
            ChangeLabel::Decrease => write!(f, "decrease"),
            ChangeLabel::Stable => write!(f, "stable"),
        }
    }
}

/// Change between the earliest and the latest selected period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// Mean of `last[d] - first[d]` over all dimensions.
    pub avg_change: f64,
    /// Label of `avg_change`.
    pub label: ChangeLabel,
    /// Label of the earliest period.
    pub from_label: String,
    /// Label of the latest period.
    pub to_label: String,
    /// `last[d] - first[d]` per dimension, in configured order.
    pub per_dimension_change: IndexMap<String, f64>,
}

/// Summarizes the change across 2-3 periods over `dimensions`.
///
/// # Errors
///
/// - [`RadarError::InsufficientPeriods`] for fewer than two periods
/// - [`RadarError::SelectionLimitExceeded`] for more than three
/// - [`RadarError::Vector`] if any selected period does not cover exactly
///   the configured dimensions
pub fn summarize_change(
    dimensions: &DimensionSet,
    periods: &[Period],
) -> Result<Outcome<ChangeSummary>> {
    if periods.len() < MIN_SUMMARY_PERIODS {
        return Err(RadarError::InsufficientPeriods {
            found: periods.len(),
            required: MIN_SUMMARY_PERIODS,
        });
    }
    check_selection(periods.len())?;

    let mut ordered: Vec<&Period> = periods.iter().collect();
    ordered.sort_by_key(|p| p.timestamp);
    let first = ordered[0];
    let last = ordered[ordered.len() - 1];

    // Every selected period must match the dimensions, not only the endpoints.
    let mut warnings = Vec::new();
    let mut aligned = Vec::with_capacity(ordered.len());
    for period in &ordered {
        let outcome = period.scores.aligned(dimensions, &period.label)?;
        warnings.extend(outcome.warnings);
        aligned.push(outcome.value);
    }
    let before = &aligned[0];
    let after = &aligned[aligned.len() - 1];

    let per_dimension_change: IndexMap<String, f64> = dimensions
        .iter()
        .zip(before.iter().zip(after.iter()))
        .map(|(name, (b, a))| (name.clone(), a - b))
        .collect();
    let avg_change =
        per_dimension_change.values().sum::<f64>() / per_dimension_change.len() as f64;
    let label = ChangeLabel::from_average(avg_change);

    debug!(
        from = %first.label,
        to = %last.label,
        avg_change,
        %label,
        "summarized period change"
    );

    Ok(Outcome::with_warnings(
        ChangeSummary {
            avg_change,
            label,
            from_label: first.label.clone(),
            to_label: last.label.clone(),
            per_dimension_change,
        },
        warnings,
    ))
}

impl RadarProjector {
    /// Summarizes the change across 2-3 periods over the projector's
    /// dimensions.
    pub fn summarize(&self, periods: &[Period]) -> Result<Outcome<ChangeSummary>> {
        summarize_change(self.dimensions(), periods)
    }
}

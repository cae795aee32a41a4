//! Plurality consensus over agent votes.
//!
//! Tallies valid votes per candidate and selects the candidate with the
//! highest tally. Ties are broken by a configurable, deterministic rule
//! that is reported back in the result.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::vote::{AgentId, VoteSet};

/// Rule used to pick a winner among candidates sharing the top tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Replay votes in cast order; the first candidate whose running
    /// tally reaches the maximum wins.
    #[default]
    FirstToReachMax,
    /// The tied candidate that received a vote earliest wins.
    FirstAppearance,
}

/// Per-candidate tally of a vote set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Valid vote counts keyed by candidate, in order of first appearance.
    pub counts: IndexMap<AgentId, usize>,
    /// Number of votes naming a candidate.
    pub valid: usize,
    /// Number of abstaining or invalid votes.
    pub invalid: usize,
    /// Total number of votes cast.
    pub total: usize,
}

impl VoteTally {
    /// Tallies a vote set. Invalid votes only count toward the total.
    pub fn from_votes(votes: &VoteSet) -> Self {
        let mut counts: IndexMap<AgentId, usize> = IndexMap::new();
        let mut invalid = 0;

        for vote in votes {
            match &vote.voted_for {
                Some(candidate) => *counts.entry(candidate.clone()).or_insert(0) += 1,
                None => invalid += 1,
            }
        }

        let total = votes.len();
        Self {
            counts,
            valid: total - invalid,
            invalid,
            total,
        }
    }

    /// Returns the highest tally, or 0 when no valid vote was cast.
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Returns every candidate holding the highest tally, in order of
    /// first appearance.
    pub fn leaders(&self) -> Vec<AgentId> {
        let max = self.max_count();
        if max == 0 {
            return Vec::new();
        }
        self.counts
            .iter()
            .filter(|&(_, &count)| count == max)
            .map(|(candidate, _)| candidate.clone())
            .collect()
    }

    /// Returns the tally for one candidate.
    pub fn count_for(&self, candidate: &AgentId) -> usize {
        self.counts.get(candidate).copied().unwrap_or(0)
    }

    /// Returns the share of valid votes a candidate received (0.0 to 1.0).
    pub fn share_of(&self, candidate: &AgentId) -> f64 {
        if self.valid == 0 {
            0.0
        } else {
            self.count_for(candidate) as f64 / self.valid as f64
        }
    }
}

/// Outcome of aggregating a vote set.
///
/// `winner` is `None` if and only if no valid vote was cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Winning candidate.
    pub winner: Option<AgentId>,
    /// Tally of the winner.
    pub vote_count: usize,
    /// Total votes cast, including invalid ones.
    pub total_votes: usize,
    /// True when two or more candidates share the top tally.
    pub is_tie: bool,
    /// Candidates sharing the top tally when `is_tie` is set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tied_candidates: Vec<AgentId>,
    /// Rule that resolved the tie, if one had to be resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_break: Option<TieBreak>,
}

impl ConsensusResult {
    /// Result for a vote set without any valid vote.
    pub fn no_winner(total_votes: usize) -> Self {
        Self {
            winner: None,
            vote_count: 0,
            total_votes,
            is_tie: false,
            tied_candidates: Vec::new(),
            tie_break: None,
        }
    }

    /// Returns true if a winner was selected.
    pub fn has_winner(&self) -> bool {
        self.winner.is_some()
    }
}

/// Plurality consensus engine.
///
/// # Voting Rules
///
/// - Only votes naming a candidate are tallied
/// - Invalid votes count toward `total_votes`
/// - The highest tally wins; ties are resolved by [`TieBreak`]
#[derive(Debug, Clone, Default)]
pub struct ConsensusEngine {
    tie_break: TieBreak,
}

impl ConsensusEngine {
    /// Creates an engine using [`TieBreak::FirstToReachMax`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with a specific tie-break rule.
    pub fn with_tie_break(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    /// Returns the configured tie-break rule.
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Aggregates a vote set into a consensus result.
    pub fn aggregate(&self, votes: &VoteSet) -> ConsensusResult {
        self.evaluate(votes).0
    }

    /// Aggregates a vote set and returns the underlying tally as well.
    pub fn evaluate(&self, votes: &VoteSet) -> (ConsensusResult, VoteTally) {
        let tally = VoteTally::from_votes(votes);
        let leaders = tally.leaders();

        let result = match leaders.as_slice() {
            [] => ConsensusResult::no_winner(tally.total),
            [only] => ConsensusResult {
                winner: Some(only.clone()),
                vote_count: tally.max_count(),
                total_votes: tally.total,
                is_tie: false,
                tied_candidates: Vec::new(),
                tie_break: None,
            },
            tied => {
                let max = tally.max_count();
                let winner = match self.tie_break {
                    TieBreak::FirstToReachMax => first_to_reach(votes, max),
                    TieBreak::FirstAppearance => tied.first().cloned(),
                };
                ConsensusResult {
                    winner,
                    vote_count: max,
                    total_votes: tally.total,
                    is_tie: true,
                    tied_candidates: tied.to_vec(),
                    tie_break: Some(self.tie_break),
                }
            }
        };

        debug!(
            winner = ?result.winner,
            vote_count = result.vote_count,
            total = result.total_votes,
            is_tie = result.is_tie,
            "aggregated votes"
        );

        (result, tally)
    }
}

/// Replays votes in order and returns the first candidate whose running
/// tally hits `max`. Only candidates finishing at `max` can get there.
fn first_to_reach(votes: &VoteSet, max: usize) -> Option<AgentId> {
    let mut running: HashMap<&AgentId, usize> = HashMap::new();
    for candidate in votes.iter().filter_map(|v| v.voted_for.as_ref()) {
        let count = running.entry(candidate).or_insert(0);
        *count += 1;
        if *count == max {
            return Some(candidate.clone());
        }
    }
    None
}

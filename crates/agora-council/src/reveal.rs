//! Vote-by-vote reveal sequencing.
//!
//! A [`RevealSequence`] owns a vote set together with its consensus result,
//! which is computed once at construction. An external scheduler calls
//! [`RevealSequence::tick`] to disclose the next vote; the revealed count
//! only ever grows. Cancelling stops further ticks but leaves the consensus
//! result untouched.

use serde::{Deserialize, Serialize};

use crate::consensus::{ConsensusEngine, ConsensusResult};
use crate::error::CouncilError;
use crate::vote::{Vote, VoteSet};
use crate::Result;

/// Disclosure state of a single vote, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteState {
    /// Vote `i` has not been shown yet.
    Pending(usize),
    /// Vote `i` has been shown.
    Revealed(usize),
}

impl VoteState {
    /// Index of the vote this state describes.
    pub fn index(&self) -> usize {
        match self {
            VoteState::Pending(i) | VoteState::Revealed(i) => *i,
        }
    }

    /// Returns true for [`VoteState::Revealed`].
    pub fn is_revealed(&self) -> bool {
        matches!(self, VoteState::Revealed(_))
    }
}

/// Result of one scheduler tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealStep<'a> {
    /// One more vote was disclosed.
    Revealed {
        /// Index of the disclosed vote.
        index: usize,
        /// The disclosed vote.
        vote: &'a Vote,
    },
    /// Every vote is already disclosed.
    Complete,
    /// The sequence was cancelled; nothing more will be disclosed.
    Cancelled,
}

/// Snapshot of reveal progress, suitable for publishing to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealProgress {
    /// Votes disclosed so far.
    pub revealed: usize,
    /// Votes in the set.
    pub total: usize,
    /// True once the sequence has been cancelled.
    pub cancelled: bool,
}

impl RevealProgress {
    /// Returns true if every vote has been disclosed.
    pub fn is_complete(&self) -> bool {
        self.revealed == self.total
    }
}

/// Monotonic reveal state machine over a vote set.
#[derive(Debug, Clone)]
pub struct RevealSequence {
    votes: VoteSet,
    consensus: ConsensusResult,
    revealed: usize,
    cancelled: bool,
}

impl RevealSequence {
    /// Creates a sequence with nothing revealed. The consensus result is
    /// computed over the complete vote set immediately.
    pub fn new(votes: VoteSet, engine: &ConsensusEngine) -> Self {
        let consensus = engine.aggregate(&votes);
        Self {
            votes,
            consensus,
            revealed: 0,
            cancelled: false,
        }
    }

    /// Consensus over the complete vote set, independent of progress.
    pub fn consensus(&self) -> &ConsensusResult {
        &self.consensus
    }

    /// The underlying vote set in original order.
    pub fn votes(&self) -> &VoteSet {
        &self.votes
    }

    /// Number of votes disclosed so far.
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Votes disclosed so far, in original order.
    pub fn revealed_votes(&self) -> &[Vote] {
        self.votes.revealed(self.revealed)
    }

    /// Returns true when every vote is disclosed.
    pub fn is_complete(&self) -> bool {
        self.revealed == self.votes.len()
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> RevealProgress {
        RevealProgress {
            revealed: self.revealed,
            total: self.votes.len(),
            cancelled: self.cancelled,
        }
    }

    /// State of the vote at `index`, or `None` past the end.
    pub fn state_of(&self, index: usize) -> Option<VoteState> {
        if index >= self.votes.len() {
            None
        } else if index < self.revealed {
            Some(VoteState::Revealed(index))
        } else {
            Some(VoteState::Pending(index))
        }
    }

    /// States of every vote, in original order.
    pub fn states(&self) -> Vec<VoteState> {
        (0..self.votes.len())
            .filter_map(|i| self.state_of(i))
            .collect()
    }

    /// Discloses the next vote.
    pub fn tick(&mut self) -> RevealStep<'_> {
        if self.cancelled {
            return RevealStep::Cancelled;
        }
        if self.is_complete() {
            return RevealStep::Complete;
        }
        let index = self.revealed;
        self.revealed += 1;
        RevealStep::Revealed {
            index,
            vote: &self.votes.votes()[index],
        }
    }

    /// Jumps forward so that `count` votes are disclosed.
    ///
    /// Moving backwards or past the end is rejected. A cancelled sequence
    /// stays where it stopped.
    pub fn advance_to(&mut self, count: usize) -> Result<()> {
        if count > self.votes.len() {
            return Err(CouncilError::RevealOutOfRange {
                requested: count,
                available: self.votes.len(),
            });
        }
        if count < self.revealed {
            return Err(CouncilError::RevealRegression {
                requested: count,
                current: self.revealed,
            });
        }
        if !self.cancelled {
            self.revealed = count;
        }
        Ok(())
    }

    /// Discloses every remaining vote at once (e.g. a "skip" action).
    pub fn reveal_all(&mut self) {
        if !self.cancelled {
            self.revealed = self.votes.len();
        }
    }

    /// Stops the sequence. Progress is frozen; consensus stays available.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vote::AgentId;

    fn sequence() -> RevealSequence {
        let votes = VoteSet::new(vec![
            Vote::for_candidate("A", "X"),
            Vote::for_candidate("B", "X"),
            Vote::for_candidate("C", "Y"),
        ]);
        RevealSequence::new(votes, &ConsensusEngine::new())
    }

    #[test]
    fn test_consensus_available_before_reveal() {
        let seq = sequence();
        assert_eq!(seq.revealed_count(), 0);
        assert_eq!(seq.consensus().winner, Some(AgentId::new("X")));
        assert_eq!(seq.consensus().total_votes, 3);
    }

    #[test]
    fn test_tick_reveals_in_order() {
        let mut seq = sequence();

        match seq.tick() {
            RevealStep::Revealed { index, vote } => {
                assert_eq!(index, 0);
                assert_eq!(vote.voter.as_str(), "A");
            }
            other => panic!("unexpected step: {:?}", other),
        }
        assert_eq!(seq.state_of(0), Some(VoteState::Revealed(0)));
        assert_eq!(seq.state_of(1), Some(VoteState::Pending(1)));
        assert_eq!(seq.state_of(3), None);

        assert!(matches!(seq.tick(), RevealStep::Revealed { index: 1, .. }));
        assert!(matches!(seq.tick(), RevealStep::Revealed { index: 2, .. }));
        assert_eq!(seq.tick(), RevealStep::Complete);
        assert!(seq.is_complete());
        assert_eq!(seq.revealed_votes().len(), 3);
    }

    #[test]
    fn test_cancel_freezes_progress() {
        let mut seq = sequence();
        seq.tick();
        seq.cancel();

        assert_eq!(seq.tick(), RevealStep::Cancelled);
        seq.reveal_all();
        assert_eq!(seq.revealed_count(), 1);
        assert!(seq.progress().cancelled);
        assert_eq!(seq.consensus().winner, Some(AgentId::new("X")));
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut seq = sequence();
        seq.advance_to(2).unwrap();
        assert_eq!(seq.revealed_count(), 2);

        let err = seq.advance_to(1).unwrap_err();
        assert!(matches!(err, CouncilError::RevealRegression { .. }));

        let err = seq.advance_to(4).unwrap_err();
        assert!(matches!(err, CouncilError::RevealOutOfRange { .. }));
    }

    #[test]
    fn test_states_cover_every_vote() {
        let mut seq = sequence();
        seq.tick();
        let states = seq.states();
        assert_eq!(states.len(), 3);
        assert!(states[0].is_revealed());
        assert!(!states[2].is_revealed());
        assert_eq!(states[2].index(), 2);
    }

    #[test]
    fn test_empty_sequence_is_complete() {
        let mut seq = RevealSequence::new(VoteSet::default(), &ConsensusEngine::new());
        assert!(seq.is_complete());
        assert_eq!(seq.tick(), RevealStep::Complete);
        assert!(seq.consensus().winner.is_none());
    }
}

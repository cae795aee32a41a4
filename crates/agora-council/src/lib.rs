//! # Agora Council
//!
//! Consensus over votes cast by independent agents answering the same
//! question.
//!
//! ## Overview
//!
//! Each agent votes for the answer it considers best, or abstains. The
//! [`ConsensusEngine`] tallies the valid votes and picks the candidate with
//! the highest tally. Abstentions count toward the total but never toward a
//! candidate.
//!
//! ## Tie Handling
//!
//! When two or more candidates share the top tally the result is flagged as
//! a tie and a winner is still picked deterministically. The rule is
//! configurable through [`TieBreak`] and echoed back in the result together
//! with the tied candidates, so callers can see how the decision was made.
//!
//! ## Reveal Sequencing
//!
//! Presentation layers often disclose votes one at a time. The
//! [`RevealSequence`] state machine decouples that disclosure from the
//! computation: consensus is computed up front over the complete set, and
//! each external tick moves one vote from `Pending` to `Revealed`.
//!
//! ## Usage
//!
//! ```rust
//! use agora_council::{ConsensusEngine, Vote, VoteSet};
//!
//! let votes = VoteSet::new(vec![
//!     Vote::for_candidate("A", "X"),
//!     Vote::for_candidate("B", "X"),
//!     Vote::for_candidate("C", "Y"),
//! ]);
//!
//! let result = ConsensusEngine::new().aggregate(&votes);
//! assert_eq!(result.winner.unwrap().as_str(), "X");
//! assert_eq!(result.vote_count, 2);
//! assert!(!result.is_tie);
//! ```

pub mod consensus;
pub mod error;
pub mod reveal;
pub mod vote;

pub use consensus::{ConsensusEngine, ConsensusResult, TieBreak, VoteTally};
pub use error::CouncilError;
pub use reveal::{RevealProgress, RevealSequence, RevealStep, VoteState};
pub use vote::{AgentId, Vote, VoteSet};

/// Result type for council operations.
pub type Result<T> = std::result::Result<T, CouncilError>;

//! Vote primitives for multi-agent consensus.
//!
//! Defines [`AgentId`], [`Vote`] and the ordered [`VoteSet`] that the
//! consensus engine tallies and the reveal sequence walks through.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CouncilError;
use crate::Result;

/// Identifier of an agent taking part in a debate.
///
/// Agents appear both as voters and as vote targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Creates a new agent identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AgentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A vote cast by one agent for another.
///
/// `voted_for == None` marks an invalid or abstaining vote: it counts toward
/// the total but never toward a candidate's tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Agent that cast this vote.
    pub voter: AgentId,
    /// Agent the vote was cast for, if the vote is valid.
    #[serde(default)]
    pub voted_for: Option<AgentId>,
    /// Free-form reasoning attached to the vote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl Vote {
    /// Creates a valid vote for `candidate`.
    pub fn for_candidate(voter: impl Into<AgentId>, candidate: impl Into<AgentId>) -> Self {
        Self {
            voter: voter.into(),
            voted_for: Some(candidate.into()),
            reasoning: None,
        }
    }

    /// Creates an abstaining (invalid) vote.
    pub fn abstain(voter: impl Into<AgentId>) -> Self {
        Self {
            voter: voter.into(),
            voted_for: None,
            reasoning: None,
        }
    }

    /// Attaches reasoning to the vote.
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Returns true if this vote names a candidate.
    pub fn is_valid(&self) -> bool {
        self.voted_for.is_some()
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.voted_for {
            Some(candidate) => write!(f, "{} -> {}", self.voter, candidate),
            None => write!(f, "{} -> (abstain)", self.voter),
        }
    }
}

/// Ordered sequence of votes for one question.
///
/// Voters may repeat; every vote counts. Order is preserved so a
/// presentation layer can reveal votes one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteSet {
    votes: Vec<Vote>,
}

impl VoteSet {
    /// Creates a vote set from votes in cast order.
    pub fn new(votes: Vec<Vote>) -> Self {
        Self { votes }
    }

    /// Creates a vote set, rejecting votes with blank agent identifiers.
    pub fn try_new(votes: Vec<Vote>) -> Result<Self> {
        for (position, vote) in votes.iter().enumerate() {
            if vote.voter.is_blank() {
                return Err(CouncilError::BlankAgentId {
                    position,
                    field: "voter",
                });
            }
            if vote.voted_for.as_ref().is_some_and(AgentId::is_blank) {
                return Err(CouncilError::BlankAgentId {
                    position,
                    field: "voted_for",
                });
            }
        }
        Ok(Self { votes })
    }

    /// Appends a vote at the end of the sequence.
    pub fn push(&mut self, vote: Vote) {
        self.votes.push(vote);
    }

    /// Returns all votes in original order.
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// Returns the first `count` votes in original order.
    ///
    /// `count` larger than the set yields the whole set.
    pub fn revealed(&self, count: usize) -> &[Vote] {
        &self.votes[..count.min(self.votes.len())]
    }

    /// Iterates over votes in original order.
    pub fn iter(&self) -> std::slice::Iter<'_, Vote> {
        self.votes.iter()
    }

    /// Returns the number of votes, valid or not.
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    /// Returns true if no votes were cast.
    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Returns the number of votes naming a candidate.
    pub fn valid_count(&self) -> usize {
        self.votes.iter().filter(|v| v.is_valid()).count()
    }
}

impl From<Vec<Vote>> for VoteSet {
    fn from(votes: Vec<Vote>) -> Self {
        Self::new(votes)
    }
}

impl FromIterator<Vote> for VoteSet {
    fn from_iter<I: IntoIterator<Item = Vote>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VoteSet {
    type Item = &'a Vote;
    type IntoIter = std::slice::Iter<'a, Vote>;

    fn into_iter(self) -> Self::IntoIter {
        self.votes.iter()
    }
}

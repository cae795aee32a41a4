//! Error types for the council crate.

use thiserror::Error;

/// Errors that can occur while building vote sets or driving a reveal.
#[derive(Debug, Error)]
pub enum CouncilError {
    /// A vote carries an empty agent identifier.
    #[error("vote #{position} has a blank {field} identifier")]
    BlankAgentId {
        /// Index of the offending vote in cast order.
        position: usize,
        /// Which identifier was blank (`voter` or `voted_for`).
        field: &'static str,
    },

    /// A reveal was asked to jump past the end of the vote set.
    #[error("cannot reveal {requested} votes, only {available} were cast")]
    RevealOutOfRange {
        /// Requested revealed count.
        requested: usize,
        /// Number of votes in the set.
        available: usize,
    },

    /// A reveal was asked to move backwards.
    #[error("reveal progress is monotonic: {requested} is behind {current}")]
    RevealRegression {
        /// Requested revealed count.
        requested: usize,
        /// Votes already revealed.
        current: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_agent_display() {
        let err = CouncilError::BlankAgentId {
            position: 2,
            field: "voter",
        };
        assert!(err.to_string().contains("#2"));
        assert!(err.to_string().contains("voter"));
    }

    #[test]
    fn test_reveal_out_of_range_display() {
        let err = CouncilError::RevealOutOfRange {
            requested: 5,
            available: 3,
        };
        assert!(err.to_string().contains('5'));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_reveal_regression_display() {
        let err = CouncilError::RevealRegression {
            requested: 1,
            current: 2,
        };
        assert!(err.to_string().contains("monotonic"));
    }
}

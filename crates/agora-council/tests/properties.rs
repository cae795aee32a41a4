//! Property tests for vote aggregation over arbitrary vote sets.

use agora_council::{ConsensusEngine, TieBreak, Vote, VoteSet, VoteTally};
use proptest::prelude::*;

/// Votes drawn from a small agent pool so ties and repeats are common.
fn vote_strategy() -> impl Strategy<Value = Vote> {
    let agent = prop::sample::select(vec!["A", "B", "C", "D"]);
    let target = prop::option::weighted(0.8, prop::sample::select(vec!["X", "Y", "Z"]));
    (agent, target).prop_map(|(voter, target)| match target {
        Some(candidate) => Vote::for_candidate(voter, candidate),
        None => Vote::abstain(voter),
    })
}

fn vote_set_strategy() -> impl Strategy<Value = VoteSet> {
    prop::collection::vec(vote_strategy(), 0..24).prop_map(VoteSet::new)
}

fn tie_break_strategy() -> impl Strategy<Value = TieBreak> {
    prop_oneof![Just(TieBreak::FirstToReachMax), Just(TieBreak::FirstAppearance)]
}

proptest! {
    #[test]
    fn tally_sums_to_valid_votes(votes in vote_set_strategy()) {
        let tally = VoteTally::from_votes(&votes);
        let summed: usize = tally.counts.values().sum();

        prop_assert_eq!(summed, votes.valid_count());
        prop_assert_eq!(tally.valid, votes.valid_count());
        prop_assert!(tally.valid <= tally.total);
        prop_assert_eq!(tally.total, votes.len());
    }

    #[test]
    fn winner_absent_iff_no_valid_votes(
        votes in vote_set_strategy(),
        rule in tie_break_strategy(),
    ) {
        let result = ConsensusEngine::with_tie_break(rule).aggregate(&votes);

        prop_assert_eq!(result.winner.is_none(), votes.valid_count() == 0);
        prop_assert!(result.vote_count <= result.total_votes);
        prop_assert_eq!(result.total_votes, votes.len());
    }

    #[test]
    fn winner_holds_the_top_tally(
        votes in vote_set_strategy(),
        rule in tie_break_strategy(),
    ) {
        let (result, tally) = ConsensusEngine::with_tie_break(rule).evaluate(&votes);

        if let Some(winner) = &result.winner {
            prop_assert_eq!(tally.count_for(winner), tally.max_count());
            prop_assert_eq!(result.vote_count, tally.max_count());
            if result.is_tie {
                prop_assert!(result.tied_candidates.contains(winner));
                prop_assert!(result.tied_candidates.len() >= 2);
            }
        }
    }

    #[test]
    fn aggregation_is_deterministic(votes in vote_set_strategy()) {
        let engine = ConsensusEngine::new();
        prop_assert_eq!(engine.aggregate(&votes), engine.aggregate(&votes));
    }
}

//! Integration tests for the live feed driving the council engine.

use agora_council::{ConsensusEngine, ConsensusResult, RevealSequence, Vote, VoteSet};
use agora_feed::{
    activity_channel, ActivityEntry, ActivityKind, FeedConfig, LiveRecompute, RevealDriver, Update,
};
use std::time::Duration;
use tokio::time::timeout;

fn votes(pairs: &[(&str, &str)]) -> VoteSet {
    pairs
        .iter()
        .map(|(voter, target)| Vote::for_candidate(*voter, *target))
        .collect()
}

// ============================================================================
// Live recompute over vote sets
// ============================================================================

#[tokio::test]
async fn test_live_consensus_follows_latest_revision() {
    let engine = ConsensusEngine::new();
    let live = LiveRecompute::spawn(8, move |set: &VoteSet| engine.aggregate(set)).unwrap();
    let mut results = live.subscribe();

    live.submit(Update::new(1, votes(&[("A", "X"), ("B", "Y"), ("C", "Y")])))
        .await
        .unwrap();
    live.submit(Update::new(2, votes(&[("A", "X"), ("B", "X"), ("C", "Y")])))
        .await
        .unwrap();
    // Redelivered old revision must not roll the result back.
    live.submit(Update::new(1, votes(&[("A", "Y"), ("B", "Y"), ("C", "Y")])))
        .await
        .unwrap();

    timeout(Duration::from_secs(2), async {
        loop {
            if results
                .borrow_and_update()
                .as_ref()
                .is_some_and(|s| s.revision == 2)
            {
                break;
            }
            results.changed().await.unwrap();
        }
    })
    .await
    .unwrap();

    let stats = live.shutdown().await.unwrap();
    assert_eq!(stats.applied, 2);
    assert_eq!(stats.ignored, 1);

    let latest = results.borrow().clone().unwrap();
    assert_eq!(latest.revision, 2);
    let result: &ConsensusResult = &latest.value;
    assert_eq!(result.winner.as_ref().map(|w| w.as_str()), Some("X"));
    assert_eq!(result.vote_count, 2);
}

// ============================================================================
// Reveal driver
// ============================================================================

#[tokio::test]
async fn test_reveal_consensus_available_before_first_tick() {
    let set = votes(&[("A", "X"), ("B", "X"), ("C", "Y")]);
    let sequence = RevealSequence::new(set, &ConsensusEngine::new());

    let driver = RevealDriver::start(sequence, Duration::from_secs(30)).unwrap();
    let consensus = driver.consensus().clone();
    assert_eq!(consensus.winner.as_ref().map(|w| w.as_str()), Some("X"));
    assert_eq!(consensus.total_votes, 3);

    let stopped = driver.cancel().await.unwrap();
    assert!(stopped.is_cancelled());
    assert_eq!(stopped.consensus(), &consensus);
}

#[tokio::test]
async fn test_reveal_runs_to_completion_with_config_interval() {
    let config = FeedConfig::new().with_reveal_interval_ms(2);
    let set = votes(&[("A", "X"), ("B", "Y"), ("C", "Y"), ("D", "Z")]);
    let sequence = RevealSequence::new(set, &ConsensusEngine::new());

    let driver = RevealDriver::start(sequence, config.reveal_interval()).unwrap();
    let finished = timeout(Duration::from_secs(2), driver.finish())
        .await
        .unwrap()
        .unwrap();

    assert!(finished.is_complete());
    assert_eq!(finished.revealed_votes().len(), 4);
    assert_eq!(finished.progress().revealed, 4);
}

// ============================================================================
// Activity log
// ============================================================================

#[tokio::test]
async fn test_activity_log_keeps_last_ten_events() {
    let config = FeedConfig::default();
    let (producer, mut consumer) = activity_channel(config.activity_capacity).unwrap();

    let writer = tokio::spawn(async move {
        for i in 0..25 {
            producer.push(ActivityEntry::now(ActivityKind::Consensus, format!("update {i}")));
        }
    });
    writer.await.unwrap();

    let batch = consumer.next_batch().await.unwrap();
    assert_eq!(batch.len(), 10);
    assert_eq!(batch[0].message, "update 15");
    assert_eq!(batch[9].message, "update 24");
    assert_eq!(consumer.dropped(), 15);

    // Producer was dropped with the writer task.
    assert!(consumer.next_batch().await.is_none());
}

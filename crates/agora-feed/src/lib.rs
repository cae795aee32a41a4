//! # Agora Feed
//!
//! Async plumbing between the pure analysis core and a live presentation
//! layer: idempotent recompute on inbound updates, timed vote reveal and a
//! bounded log of recent events.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`LiveRecompute`] | Recompute on each newer revision, publish whole results |
//! | [`RevealDriver`] | Fixed-interval, cancellable vote reveal |
//! | [`activity_channel`] | Bounded drop-oldest activity log, one producer, one consumer |
//! | [`FeedConfig`] | Capacities and timer period |
//!
//! ## Concurrency Notes
//!
//! - Computation itself stays synchronous; tasks only sequence it
//! - No result is ever partially overwritten: `watch` publishes whole values
//! - Cancelling a reveal never invalidates the consensus already computed
//!
//! ## Quick Start
//!
//! ```rust
//! use agora_council::{ConsensusEngine, RevealSequence, Vote, VoteSet};
//! use agora_feed::{FeedConfig, RevealDriver};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), agora_feed::FeedError> {
//! let votes = VoteSet::new(vec![
//!     Vote::for_candidate("A", "X"),
//!     Vote::for_candidate("B", "X"),
//! ]);
//! let sequence = RevealSequence::new(votes, &ConsensusEngine::new());
//!
//! let config = FeedConfig::new().with_reveal_interval_ms(1);
//! let driver = RevealDriver::start(sequence, config.reveal_interval())?;
//! assert!(driver.consensus().has_winner());
//!
//! let finished = driver.finish().await?;
//! assert!(finished.is_complete());
//! # Ok(())
//! # }
//! ```

mod activity;
mod config;
mod error;
mod live;
mod reveal;

pub use activity::{
    activity_channel, ActivityConsumer, ActivityEntry, ActivityKind, ActivityProducer,
    ActivityRing, DEFAULT_ACTIVITY_CAPACITY,
};
pub use config::FeedConfig;
pub use error::{FeedError, Result};
pub use live::{
    Latest, LiveRecompute, RecomputeStats, Revision, Snapshot, Update, DEFAULT_UPDATE_BUFFER,
};
pub use reveal::{RevealDriver, DEFAULT_REVEAL_INTERVAL};

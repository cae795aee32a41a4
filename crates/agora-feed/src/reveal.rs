//! # Reveal Driver
//!
//! Drives a [`RevealSequence`] from a fixed-interval tokio timer, disclosing
//! one vote per tick and publishing progress to observers.
//!
//! The consensus result is computed before the timer starts and is
//! available from [`RevealDriver::consensus`] at any time, whether the
//! reveal is still running, finished or cancelled.

use agora_council::{ConsensusResult, RevealProgress, RevealSequence, RevealStep};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::error::{FeedError, Result};

/// Default delay between two disclosed votes.
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(600);

/// Handle to a running reveal.
#[derive(Debug)]
pub struct RevealDriver {
    consensus: ConsensusResult,
    progress: watch::Receiver<RevealProgress>,
    cancel: mpsc::Sender<()>,
    task: JoinHandle<RevealSequence>,
}

impl RevealDriver {
    /// Starts revealing `sequence`, one vote per `interval`.
    ///
    /// The first vote is disclosed on the first tick, immediately after
    /// the driver starts.
    pub fn start(mut sequence: RevealSequence, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(FeedError::ZeroInterval);
        }

        let consensus = sequence.consensus().clone();
        let (progress_tx, progress) = watch::channel(sequence.progress());
        let (cancel, mut cancel_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            while !sequence.is_complete() {
                tokio::select! {
                    _ = cancel_rx.recv() => {
                        sequence.cancel();
                        info!(
                            revealed = sequence.revealed_count(),
                            total = sequence.votes().len(),
                            "reveal cancelled"
                        );
                        break;
                    }
                    _ = ticker.tick() => {
                        match sequence.tick() {
                            RevealStep::Revealed { index, vote } => {
                                debug!(index, voter = %vote.voter, "vote revealed");
                            }
                            RevealStep::Complete | RevealStep::Cancelled => break,
                        }
                    }
                }
                progress_tx.send_replace(sequence.progress());
            }
            progress_tx.send_replace(sequence.progress());
            sequence
        });

        Ok(Self {
            consensus,
            progress,
            cancel,
            task,
        })
    }

    /// Consensus over the complete vote set, independent of progress.
    pub fn consensus(&self) -> &ConsensusResult {
        &self.consensus
    }

    /// Latest published progress.
    pub fn progress(&self) -> RevealProgress {
        *self.progress.borrow()
    }

    /// A receiver notified on every progress change.
    pub fn subscribe(&self) -> watch::Receiver<RevealProgress> {
        self.progress.clone()
    }

    /// Waits for every vote to be disclosed and returns the sequence.
    pub async fn finish(self) -> Result<RevealSequence> {
        self.task.await.map_err(|source| FeedError::TaskFailed {
            task: "reveal",
            source,
        })
    }

    /// Stops the timer and returns the sequence frozen where it stopped.
    pub async fn cancel(self) -> Result<RevealSequence> {
        // A closed queue means the reveal already finished on its own.
        let _ = self.cancel.try_send(());
        self.finish().await
    }
}

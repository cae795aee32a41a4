//! # Live Recompute
//!
//! Turns a stream of revisioned data updates into a stream of fully
//! recomputed results.
//!
//! ## Guarantees
//!
//! - Every accepted update triggers a complete recompute over its data;
//!   nothing is patched incrementally.
//! - Updates whose revision is not newer than the last applied one are
//!   ignored, so redelivery and reordering are harmless.
//! - Results are published whole through a `watch` channel. Readers see
//!   either the previous [`Snapshot`] or the next one, never a mix.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐  mpsc   ┌────────────────────┐  watch   ┌──────────┐
//! │ updates │ ──────▶ │ recompute task     │ ───────▶ │ readers  │
//! └─────────┘         │ revision filter    │          └──────────┘
//!                     │ compute(&data)     │
//!                     └────────────────────┘
//! ```

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{FeedError, Result};

/// Default capacity of the update queue.
pub const DEFAULT_UPDATE_BUFFER: usize = 16;

/// Monotonically increasing version of the upstream data.
pub type Revision = u64;

/// One inbound notification carrying the latest data.
#[derive(Debug, Clone, PartialEq)]
pub struct Update<I> {
    /// Version of `data`.
    pub revision: Revision,
    /// Latest data as of `revision`.
    pub data: I,
}

impl<I> Update<I> {
    /// Creates an update.
    pub fn new(revision: Revision, data: I) -> Self {
        Self { revision, data }
    }
}

/// A published result and the revision it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<O> {
    /// Revision of the data the value was computed from.
    pub revision: Revision,
    /// The computed value.
    pub value: O,
}

/// Counters reported when the recompute task stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeStats {
    /// Updates that triggered a recompute.
    pub applied: u64,
    /// Updates dropped as stale or duplicate.
    pub ignored: u64,
}

/// Latest published result, if any.
pub type Latest<O> = Option<Arc<Snapshot<O>>>;

/// Handle to a background recompute task.
///
/// # Example
///
/// ```rust
/// use agora_feed::{LiveRecompute, Update};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let live = LiveRecompute::spawn(4, |votes: &Vec<u32>| votes.iter().sum::<u32>()).unwrap();
/// let mut results = live.subscribe();
///
/// live.submit(Update::new(1, vec![1, 2, 3])).await.unwrap();
/// results.changed().await.unwrap();
/// assert_eq!(results.borrow().as_ref().map(|s| s.value), Some(6));
///
/// let stats = live.shutdown().await.unwrap();
/// assert_eq!(stats.applied, 1);
/// # }
/// ```
#[derive(Debug)]
pub struct LiveRecompute<I, O> {
    updates: mpsc::Sender<Update<I>>,
    shutdown: mpsc::Sender<()>,
    results: watch::Receiver<Latest<O>>,
    task: JoinHandle<RecomputeStats>,
}

impl<I, O> LiveRecompute<I, O>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
{
    /// Spawns the recompute task on the current tokio runtime.
    ///
    /// `buffer` bounds the number of queued updates; senders wait when it
    /// is full.
    pub fn spawn<F>(buffer: usize, compute: F) -> Result<Self>
    where
        F: Fn(&I) -> O + Send + 'static,
    {
        if buffer == 0 {
            return Err(FeedError::ZeroCapacity {
                name: "update queue",
            });
        }

        let (updates, mut updates_rx) = mpsc::channel::<Update<I>>(buffer);
        let (shutdown, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (results_tx, results) = watch::channel::<Latest<O>>(None);

        let task = tokio::spawn(async move {
            let mut stats = RecomputeStats::default();
            let mut last: Option<Revision> = None;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                    update = updates_rx.recv() => {
                        let Some(update) = update else { break };
                        if last.is_some_and(|applied| update.revision <= applied) {
                            stats.ignored += 1;
                            debug!(revision = update.revision, ?last, "stale update ignored");
                            continue;
                        }

                        let value = compute(&update.data);
                        last = Some(update.revision);
                        stats.applied += 1;
                        results_tx.send_replace(Some(Arc::new(Snapshot {
                            revision: update.revision,
                            value,
                        })));
                        debug!(revision = update.revision, "recomputed");
                    }
                }
            }

            info!(
                applied = stats.applied,
                ignored = stats.ignored,
                "recompute task stopped"
            );
            stats
        });

        Ok(Self {
            updates,
            shutdown,
            results,
            task,
        })
    }

    /// Queues an update, waiting for room if the queue is full.
    pub async fn submit(&self, update: Update<I>) -> Result<()> {
        self.updates
            .send(update)
            .await
            .map_err(|_| FeedError::Closed("recompute"))
    }

    /// A sender that can be moved to the upstream producer.
    pub fn sender(&self) -> mpsc::Sender<Update<I>> {
        self.updates.clone()
    }

    /// A receiver notified on every published result.
    pub fn subscribe(&self) -> watch::Receiver<Latest<O>> {
        self.results.clone()
    }

    /// Most recently published result.
    pub fn latest(&self) -> Latest<O> {
        self.results.borrow().clone()
    }

    /// Stops the task and returns its counters.
    ///
    /// Updates still queued are discarded; the last published result stays
    /// readable through existing subscribers.
    pub async fn shutdown(self) -> Result<RecomputeStats> {
        // A full or closed shutdown queue means the task is already stopping.
        let _ = self.shutdown.try_send(());
        drop(self.updates);
        self.task.await.map_err(|source| FeedError::TaskFailed {
            task: "recompute",
            source,
        })
    }
}

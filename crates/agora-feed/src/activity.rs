//! # Activity Log
//!
//! Bounded ring of recent analysis events for display (e.g. a "last 10
//! events" panel).
//!
//! ## Overflow Policy
//!
//! | State | Push behavior |
//! |-------|---------------|
//! | Below capacity | Append |
//! | At capacity | Evict the oldest entry, then append |
//!
//! Eviction is silent to the producer but counted in
//! [`ActivityRing::dropped`].
//!
//! ## Ownership
//!
//! [`activity_channel`] splits one ring into exactly one
//! [`ActivityProducer`] and one [`ActivityConsumer`]. Neither half is
//! `Clone`, so the single-producer / single-consumer discipline is enforced
//! by the type system. Both halves share the ring behind a mutex; the
//! consumer can also wait asynchronously for new entries.
//!
//! ## Example
//!
//! ```rust
//! use agora_feed::ActivityRing;
//!
//! let mut ring = ActivityRing::new(2)?;
//! ring.push("a");
//! ring.push("b");
//! assert_eq!(ring.push("c"), Some("a"));
//! assert_eq!(ring.snapshot(), vec!["b", "c"]);
//! # Ok::<(), agora_feed::FeedError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing::trace;

use crate::error::{FeedError, Result};

/// Default number of retained entries.
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 10;

/// Bounded FIFO with drop-oldest overflow.
#[derive(Debug, Clone)]
pub struct ActivityRing<T> {
    entries: VecDeque<T>,
    capacity: usize,
    dropped: u64,
}

impl<T> ActivityRing<T> {
    /// Creates an empty ring holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(FeedError::ZeroCapacity {
                name: "activity log",
            });
        }
        Ok(Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        })
    }

    /// Appends `entry`, returning the evicted oldest entry if the ring was
    /// full.
    pub fn push(&mut self, entry: T) -> Option<T> {
        let evicted = if self.entries.len() == self.capacity {
            self.dropped += 1;
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Removes and returns every entry, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        self.entries.drain(..).collect()
    }

    /// Maximum number of entries.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the ring holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries evicted by overflow since creation.
    #[inline]
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T: Clone> ActivityRing<T> {
    /// Copies every entry, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

/// Kind of event recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Votes were aggregated.
    Consensus,
    /// A drift report was scored.
    Drift,
    /// Periods were projected onto a radar.
    Radar,
    /// A period change summary was computed.
    Summary,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Consensus => write!(f, "consensus"),
            ActivityKind::Drift => write!(f, "drift"),
            ActivityKind::Radar => write!(f, "radar"),
            ActivityKind::Summary => write!(f, "summary"),
        }
    }
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// When the event happened.
    pub recorded_at: DateTime<Utc>,
    /// What kind of event it was.
    pub kind: ActivityKind,
    /// Short human-readable description.
    pub message: String,
}

impl ActivityEntry {
    /// Creates an entry stamped with the current time.
    pub fn now(kind: ActivityKind, message: impl Into<String>) -> Self {
        Self {
            recorded_at: Utc::now(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.recorded_at.format("%H:%M:%S"),
            self.kind,
            self.message
        )
    }
}

#[derive(Debug)]
struct Shared<T> {
    ring: Mutex<ActivityRing<T>>,
    notify: Notify,
    closed: AtomicBool,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, ActivityRing<T>> {
        // Ring operations never leave it half-updated; poisoning is ignored.
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Writing half of an activity log.
#[derive(Debug)]
pub struct ActivityProducer<T> {
    shared: Arc<Shared<T>>,
}

/// Reading half of an activity log.
#[derive(Debug)]
pub struct ActivityConsumer<T> {
    shared: Arc<Shared<T>>,
}

/// Creates a bounded activity log split into its two halves.
pub fn activity_channel<T>(capacity: usize) -> Result<(ActivityProducer<T>, ActivityConsumer<T>)> {
    let shared = Arc::new(Shared {
        ring: Mutex::new(ActivityRing::new(capacity)?),
        notify: Notify::new(),
        closed: AtomicBool::new(false),
    });
    Ok((
        ActivityProducer {
            shared: Arc::clone(&shared),
        },
        ActivityConsumer { shared },
    ))
}

impl<T> ActivityProducer<T> {
    /// Records `entry`, evicting the oldest one on overflow.
    pub fn push(&self, entry: T) {
        let evicted = self.shared.lock().push(entry).is_some();
        if evicted {
            trace!("activity log full, oldest entry evicted");
        }
        self.shared.notify.notify_one();
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    /// Returns true if the log holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.lock().is_empty()
    }
}

impl<T> Drop for ActivityProducer<T> {
    fn drop(&mut self) {
        self.shared.closed.store(true, Ordering::Release);
        self.shared.notify.notify_one();
    }
}

impl<T> ActivityConsumer<T> {
    /// Removes and returns every entry, oldest first. Never blocks.
    pub fn drain(&mut self) -> Vec<T> {
        self.shared.lock().drain()
    }

    /// Waits until at least one entry is available and drains the log.
    ///
    /// Returns `None` once the producer is gone and the log is empty.
    pub async fn next_batch(&mut self) -> Option<Vec<T>> {
        loop {
            {
                let mut ring = self.shared.lock();
                if !ring.is_empty() {
                    return Some(ring.drain());
                }
                if self.shared.closed.load(Ordering::Acquire) {
                    return None;
                }
            }
            self.shared.notify.notified().await;
        }
    }

    /// Entries evicted by overflow since creation.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.shared.lock().dropped()
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    /// Returns true if the log holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.lock().is_empty()
    }
}

impl<T: Clone> ActivityConsumer<T> {
    /// Copies every entry without removing them, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.shared.lock().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            ActivityRing::<u8>::new(0),
            Err(FeedError::ZeroCapacity { .. })
        ));
    }

    #[test]
    fn test_drops_oldest_on_overflow() {
        let mut ring = ActivityRing::new(DEFAULT_ACTIVITY_CAPACITY).unwrap();
        for i in 0..15 {
            ring.push(i);
        }
        assert_eq!(ring.len(), 10);
        assert_eq!(ring.dropped(), 5);
        assert_eq!(ring.snapshot(), (5..15).collect::<Vec<_>>());
    }

    #[test]
    fn test_drain_empties_ring() {
        let mut ring = ActivityRing::new(3).unwrap();
        ring.push('a');
        ring.push('b');
        assert_eq!(ring.drain(), vec!['a', 'b']);
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 3);
    }

    #[test]
    fn test_split_halves_share_ring() {
        let (producer, mut consumer) = activity_channel(2).unwrap();
        producer.push(1);
        producer.push(2);
        producer.push(3);

        assert_eq!(producer.len(), 2);
        assert_eq!(consumer.snapshot(), vec![2, 3]);
        assert_eq!(consumer.dropped(), 1);
        assert_eq!(consumer.drain(), vec![2, 3]);
        assert!(consumer.is_empty());
    }

    #[test]
    fn test_entry_display() {
        let entry = ActivityEntry::now(ActivityKind::Drift, "severity 0.60 (moderate)");
        let line = entry.to_string();
        assert!(line.contains("[drift] severity 0.60 (moderate)"));
    }

    #[tokio::test]
    async fn test_next_batch_waits_for_producer() {
        let (producer, mut consumer) = activity_channel(4).unwrap();

        let reader = tokio::spawn(async move { consumer.next_batch().await });
        tokio::task::yield_now().await;
        producer.push("vote revealed");

        let batch = reader.await.unwrap();
        assert_eq!(batch, Some(vec!["vote revealed"]));
    }

    #[tokio::test]
    async fn test_next_batch_ends_when_producer_dropped() {
        let (producer, mut consumer) = activity_channel::<u32>(4).unwrap();
        producer.push(7);
        drop(producer);

        assert_eq!(consumer.next_batch().await, Some(vec![7]));
        assert_eq!(consumer.next_batch().await, None);
    }
}

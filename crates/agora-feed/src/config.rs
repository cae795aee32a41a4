//! Live feed settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::activity::DEFAULT_ACTIVITY_CAPACITY;
use crate::error::{FeedError, Result};
use crate::live::DEFAULT_UPDATE_BUFFER;
use crate::reveal::DEFAULT_REVEAL_INTERVAL;

/// Configuration for the live feed plumbing.
///
/// # Example
///
/// ```rust
/// use agora_feed::FeedConfig;
///
/// let config = FeedConfig::new()
///     .with_activity_capacity(20)
///     .with_reveal_interval_ms(250);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Entries retained by the activity log.
    pub activity_capacity: usize,
    /// Delay between two revealed votes, in milliseconds.
    pub reveal_interval_ms: u64,
    /// Queued live updates before senders wait.
    pub update_buffer: usize,
}

impl FeedConfig {
    /// Creates a config with default values.
    ///
    /// Defaults:
    /// - Activity capacity: 10 entries
    /// - Reveal interval: 600 ms
    /// - Update buffer: 16 updates
    #[must_use]
    pub const fn new() -> Self {
        Self {
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
            reveal_interval_ms: DEFAULT_REVEAL_INTERVAL.as_millis() as u64,
            update_buffer: DEFAULT_UPDATE_BUFFER,
        }
    }

    /// Sets the activity log capacity.
    #[must_use]
    pub const fn with_activity_capacity(mut self, capacity: usize) -> Self {
        self.activity_capacity = capacity;
        self
    }

    /// Sets the reveal interval.
    #[must_use]
    pub const fn with_reveal_interval_ms(mut self, millis: u64) -> Self {
        self.reveal_interval_ms = millis;
        self
    }

    /// Sets the live update buffer.
    #[must_use]
    pub const fn with_update_buffer(mut self, buffer: usize) -> Self {
        self.update_buffer = buffer;
        self
    }

    /// Reveal interval as a [`Duration`].
    #[must_use]
    pub const fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }

    /// Checks that every buffer has room and the timer has a period.
    pub fn validate(&self) -> Result<()> {
        if self.activity_capacity == 0 {
            return Err(FeedError::ZeroCapacity {
                name: "activity log",
            });
        }
        if self.update_buffer == 0 {
            return Err(FeedError::ZeroCapacity {
                name: "update queue",
            });
        }
        if self.reveal_interval_ms == 0 {
            return Err(FeedError::ZeroInterval);
        }
        Ok(())
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! Error types for the live feed plumbing.

use thiserror::Error;

/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Errors that can occur while configuring or driving the live feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A bounded buffer was configured with no room.
    #[error("{name} capacity must be positive")]
    ZeroCapacity {
        /// Which buffer was misconfigured
        name: &'static str,
    },

    /// The reveal timer was configured with a zero period.
    #[error("reveal interval must be positive")]
    ZeroInterval,

    /// The background task has already stopped.
    #[error("{0} task is no longer running")]
    Closed(&'static str),

    /// The background task panicked or was aborted.
    #[error("{task} task failed: {source}")]
    TaskFailed {
        /// Which task failed
        task: &'static str,
        /// Join error reported by the runtime
        #[source]
        source: tokio::task::JoinError,
    },
}

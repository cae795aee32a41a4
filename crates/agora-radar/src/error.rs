//! Error types for radar projection and change summaries.

use agora_drift::VectorError;
use thiserror::Error;

/// Result type alias for radar operations.
pub type Result<T> = std::result::Result<T, RadarError>;

/// Errors that can occur while projecting or summarizing periods.
///
/// Every failure is all-or-nothing: no partial polygon list or summary is
/// returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RadarError {
    /// A radar needs at least three axes to enclose an area.
    #[error("radar needs at least {minimum} dimensions, got {found}")]
    TooFewDimensions {
        /// Number of configured dimensions
        found: usize,
        /// Smallest supported dimension count
        minimum: usize,
    },

    /// No period was selected.
    #[error("no period selected")]
    EmptySelection,

    /// More periods were selected than can be compared at once.
    #[error("{requested} periods selected, at most {limit} can be compared")]
    SelectionLimitExceeded {
        /// Number of periods requested
        requested: usize,
        /// Maximum number of periods
        limit: usize,
    },

    /// A change summary needs a first and a last period.
    #[error("change summary needs at least {required} periods, got {found}")]
    InsufficientPeriods {
        /// Number of periods supplied
        found: usize,
        /// Minimum number of periods
        required: usize,
    },

    /// Center or radius is unusable.
    #[error("invalid radar geometry: {0}")]
    InvalidGeometry(String),

    /// A period's scores do not fit the configured dimensions.
    #[error(transparent)]
    Vector(#[from] VectorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_limit_message() {
        let err = RadarError::SelectionLimitExceeded {
            requested: 4,
            limit: 3,
        };
        assert_eq!(
            err.to_string(),
            "4 periods selected, at most 3 can be compared"
        );
    }

    #[test]
    fn test_vector_error_is_transparent() {
        let err: RadarError = VectorError::InvalidValue {
            field: "Week 1.pos".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Week 1.pos is not a number");
    }
}

//! # Score Vectors
//!
//! Dimension-indexed score vectors and the ordered dimension set they are
//! validated against. Every engine instance fixes one [`DimensionSet`];
//! vectors compared together must cover exactly that set.
//!
//! Values are expected in `[0, 1]`. Out-of-range values are clamped and
//! reported as [`Warning::ValueClamped`] rather than rejected. `NaN` cannot
//! be clamped meaningfully and is rejected with [`VectorError::InvalidValue`].

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::warn;

/// Errors raised while validating dimensions and score vectors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorError {
    /// The dimension set has no entries.
    #[error("dimension set is empty")]
    EmptyDimensions,

    /// A dimension name appears more than once.
    #[error("duplicate dimension '{0}'")]
    DuplicateDimension(String),

    /// A dimension name is blank.
    #[error("dimension #{0} has a blank name")]
    BlankDimension(usize),

    /// A name is not part of the configured dimension set.
    #[error("unknown dimension '{name}' (configured: {known})")]
    UnknownDimension {
        /// The unrecognized name.
        name: String,
        /// Comma-separated list of configured names.
        known: String,
    },

    /// Two vectors (or a vector and the configured set) disagree on their
    /// dimensions.
    #[error("dimension mismatch: missing [{}], unexpected [{}]", .missing.join(", "), .unexpected.join(", "))]
    DimensionMismatch {
        /// Names expected but absent.
        missing: Vec<String>,
        /// Names present but not expected.
        unexpected: Vec<String>,
    },

    /// A value is `NaN`.
    #[error("{field} is not a number")]
    InvalidValue {
        /// Which input carried the value.
        field: String,
    },
}

/// Non-fatal anomaly surfaced alongside a computed result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A numeric input fell outside `[0, 1]` and was clamped.
    ValueClamped {
        /// Which input carried the value.
        field: String,
        /// Value as supplied.
        original: f64,
        /// Value used in the computation.
        clamped: f64,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::ValueClamped {
                field,
                original,
                clamped,
            } => write!(f, "{} = {} clamped to {}", field, original, clamped),
        }
    }
}

/// A computed value together with the warnings raised while computing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// The computed value.
    pub value: T,
    /// Non-fatal anomalies, in the order they were found.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    /// Wraps a value with no warnings.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Wraps a value with the given warnings.
    pub fn with_warnings(value: T, warnings: Vec<Warning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if no warning was raised.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transforms the value, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Discards the warnings.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Clamps `value` into `[0, 1]`, recording a warning if it had to move.
pub fn clamp_unit(
    field: impl Into<String>,
    value: f64,
    warnings: &mut Vec<Warning>,
) -> Result<f64, VectorError> {
    if value.is_nan() {
        return Err(VectorError::InvalidValue {
            field: field.into(),
        });
    }
    let clamped = value.clamp(0.0, 1.0);
    if clamped != value {
        let field = field.into();
        warn!(%field, original = value, clamped, "input outside [0, 1] clamped");
        warnings.push(Warning::ValueClamped {
            field,
            original: value,
            clamped,
        });
    }
    Ok(clamped)
}

/// Ordered, duplicate-free set of dimension names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct DimensionSet {
    names: Vec<String>,
}

impl DimensionSet {
    /// Creates a dimension set, validating that it is non-empty and free of
    /// blank or duplicate names.
    pub fn new<I, S>(names: I) -> Result<Self, VectorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(VectorError::EmptyDimensions);
        }
        let mut seen = HashSet::new();
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(VectorError::BlankDimension(i));
            }
            if !seen.insert(name.as_str()) {
                return Err(VectorError::DuplicateDimension(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// Dimension names in configured order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: an empty set cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of `name` in the configured order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Returns true if `name` is configured.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Iterates over names in configured order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    /// Fails with [`VectorError::UnknownDimension`] unless every name is
    /// configured.
    pub fn require_all<'a, I>(&self, names: I) -> Result<(), VectorError>
    where
        I: IntoIterator<Item = &'a String>,
    {
        for name in names {
            if !self.contains(name) {
                return Err(self.unknown(name));
            }
        }
        Ok(())
    }

    fn unknown(&self, name: &str) -> VectorError {
        VectorError::UnknownDimension {
            name: name.to_string(),
            known: self.names.join(", "),
        }
    }
}

impl TryFrom<Vec<String>> for DimensionSet {
    type Error = VectorError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<DimensionSet> for Vec<String> {
    fn from(set: DimensionSet) -> Self {
        set.names
    }
}

impl<'a> IntoIterator for &'a DimensionSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// Mapping from dimension name to score.
///
/// Insertion order is preserved, but alignment always follows the
/// [`DimensionSet`] order, so callers may supply entries in any order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreVector {
    scores: IndexMap<String, f64>,
}

impl ScoreVector {
    /// Creates an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a vector from `(name, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            scores: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Adds or replaces one score.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.scores.insert(name.into(), value);
        self
    }

    /// Score for `name`, as supplied.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.scores.get(name).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns true if the vector has no entries.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Dimension names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.scores.keys()
    }

    /// Compares the key sets of two vectors.
    ///
    /// `missing` lists names of `self` absent from `other`; `unexpected`
    /// lists names of `other` absent from `self`.
    pub fn check_same_dimensions(&self, other: &ScoreVector) -> Result<(), VectorError> {
        let missing: Vec<String> = self
            .scores
            .keys()
            .filter(|k| !other.scores.contains_key(*k))
            .cloned()
            .collect();
        let unexpected: Vec<String> = other
            .scores
            .keys()
            .filter(|k| !self.scores.contains_key(*k))
            .cloned()
            .collect();

        if missing.is_empty() && unexpected.is_empty() {
            Ok(())
        } else {
            Err(VectorError::DimensionMismatch {
                missing,
                unexpected,
            })
        }
    }

    /// Returns the scores in `dimensions` order, clamped into `[0, 1]`.
    ///
    /// `context` prefixes warning field names (e.g. `previous` gives
    /// `previous.pos`).
    ///
    /// # Errors
    ///
    /// - [`VectorError::UnknownDimension`] for a name outside the set
    /// - [`VectorError::DimensionMismatch`] for configured names not supplied
    /// - [`VectorError::InvalidValue`] for `NaN` scores
    pub fn aligned(
        &self,
        dimensions: &DimensionSet,
        context: &str,
    ) -> Result<Outcome<Vec<f64>>, VectorError> {
        dimensions.require_all(self.scores.keys())?;

        let missing: Vec<String> = dimensions
            .iter()
            .filter(|d| !self.scores.contains_key(*d))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(VectorError::DimensionMismatch {
                missing,
                unexpected: Vec::new(),
            });
        }

        let mut warnings = Vec::new();
        let mut values = Vec::with_capacity(dimensions.len());
        for name in dimensions {
            let raw = self.scores[name.as_str()];
            values.push(clamp_unit(
                format!("{}.{}", context, name),
                raw,
                &mut warnings,
            )?);
        }
        Ok(Outcome::with_warnings(values, warnings))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ScoreVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// A labelled, timestamped score vector for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Display label (e.g. "Week 1").
    pub label: String,
    /// When the underlying answer was recorded.
    pub timestamp: DateTime<Utc>,
    /// Scores for the configured dimensions.
    pub scores: ScoreVector,
}

impl Period {
    /// Creates a period.
    pub fn new(label: impl Into<String>, timestamp: DateTime<Utc>, scores: ScoreVector) -> Self {
        Self {
            label: label.into(),
            timestamp,
            scores,
        }
    }
}

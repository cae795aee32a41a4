//! # Radar Projection
//!
//! Places each configured dimension on its own axis around a center point
//! and turns a score vector into one closed polygon.
//!
//! ## Geometry
//!
//! Dimension `i` of `K` sits at `i * 360 / K` degrees, measured clockwise
//! from 12 o'clock. With the screen convention of `y` growing downward:
//!
//! ```text
//! theta = (angle_i - 90) in radians
//! x     = center.x + v_i * R * cos(theta)
//! y     = center.y + v_i * R * sin(theta)
//! ```
//!
//! so the first dimension always points straight up. The projector is
//! generic over `K >= 3`.
//!
//! ## Selection Limit
//!
//! At most [`MAX_SELECTED_PERIODS`] periods are projected together. A larger
//! selection is rejected outright, never truncated.

use agora_drift::{DimensionSet, Outcome, Period, ScoreVector};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RadarError, Result};

/// Maximum number of periods compared side by side.
pub const MAX_SELECTED_PERIODS: usize = 3;

/// Minimum number of dimensions for a radar.
pub const MIN_DIMENSIONS: usize = 3;

/// A 2D point in abstract drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, growing downward.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One step of a polygon outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    /// Start a new outline at a point.
    MoveTo(Point),
    /// Draw a straight edge to a point.
    LineTo(Point),
    /// Draw the closing edge back to the start.
    Close,
}

/// Polygon for one period: exactly one vertex per dimension, in dimension
/// order, implicitly closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPolygon {
    /// Label of the projected period.
    pub label: String,
    /// Timestamp of the projected period.
    pub timestamp: DateTime<Utc>,
    /// Vertices, one per dimension.
    pub vertices: Vec<Point>,
}

impl RadarPolygon {
    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Outline as `MoveTo`, `K - 1` `LineTo`s and `Close`.
    pub fn path(&self) -> Vec<PathCommand> {
        let mut path = Vec::with_capacity(self.vertices.len() + 1);
        let mut vertices = self.vertices.iter();
        if let Some(first) = vertices.next() {
            path.push(PathCommand::MoveTo(*first));
            path.extend(vertices.map(|p| PathCommand::LineTo(*p)));
            path.push(PathCommand::Close);
        }
        path
    }

    /// Edges including the closing edge from the last vertex to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Center and maximum radius of the radar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarGeometry {
    /// Center of all axes.
    pub center: Point,
    /// Distance from the center of a value of 1.0.
    pub radius: f64,
}

impl RadarGeometry {
    /// Creates a geometry.
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Checks that all coordinates are finite and the radius is positive.
    pub fn validate(&self) -> Result<()> {
        if !(self.center.x.is_finite() && self.center.y.is_finite()) {
            return Err(RadarError::InvalidGeometry(format!(
                "center ({}, {}) is not finite",
                self.center.x, self.center.y
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(RadarError::InvalidGeometry(format!(
                "radius {} must be finite and positive",
                self.radius
            )));
        }
        Ok(())
    }
}

impl Default for RadarGeometry {
    fn default() -> Self {
        Self::new(Point::new(150.0, 150.0), 120.0)
    }
}

/// Projects score vectors onto a radar over a fixed dimension set.
///
/// # Example
///
/// ```rust
/// use agora_drift::{DimensionSet, Period, ScoreVector};
/// use agora_radar::{RadarGeometry, RadarProjector};
/// use chrono::Utc;
///
/// let dims = DimensionSet::new(["pos", "norm", "left"])?;
/// let projector = RadarProjector::new(dims, RadarGeometry::default())?;
///
/// let period = Period::new(
///     "Week 1",
///     Utc::now(),
///     ScoreVector::from_pairs([("pos", 1.0), ("norm", 0.5), ("left", 0.0)]),
/// );
/// let polygons = projector.project(&[period])?.into_value();
/// assert_eq!(polygons[0].len(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct RadarProjector {
    dimensions: DimensionSet,
    geometry: RadarGeometry,
}

impl RadarProjector {
    /// Creates a projector.
    ///
    /// # Errors
    ///
    /// - [`RadarError::TooFewDimensions`] for fewer than three dimensions
    /// - [`RadarError::InvalidGeometry`] for a non-finite center or a
    ///   non-positive radius
    pub fn new(dimensions: DimensionSet, geometry: RadarGeometry) -> Result<Self> {
        if dimensions.len() < MIN_DIMENSIONS {
            return Err(RadarError::TooFewDimensions {
                found: dimensions.len(),
                minimum: MIN_DIMENSIONS,
            });
        }
        geometry.validate()?;
        Ok(Self {
            dimensions,
            geometry,
        })
    }

    /// Configured dimensions.
    pub fn dimensions(&self) -> &DimensionSet {
        &self.dimensions
    }

    /// Configured center and radius.
    pub fn geometry(&self) -> &RadarGeometry {
        &self.geometry
    }

    /// Clockwise angle of dimension `index` from 12 o'clock, in degrees.
    pub fn angle_of(&self, index: usize) -> f64 {
        index as f64 * 360.0 / self.dimensions.len() as f64
    }

    /// Point for `value` on the axis of dimension `index`.
    pub fn point_at(&self, index: usize, value: f64) -> Point {
        let theta = (self.angle_of(index) - 90.0).to_radians();
        let distance = value * self.geometry.radius;
        Point::new(
            self.geometry.center.x + distance * theta.cos(),
            self.geometry.center.y + distance * theta.sin(),
        )
    }

    /// Vertices of a single score vector, in dimension order.
    ///
    /// `context` prefixes the field names of clamping warnings.
    pub fn project_vector(&self, scores: &ScoreVector, context: &str) -> Result<Outcome<Vec<Point>>> {
        let aligned = scores.aligned(&self.dimensions, context)?;
        Ok(aligned.map(|values| {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| self.point_at(i, *v))
                .collect()
        }))
    }

    /// One polygon per selected period, in selection order.
    ///
    /// # Errors
    ///
    /// - [`RadarError::EmptySelection`] for an empty selection
    /// - [`RadarError::SelectionLimitExceeded`] for more than
    ///   [`MAX_SELECTED_PERIODS`] periods
    /// - [`RadarError::Vector`] if any period does not cover exactly the
    ///   configured dimensions
    pub fn project(&self, periods: &[Period]) -> Result<Outcome<Vec<RadarPolygon>>> {
        check_selection(periods.len())?;

        let mut polygons = Vec::with_capacity(periods.len());
        let mut warnings = Vec::new();
        for period in periods {
            let outcome = self.project_vector(&period.scores, &period.label)?;
            warnings.extend(outcome.warnings);
            polygons.push(RadarPolygon {
                label: period.label.clone(),
                timestamp: period.timestamp,
                vertices: outcome.value,
            });
        }

        debug!(
            periods = polygons.len(),
            dimensions = self.dimensions.len(),
            "projected radar polygons"
        );
        Ok(Outcome::with_warnings(polygons, warnings))
    }
}

/// Rejects empty and oversized selections.
pub(crate) fn check_selection(requested: usize) -> Result<()> {
    if requested == 0 {
        return Err(RadarError::EmptySelection);
    }
    if requested > MAX_SELECTED_PERIODS {
        warn!(requested, limit = MAX_SELECTED_PERIODS, "period selection rejected");
        return Err(RadarError::SelectionLimitExceeded {
            requested,
            limit: MAX_SELECTED_PERIODS,
        });
    }
    Ok(())
}

//! Radar background: one labelled axis per dimension and concentric rings.

use serde::{Deserialize, Serialize};

use crate::projector::{Point, RadarProjector};

/// Axis of one dimension, from the center to the full radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Dimension name, used as the axis label.
    pub dimension: String,
    /// Clockwise angle from 12 o'clock, in degrees.
    pub angle_degrees: f64,
    /// Point at value 1.0.
    pub end: Point,
}

/// Ring joining all axes at one fraction of the radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRing {
    /// 1-based ring index, innermost first.
    pub level: usize,
    /// Value represented by the ring.
    pub fraction: f64,
    /// One point per axis.
    pub vertices: Vec<Point>,
}

/// Axes and rings of a radar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarGrid {
    /// Common origin of all axes.
    pub center: Point,
    /// Axes in dimension order.
    pub axes: Vec<Axis>,
    /// Rings at `1/levels, 2/levels, ..., 1.0`.
    pub rings: Vec<GridRing>,
}

impl RadarProjector {
    /// Builds the background grid with `levels` evenly spaced rings.
    /// Zero levels yields axes only.
    pub fn grid(&self, levels: usize) -> RadarGrid {
        let axes = self
            .dimensions()
            .iter()
            .enumerate()
            .map(|(i, name)| Axis {
                dimension: name.clone(),
                angle_degrees: self.angle_of(i),
                end: self.point_at(i, 1.0),
            })
            .collect();

        let rings = (1..=levels)
            .map(|level| {
                let fraction = level as f64 / levels as f64;
                GridRing {
                    level,
                    fraction,
                    vertices: (0..self.dimensions().len())
                        .map(|i| self.point_at(i, fraction))
                        .collect(),
                }
            })
            .collect();

        RadarGrid {
            center: self.geometry().center,
            axes,
            rings,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::projector::RadarGeometry;
    use agora_drift::DimensionSet;

    use super::*;

    fn projector() -> RadarProjector {
        let dims = DimensionSet::new(["pos", "norm", "left", "right", "green", "emotion"]).unwrap();
        RadarProjector::new(dims, RadarGeometry::new(Point::new(0.0, 0.0), 100.0)).unwrap()
    }

    #[test]
    fn test_axes_are_labelled_and_evenly_spaced() {
        let grid = projector().grid(5);
        let labels: Vec<&str> = grid.axes.iter().map(|a| a.dimension.as_str()).collect();
        assert_eq!(labels, ["pos", "norm", "left", "right", "green", "emotion"]);

        for (i, axis) in grid.axes.iter().enumerate() {
            assert!((axis.angle_degrees - 60.0 * i as f64).abs() < 1e-9);
            assert!((axis.end.distance_to(&grid.center) - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rings_scale_evenly() {
        let grid = projector().grid(4);
        assert_eq!(grid.rings.len(), 4);
        assert_eq!(grid.rings[0].level, 1);
        assert!((grid.rings[0].fraction - 0.25).abs() < 1e-9);
        assert!((grid.rings[3].fraction - 1.0).abs() < 1e-9);

        for ring in &grid.rings {
            assert_eq!(ring.vertices.len(), 6);
            for v in &ring.vertices {
                assert!((v.distance_to(&grid.center) - ring.fraction * 100.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_levels_has_no_rings() {
        let grid = projector().grid(0);
        assert!(grid.rings.is_empty());
        assert_eq!(grid.axes.len(), 6);
    }
}

//! Rendering adapter.
//!
//! Turns radar geometry and consensus results into abstract drawing
//! primitives and hands them to a [`RenderTarget`]. Nothing here knows about
//! pixels, SVG or terminals; a target decides how each primitive looks.
//!
//! Draw order for a radar is rings, then axes, then one polygon per period,
//! so later primitives sit on top of earlier ones.

use agora_council::{ConsensusResult, VoteTally};
use agora_radar::{PathCommand, Point, RadarGrid, RadarPolygon};
use serde::{Deserialize, Serialize};

/// One drawable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Labelled axis from the center to full radius.
    Axis {
        /// Dimension name.
        label: String,
        /// Radar center.
        from: Point,
        /// Point at value 1.0.
        to: Point,
    },
    /// Background ring.
    Ring {
        /// 1-based ring index, innermost first.
        level: usize,
        /// Closed outline.
        outline: Vec<PathCommand>,
    },
    /// Period polygon.
    Polygon {
        /// Period label.
        label: String,
        /// Position in the selection, used to pick a style.
        series: usize,
        /// Closed outline.
        outline: Vec<PathCommand>,
    },
    /// Vote count of one candidate.
    Bar {
        /// Candidate name.
        label: String,
        /// Number of valid votes.
        value: usize,
        /// Fraction of all valid votes.
        share: f64,
        /// Set for the consensus winner.
        highlighted: bool,
    },
}

/// Anything that can draw primitives.
pub trait RenderTarget {
    /// Draws one primitive.
    fn draw(&mut self, primitive: Primitive);
}

/// Collects primitives in draw order.
impl RenderTarget for Vec<Primitive> {
    fn draw(&mut self, primitive: Primitive) {
        self.push(primitive);
    }
}

/// Draws a radar background and the given polygons.
pub fn render_radar(grid: &RadarGrid, polygons: &[RadarPolygon], target: &mut impl RenderTarget) {
    for ring in &grid.rings {
        target.draw(Primitive::Ring {
            level: ring.level,
            outline: closed_outline(&ring.vertices),
        });
    }

    for axis in &grid.axes {
        target.draw(Primitive::Axis {
            label: axis.dimension.clone(),
            from: grid.center,
            to: axis.end,
        });
    }

    for (series, polygon) in polygons.iter().enumerate() {
        target.draw(Primitive::Polygon {
            label: polygon.label.clone(),
            series,
            outline: polygon.path(),
        });
    }
}

/// Draws one bar per candidate, in order of first valid vote.
pub fn render_consensus(
    result: &ConsensusResult,
    tally: &VoteTally,
    target: &mut impl RenderTarget,
) {
    for (candidate, &count) in &tally.counts {
        target.draw(Primitive::Bar {
            label: candidate.to_string(),
            value: count,
            share: tally.share_of(candidate),
            highlighted: result.winner.as_ref() == Some(candidate),
        });
    }
}

fn closed_outline(vertices: &[Point]) -> Vec<PathCommand> {
    let Some((first, rest)) = vertices.split_first() else {
        return Vec::new();
    };
    let mut outline = Vec::with_capacity(vertices.len() + 1);
    outline.push(PathCommand::MoveTo(*first));
    outline.extend(rest.iter().map(|p| PathCommand::LineTo(*p)));
    outline.push(PathCommand::Close);
    outline
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_council::{ConsensusEngine, Vote, VoteSet};
    use agora_drift::DimensionSet;
    use agora_radar::{RadarGeometry, RadarProjector};

    #[test]
    fn test_radar_draw_order() {
        let projector = RadarProjector::new(
            DimensionSet::new(["a", "b", "c", "d"]).unwrap(),
            RadarGeometry::default(),
        )
        .unwrap();
        let grid = projector.grid(2);

        let mut target = Vec::new();
        render_radar(&grid, &[], &mut target);

        assert_eq!(target.len(), 6);
        assert!(matches!(target[0], Primitive::Ring { level: 1, .. }));
        assert!(matches!(target[1], Primitive::Ring { level: 2, .. }));
        assert!(matches!(&target[2], Primitive::Axis { label, .. } if label == "a"));

        let Primitive::Ring { outline, .. } = &target[1] else {
            panic!("expected ring");
        };
        assert_eq!(outline.len(), 5);
        assert_eq!(outline.last(), Some(&PathCommand::Close));
    }

    #[test]
    fn test_consensus_bars_highlight_winner() {
        let votes = VoteSet::new(vec![
            Vote::for_candidate("A", "X"),
            Vote::for_candidate("B", "Y"),
            Vote::for_candidate("C", "Y"),
            Vote::abstain("D"),
        ]);
        let (result, tally) = ConsensusEngine::new().evaluate(&votes);

        let mut target = Vec::new();
        render_consensus(&result, &tally, &mut target);

        assert_eq!(
            target,
            vec![
                Primitive::Bar {
                    label: "X".into(),
                    value: 1,
                    share: 1.0 / 3.0,
                    highlighted: false,
                },
                Primitive::Bar {
                    label: "Y".into(),
                    value: 2,
                    share: 2.0 / 3.0,
                    highlighted: true,
                },
            ]
        );
    }

    #[test]
    fn test_empty_tally_draws_nothing() {
        let (result, tally) = ConsensusEngine::new().evaluate(&VoteSet::default());
        let mut target = Vec::new();
        render_consensus(&result, &tally, &mut target);
        assert!(target.is_empty());
    }
}

//! Radar projection and summary behavior over realistic dimension sets.

use agora_drift::{DimensionSet, Period, ScoreVector};
use agora_radar::{
    ChangeLabel, PathCommand, Point, RadarError, RadarGeometry, RadarProjector,
};
use chrono::{Duration, TimeZone, Utc};

const DIMENSIONS: [&str; 6] = ["pos", "norm", "left", "right", "green", "emotion"];
const EPS: f64 = 1e-9;

fn projector() -> RadarProjector {
    RadarProjector::new(
        DimensionSet::new(DIMENSIONS).unwrap(),
        RadarGeometry::new(Point::new(150.0, 150.0), 120.0),
    )
    .unwrap()
}

fn period(label: &str, week: i64, values: [f64; 6]) -> Period {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Period::new(
        label,
        start + Duration::weeks(week),
        DIMENSIONS.iter().copied().zip(values).collect::<ScoreVector>(),
    )
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_six_dimensions_at_sixty_degree_spacing() {
    let p = projector();
    let values = [0.3, 0.2, 0.4, 0.3, 0.2, 0.2];
    let polygons = p
        .project(&[period("Week 1", 0, values)])
        .unwrap()
        .into_value();

    assert_eq!(polygons.len(), 1);
    let vertices = &polygons[0].vertices;
    assert_eq!(vertices.len(), 6);

    // First vertex directly above the center at 0.3 * R.
    assert!((vertices[0].x - 150.0).abs() < EPS);
    assert!((vertices[0].y - (150.0 - 0.3 * 120.0)).abs() < EPS);

    for (i, (vertex, value)) in vertices.iter().zip(values).enumerate() {
        assert!((p.angle_of(i) - 60.0 * i as f64).abs() < EPS);

        let dx = vertex.x - 150.0;
        let dy = vertex.y - 150.0;
        assert!((dx.hypot(dy) - value * 120.0).abs() < EPS);

        // Clockwise from 12 o'clock in screen coordinates.
        let clockwise = (dy.atan2(dx).to_degrees() + 90.0).rem_euclid(360.0);
        assert!((clockwise - 60.0 * i as f64).abs() < 1e-6);
    }
}

#[test]
fn test_vertex_count_matches_any_dimension_count() {
    for k in 3..=12 {
        let names: Vec<String> = (0..k).map(|i| format!("d{i}")).collect();
        let dims = DimensionSet::new(names.clone()).unwrap();
        let p = RadarProjector::new(dims, RadarGeometry::default()).unwrap();

        let scores: ScoreVector = names.iter().map(|n| (n.as_str(), 0.5)).collect();
        let polygons = p
            .project(&[Period::new("now", Utc::now(), scores)])
            .unwrap()
            .into_value();

        assert_eq!(polygons[0].len(), k);
        let path = polygons[0].path();
        assert_eq!(path.len(), k + 1);
        assert_eq!(path.last(), Some(&PathCommand::Close));
    }
}

#[test]
fn test_three_periods_keep_selection_order() {
    let p = projector();
    let polygons = p
        .project(&[
            period("Week 3", 2, [0.5; 6]),
            period("Week 1", 0, [0.1; 6]),
            period("Week 2", 1, [0.3; 6]),
        ])
        .unwrap()
        .into_value();

    let labels: Vec<&str> = polygons.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, ["Week 3", "Week 1", "Week 2"]);
}

#[test]
fn test_fourth_period_is_always_rejected() {
    let p = projector();
    let periods: Vec<Period> = (0..4)
        .map(|w| period(&format!("Week {}", w + 1), w, [0.5; 6]))
        .collect();

    assert_eq!(
        p.project(&periods).unwrap_err(),
        RadarError::SelectionLimitExceeded {
            requested: 4,
            limit: 3
        }
    );
    assert!(p.project(&periods[..3]).is_ok());
}

// ============================================================================
// Change Summary
// ============================================================================

#[test]
fn test_average_increase_of_quarter_is_significant() {
    let p = projector();
    let summary = p
        .summarize(&[
            period("Week 1", 0, [0.1, 0.2, 0.3, 0.1, 0.2, 0.3]),
            period("Week 4", 3, [0.35, 0.45, 0.55, 0.35, 0.45, 0.55]),
        ])
        .unwrap()
        .into_value();

    assert!((summary.avg_change - 0.25).abs() < EPS);
    assert_eq!(summary.label, ChangeLabel::SignificantIncrease);
    assert_eq!(summary.label.to_string(), "significant increase");
}

#[test]
fn test_small_change_is_stable() {
    let p = projector();
    let summary = p
        .summarize(&[
            period("Week 1", 0, [0.5; 6]),
            period("Week 2", 1, [0.55; 6]),
        ])
        .unwrap()
        .into_value();
    assert_eq!(summary.label, ChangeLabel::Stable);
}

#[test]
fn test_summary_serializes_label_in_snake_case() {
    let p = projector();
    let summary = p
        .summarize(&[
            period("Week 1", 0, [0.5; 6]),
            period("Week 2", 1, [0.35; 6]),
        ])
        .unwrap()
        .into_value();

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["label"], "decrease");
    assert_eq!(json["from_label"], "Week 1");
}

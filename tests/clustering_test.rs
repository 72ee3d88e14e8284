use nalgebra as na;
use ttc_fusion::TtcError;
use ttc_fusion::clustering::{cluster_range_points, crop_range_points};
use ttc_fusion::config::CropConfig;
use ttc_fusion::projection::Projector;
use ttc_fusion::types::{RangePoint, Region, Roi};

/// Pinhole looking along lidar x with f = 100, c = (200, 100).
fn simple_projector() -> Projector {
    Projector::from_matrix(na::Matrix3x4::new(
        200.0, -100.0, 0.0, 0.0, //
        100.0, 0.0, -100.0, 0.0, //
        1.0, 0.0, 0.0, 0.0,
    ))
}

/// Range point at depth 10 that projects onto pixel `(u, v)`.
fn point_at(u: f64, v: f64) -> RangePoint {
    RangePoint::new(10.0, (200.0 - u) / 10.0, (100.0 - v) / 10.0, 0.5)
}

#[test]
fn test_roi_shrink() {
    let roi = Roi::new(100.0, 50.0, 100.0, 40.0);
    let small = roi.shrink(0.1);
    assert!((small.x - 105.0).abs() < 1e-5);
    assert!((small.y - 52.0).abs() < 1e-5);
    assert!((small.width - 90.0).abs() < 1e-5);
    assert!((small.height - 36.0).abs() < 1e-5);
    assert!((roi.center() - small.center()).length() < 1e-4);
    assert_eq!(roi.shrink(0.0), roi);
}

#[test]
fn test_single_region_assignment() {
    let projector = simple_projector();
    let mut regions = vec![
        Region::new(3, Roi::new(100.0, 50.0, 100.0, 100.0)),
        Region::new(7, Roi::new(300.0, 50.0, 100.0, 100.0)),
    ];
    let points = vec![
        point_at(150.0, 100.0), // region 3
        point_at(350.0, 100.0), // region 7
        point_at(250.0, 100.0), // none
        point_at(151.0, 90.0),  // region 3
    ];
    let stats = cluster_range_points(&mut regions, &points, 0.0, &projector).unwrap();
    assert_eq!(stats.assigned, 3);
    assert_eq!(stats.unassigned, 1);
    assert_eq!(stats.ambiguous, 0);
    assert_eq!(regions[0].range_points, vec![points[0], points[3]]);
    assert_eq!(regions[1].range_points, vec![points[1]]);
}

#[test]
fn test_overlapping_regions_discard_point() {
    let projector = simple_projector();
    let mut regions = vec![
        Region::new(0, Roi::new(100.0, 50.0, 100.0, 100.0)),
        Region::new(1, Roi::new(150.0, 50.0, 100.0, 100.0)),
    ];
    // inside both rectangles
    let points = vec![point_at(175.0, 100.0), point_at(120.0, 100.0)];
    let stats = cluster_range_points(&mut regions, &points, 0.0, &projector).unwrap();
    assert_eq!(stats.ambiguous, 1);
    assert_eq!(regions[0].range_points, vec![points[1]]);
    assert!(regions[1].range_points.is_empty());
}

#[test]
fn test_shrink_resolves_overlap_and_trims_edges() {
    let projector = simple_projector();
    let mut regions = vec![
        Region::new(0, Roi::new(100.0, 50.0, 100.0, 100.0)),
        Region::new(1, Roi::new(190.0, 50.0, 100.0, 100.0)),
    ];
    let points = vec![
        point_at(195.0, 100.0), // overlap of the full boxes, in neither after shrinking
        point_at(102.0, 100.0), // trimmed edge of region 0
    ];
    let stats = cluster_range_points(&mut regions, &points, 0.2, &projector).unwrap();
    // region 0 shrinks to x in [110, 190), region 1 to [200, 280)
    assert_eq!(stats.assigned, 0);
    assert_eq!(stats.unassigned, 2);

    let mut regions = vec![
        Region::new(0, Roi::new(100.0, 50.0, 100.0, 100.0)),
        Region::new(1, Roi::new(150.0, 50.0, 100.0, 100.0)),
    ];
    let points = vec![point_at(190.0, 100.0)];
    // shrunk: [105, 195) and [155, 245), still both
    cluster_range_points(&mut regions, &points, 0.1, &projector).unwrap();
    assert!(regions.iter().all(|r| r.range_points.is_empty()));

    let mut regions = vec![
        Region::new(0, Roi::new(100.0, 50.0, 100.0, 100.0)),
        Region::new(1, Roi::new(150.0, 50.0, 100.0, 100.0)),
    ];
    let points = vec![point_at(152.0, 100.0)];
    // shrunk: [130, 170) and [180, 220)
    cluster_range_points(&mut regions, &points, 0.6, &projector).unwrap();
    assert_eq!(regions[0].range_points, points);
    assert!(regions[1].range_points.is_empty());
}

#[test]
fn test_unprojectable_points_are_skipped() {
    let projector = simple_projector();
    let mut regions = vec![Region::new(0, Roi::new(0.0, 0.0, 400.0, 200.0))];
    let points = vec![RangePoint::new(0.0, 0.0, 0.0, 1.0), point_at(100.0, 100.0)];
    let stats = cluster_range_points(&mut regions, &points, 0.1, &projector).unwrap();
    assert_eq!(stats.unprojectable, 1);
    assert_eq!(stats.assigned, 1);
}

#[test]
fn test_invalid_shrink_factor() {
    let projector = simple_projector();
    let mut regions = vec![Region::new(0, Roi::new(0.0, 0.0, 400.0, 200.0))];
    for factor in [1.0, -0.1, f32::NAN] {
        let result = cluster_range_points(&mut regions, &[], factor, &projector);
        assert!(matches!(result, Err(TtcError::InvalidShrinkFactor(_))));
    }
}

#[test]
fn test_crop_range_points() {
    let crop = CropConfig::default();
    let points = vec![
        RangePoint::new(8.0, 0.5, -1.2, 0.5),  // kept
        RangePoint::new(1.0, 0.5, -1.2, 0.5),  // too close
        RangePoint::new(25.0, 0.5, -1.2, 0.5), // too far
        RangePoint::new(8.0, 2.5, -1.2, 0.5),  // outside lane
        RangePoint::new(8.0, -1.9, -1.6, 0.5), // road surface
        RangePoint::new(8.0, -1.9, -0.5, 0.5), // too high
        RangePoint::new(8.0, -1.9, -1.0, 0.05), // too dark
        RangePoint::new(20.0, -2.0, -0.9, 0.1), // on the boundary
    ];
    let kept = crop_range_points(&points, &crop);
    assert_eq!(kept, vec![points[0], points[7]]);
}

#[test]
fn test_reclustering_replaces_points() {
    let projector = simple_projector();
    let mut regions = vec![Region::new(0, Roi::new(100.0, 50.0, 100.0, 100.0))];
    regions[0].range_points.push(point_at(350.0, 100.0));
    let points = vec![point_at(150.0, 100.0), point_at(160.0, 110.0)];

    cluster_range_points(&mut regions, &points, 0.1, &projector).unwrap();
    assert_eq!(regions[0].range_points, points);
    let stats = cluster_range_points(&mut regions, &points, 0.1, &projector).unwrap();
    assert_eq!(stats.assigned, 2);
    assert_eq!(regions[0].range_points, points);
}

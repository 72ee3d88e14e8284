use ttc_fusion::keypoint_filter::{cluster_keypoint_matches, correspondences_in_roi};
use ttc_fusion::types::{Correspondence, Keypoint, Region, Roi};

fn scene() -> (Region, Vec<Keypoint>, Vec<Correspondence>) {
    let region = Region::new(2, Roi::new(100.0, 100.0, 100.0, 100.0));
    let curr = vec![
        Keypoint::new(110.0, 110.0),
        Keypoint::new(120.0, 150.0),
        Keypoint::new(150.0, 150.0),
        Keypoint::new(190.0, 190.0),
        Keypoint::new(10.0, 10.0),   // outside
        Keypoint::new(200.0, 150.0), // right edge is exclusive
    ];
    let matches = vec![
        Correspondence::new(0, 0, 10.0),
        Correspondence::new(1, 1, 20.0),
        Correspondence::new(2, 2, 30.0),
        Correspondence::new(3, 3, 60.0),
        Correspondence::new(4, 4, 1.0),
        Correspondence::new(5, 5, 1.0),
    ];
    (region, curr, matches)
}

#[test]
fn test_roi_selection() {
    let (region, curr, matches) = scene();
    let in_roi = correspondences_in_roi(&region, &curr, &matches);
    assert_eq!(in_roi, matches[0..4].to_vec());
}

#[test]
fn test_distance_threshold() {
    let (mut region, curr, matches) = scene();
    // mean 30, threshold 24
    let attached = cluster_keypoint_matches(&mut region, &curr, &matches, 0.8);
    assert_eq!(attached, 2);
    assert_eq!(region.matches, vec![matches[0], matches[1]]);
    assert_eq!(region.keypoint_indices, vec![0, 1]);
}

#[test]
fn test_retained_subset_below_threshold() {
    let (mut region, curr, _) = scene();
    let matches: Vec<_> = (0..4)
        .flat_map(|i| (0..5).map(move |k| Correspondence::new(i, i, (k * 7 + i) as f32)))
        .collect();
    let in_roi = correspondences_in_roi(&region, &curr, &matches);
    let mean = in_roi.iter().map(|m| m.distance as f64).sum::<f64>() / in_roi.len() as f64;

    cluster_keypoint_matches(&mut region, &curr, &matches, 0.8);
    assert!(!region.matches.is_empty());
    for m in &region.matches {
        assert!(in_roi.contains(m));
        assert!((m.distance as f64) < 0.8 * mean);
    }
}

#[test]
fn test_equal_distances_are_all_rejected() {
    let (mut region, curr, _) = scene();
    let matches: Vec<_> = (0..4).map(|i| Correspondence::new(i, i, 25.0)).collect();
    assert_eq!(cluster_keypoint_matches(&mut region, &curr, &matches, 0.8), 0);
    // a ratio above one keeps everything strictly below the scaled mean
    assert_eq!(cluster_keypoint_matches(&mut region, &curr, &matches, 1.01), 4);
}

#[test]
fn test_empty_selection() {
    let (mut region, curr, matches) = scene();
    region.roi = Roi::new(500.0, 500.0, 10.0, 10.0);
    assert_eq!(cluster_keypoint_matches(&mut region, &curr, &matches, 0.8), 0);
    assert!(region.matches.is_empty());

    // unknown keypoint index is never selected
    let (mut region, curr, _) = scene();
    let matches = vec![Correspondence::new(0, 99, 1.0)];
    assert_eq!(cluster_keypoint_matches(&mut region, &curr, &matches, 0.8), 0);
}

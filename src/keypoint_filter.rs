use log::{debug, trace};

use crate::types::{Correspondence, Keypoint, Region};

/// Correspondences whose current keypoint lies inside `region.roi`.
pub fn correspondences_in_roi(
    region: &Region,
    curr_keypoints: &[Keypoint],
    matches: &[Correspondence],
) -> Vec<Correspondence> {
    matches
        .iter()
        .filter(|m| {
            curr_keypoints
                .get(m.curr_idx)
                .is_some_and(|kp| region.roi.contains(kp.pt))
        })
        .copied()
        .collect()
}

/// Attaches the trusted correspondences enclosed by `region`.
///
/// A correspondence is trusted when its distance is strictly below
/// `distance_ratio` times the mean distance of all enclosed correspondences.
/// Returns the number attached.
pub fn cluster_keypoint_matches(
    region: &mut Region,
    curr_keypoints: &[Keypoint],
    matches: &[Correspondence],
    distance_ratio: f64,
) -> usize {
    let in_roi = correspondences_in_roi(region, curr_keypoints, matches);
    if in_roi.is_empty() {
        trace!("region {} encloses no keypoint matches", region.id);
        return 0;
    }
    let mean = in_roi.iter().map(|m| m.distance as f64).sum::<f64>() / in_roi.len() as f64;
    let threshold = mean * distance_ratio;

    let before = region.matches.len();
    for m in in_roi.iter().filter(|m| (m.distance as f64) < threshold) {
        region.matches.push(*m);
        region.keypoint_indices.push(m.curr_idx);
    }
    let attached = region.matches.len() - before;
    debug!(
        "region {}: kept {} of {} keypoint matches (mean distance {:.3})",
        region.id,
        attached,
        in_roi.len(),
        mean
    );
    attached
}

use log::{debug, trace};

use super::{frame_interval, upper_median};
use crate::error::{Result, TtcError};
use crate::types::{Correspondence, Keypoint};

/// Current-to-previous distance ratios for every unordered pair of matches
/// whose keypoints are at least `min_dist` pixels apart in both frames.
pub fn distance_ratios(
    prev_keypoints: &[Keypoint],
    curr_keypoints: &[Keypoint],
    matches: &[Correspondence],
    min_dist: f64,
) -> Vec<f64> {
    let points: Vec<_> = matches
        .iter()
        .filter_map(|m| {
            let prev = prev_keypoints.get(m.prev_idx)?;
            let curr = curr_keypoints.get(m.curr_idx)?;
            Some((prev.pt.as_dvec2(), curr.pt.as_dvec2()))
        })
        .collect();

    let mut ratios = Vec::new();
    for (i, (prev0, curr0)) in points.iter().enumerate() {
        for (prev1, curr1) in &points[i + 1..] {
            let h1 = curr0.distance(*curr1);
            let h0 = prev0.distance(*prev1);
            if h0 > 0.0 && h1 > min_dist && h0 > min_dist {
                ratios.push(h1 / h0);
            }
        }
    }
    trace!(
        "{} of {} keypoint pairs kept",
        ratios.len(),
        points.len() * points.len().saturating_sub(1) / 2
    );
    ratios
}

/// TTC from the median keypoint scale change, `-dt / (1 - r)`.
pub fn compute_ttc_camera(
    prev_keypoints: &[Keypoint],
    curr_keypoints: &[Keypoint],
    matches: &[Correspondence],
    frame_rate: f64,
    min_dist: f64,
) -> Result<f64> {
    let dt = frame_interval(frame_rate)?;
    let ratios = distance_ratios(prev_keypoints, curr_keypoints, matches, min_dist);
    let count = ratios.len();
    let ratio = upper_median(ratios).ok_or(TtcError::InsufficientData(
        "no keypoint pairs pass the distance threshold",
    ))?;

    let denom = 1.0 - ratio;
    if denom.abs() < f64::EPSILON {
        return Err(TtcError::Indeterminate);
    }
    let ttc = -dt / denom;
    debug!(
        "camera ttc: {} ratios, median {:.5} dt {:.3} -> {:.3} s",
        count, ratio, dt, ttc
    );
    Ok(ttc)
}

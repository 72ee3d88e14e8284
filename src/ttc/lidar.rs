use log::debug;

use super::{frame_interval, upper_median};
use crate::error::{Result, TtcError};
use crate::types::RangePoint;

/// TTC from the median forward distance of a region's lidar points.
///
/// `ttc = d1 * dt / (d0 - d1)` with `d0`, `d1` the previous and current medians.
/// A receding object yields a negative value.
pub fn compute_ttc_lidar(
    prev_points: &[RangePoint],
    curr_points: &[RangePoint],
    frame_rate: f64,
) -> Result<f64> {
    let dt = frame_interval(frame_rate)?;
    let d0 = upper_median(prev_points.iter().map(|p| p.x).collect())
        .ok_or(TtcError::InsufficientData("no lidar points in previous frame"))?;
    let d1 = upper_median(curr_points.iter().map(|p| p.x).collect())
        .ok_or(TtcError::InsufficientData("no lidar points in current frame"))?;

    let closing = d0 - d1;
    if closing.abs() < f64::EPSILON {
        return Err(TtcError::Indeterminate);
    }
    let ttc = d1 * dt / closing;
    debug!("lidar ttc: d0 {:.3} d1 {:.3} dt {:.3} -> {:.3} s", d0, d1, dt, ttc);
    Ok(ttc)
}

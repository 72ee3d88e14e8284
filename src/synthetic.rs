//! Synthetic frame pairs of a leading vehicle approaching the ego vehicle.
//!
//! The lead vehicle's rear is modeled as a vertical plane at forward distance
//! `x`. Its lidar returns, keypoints and region are all derived from the same
//! calibration, so the expected TTC is `d1 * dt / (d0 - d1)` in both modalities.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::projection::Projector;
use crate::types::{Correspondence, Frame, FramePair, Keypoint, RangePoint, Region, RegionId, Roi};

/// Lateral half width and vertical extent of a vehicle rear, in meters.
const HALF_WIDTH: f64 = 0.9;
const BOTTOM: f64 = -1.5;
const TOP: f64 = 0.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub seed: u64,
    pub frame_rate: f64,
    /// Forward distance of the lead vehicle in the previous frame.
    pub prev_distance: f64,
    /// Closing speed in m/s. Negative values make the lead vehicle recede.
    pub closing_speed: f64,
    pub lidar_points: usize,
    pub keypoints: usize,
    pub keypoint_noise_px: f32,
    /// Fraction of correspondences that are random mismatches.
    pub outlier_ratio: f64,
    /// Adds a parked vehicle in the neighbouring lane.
    pub with_neighbor: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            frame_rate: 10.0,
            prev_distance: 8.0,
            closing_speed: 4.0,
            lidar_points: 200,
            keypoints: 60,
            keypoint_noise_px: 0.3,
            outlier_ratio: 0.1,
            with_neighbor: true,
        }
    }
}

impl SceneConfig {
    pub fn curr_distance(&self) -> f64 {
        self.prev_distance - self.closing_speed / self.frame_rate
    }

    pub fn expected_ttc(&self) -> f64 {
        let d1 = self.curr_distance();
        d1 / self.closing_speed
    }
}

/// Region ids used by the generated frames. The detector does not keep ids
/// stable, so the current frame swaps them.
pub const LEAD_PREV_ID: RegionId = 0;
pub const LEAD_CURR_ID: RegionId = 1;
pub const NEIGHBOR_PREV_ID: RegionId = 1;
pub const NEIGHBOR_CURR_ID: RegionId = 0;

struct Vehicle {
    x: f64,
    y: f64,
}

impl Vehicle {
    fn roi(&self, projector: &Projector) -> Result<Roi> {
        let corners = [
            RangePoint::new(self.x, self.y + HALF_WIDTH, TOP, 1.0),
            RangePoint::new(self.x, self.y - HALF_WIDTH, BOTTOM, 1.0),
        ];
        let a = projector.project(&corners[0])?;
        let b = projector.project(&corners[1])?;
        let min = a.min(b);
        let max = a.max(b);
        Ok(Roi::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }
}

fn lidar_returns(rng: &mut ChaCha8Rng, vehicle: &Vehicle, n: usize) -> Vec<RangePoint> {
    (0..n)
        .map(|_| {
            RangePoint::new(
                vehicle.x + rng.random_range(-0.02..0.02),
                vehicle.y + rng.random_range(-0.7..0.7),
                rng.random_range(-1.35..-0.95),
                rng.random_range(0.2..1.0),
            )
        })
        .collect()
}

/// Surface points on a vehicle rear, relative to its center.
fn surface_points(rng: &mut ChaCha8Rng, n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|_| {
            (
                rng.random_range(-0.85..0.85),
                rng.random_range(BOTTOM + 0.05..TOP - 0.05),
            )
        })
        .collect()
}

fn observe(
    rng: &mut ChaCha8Rng,
    projector: &Projector,
    vehicle: &Vehicle,
    surface: &[(f64, f64)],
    noise: f32,
) -> Result<Vec<Keypoint>> {
    surface
        .iter()
        .map(|(dy, z)| {
            let pt = projector.project(&RangePoint::new(vehicle.x, vehicle.y + dy, *z, 1.0))?;
            let jitter = glam::Vec2::new(
                rng.random_range(-noise..=noise),
                rng.random_range(-noise..=noise),
            );
            Ok(Keypoint {
                pt: pt + jitter,
                size: 7.0,
            })
        })
        .collect()
}

/// Appends one vehicle's keypoints to both frames and links them.
#[allow(clippy::too_many_arguments)]
fn add_keypoints(
    rng: &mut ChaCha8Rng,
    projector: &Projector,
    config: &SceneConfig,
    prev_vehicle: &Vehicle,
    curr_vehicle: &Vehicle,
    prev: &mut Frame,
    curr: &mut Frame,
    matches: &mut Vec<Correspondence>,
) -> Result<()> {
    let surface = surface_points(rng, config.keypoints);
    let prev_kps = observe(rng, projector, prev_vehicle, &surface, config.keypoint_noise_px)?;
    let curr_kps = observe(rng, projector, curr_vehicle, &surface, config.keypoint_noise_px)?;
    let prev_offset = prev.keypoints.len();
    let curr_offset = curr.keypoints.len();
    prev.keypoints.extend(prev_kps);
    curr.keypoints.extend(curr_kps);

    for i in 0..config.keypoints {
        let m = if rng.random_bool(config.outlier_ratio.clamp(0.0, 1.0)) {
            Correspondence::new(
                prev_offset + i,
                curr_offset + rng.random_range(0..config.keypoints),
                rng.random_range(70.0..120.0),
            )
        } else {
            Correspondence::new(prev_offset + i, curr_offset + i, rng.random_range(5.0..50.0))
        };
        matches.push(m);
    }
    Ok(())
}

/// Generates a deterministic frame pair for `config`.
pub fn generate_frame_pair(config: &SceneConfig, projector: &Projector) -> Result<FramePair> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut pair = FramePair::default();

    let lead_prev = Vehicle {
        x: config.prev_distance,
        y: 0.0,
    };
    let lead_curr = Vehicle {
        x: config.curr_distance(),
        y: 0.0,
    };
    pair.prev
        .regions
        .push(Region::new(LEAD_PREV_ID, lead_prev.roi(projector)?));
    pair.curr
        .regions
        .push(Region::new(LEAD_CURR_ID, lead_curr.roi(projector)?));
    pair.prev.range_points = lidar_returns(&mut rng, &lead_prev, config.lidar_points);
    pair.curr.range_points = lidar_returns(&mut rng, &lead_curr, config.lidar_points);
    add_keypoints(
        &mut rng,
        projector,
        config,
        &lead_prev,
        &lead_curr,
        &mut pair.prev,
        &mut pair.curr,
        &mut pair.matches,
    )?;

    if config.with_neighbor {
        // parked in the left lane, outside the lidar crop window
        let parked = Vehicle {
            x: config.prev_distance + 4.0,
            y: 4.0,
        };
        let roi = parked.roi(projector)?;
        pair.prev.regions.push(Region::new(NEIGHBOR_PREV_ID, roi));
        pair.curr.regions.insert(0, Region::new(NEIGHBOR_CURR_ID, roi));
        pair.prev
            .range_points
            .extend(lidar_returns(&mut rng, &parked, config.lidar_points / 4));
        pair.curr
            .range_points
            .extend(lidar_returns(&mut rng, &parked, config.lidar_points / 4));
        add_keypoints(
            &mut rng,
            projector,
            config,
            &parked,
            &parked,
            &mut pair.prev,
            &mut pair.curr,
            &mut pair.matches,
        )?;
    }
    Ok(pair)
}

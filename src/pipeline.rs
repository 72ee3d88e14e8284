use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::clustering::{ClusterStats, cluster_range_points, crop_range_points};
use crate::config::FusionConfig;
use crate::error::Result;
use crate::keypoint_filter::cluster_keypoint_matches;
use crate::matching::{RegionMatch, match_regions};
use crate::projection::{Calibration, Projector};
use crate::ttc::{TtcOutcome, compute_ttc_camera, compute_ttc_lidar};
use crate::types::{Frame, FramePair, RegionId};

/// Both estimates for one previous-to-current region match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTtc {
    pub prev_id: RegionId,
    pub curr_id: RegionId,
    pub votes: u32,
    pub lidar: TtcOutcome,
    pub camera: TtcOutcome,
    pub lidar_points: (usize, usize),
    pub trusted_matches: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FramePairReport {
    pub region_matches: BTreeMap<RegionId, RegionId>,
    pub regions: Vec<RegionTtc>,
}

impl FramePairReport {
    pub fn region(&self, prev_id: RegionId) -> Option<&RegionTtc> {
        self.regions.iter().find(|r| r.prev_id == prev_id)
    }
}

pub struct TtcPipeline {
    config: FusionConfig,
    projector: Projector,
}

impl TtcPipeline {
    pub fn new(config: FusionConfig, calibration: &Calibration) -> Result<TtcPipeline> {
        config.validate()?;
        Ok(TtcPipeline {
            config,
            projector: Projector::new(calibration),
        })
    }

    /// Crops the frame's lidar points and distributes them over its regions.
    /// `frame.range_points` itself is left as it was.
    pub fn associate_range_points(&self, frame: &mut Frame) -> Result<ClusterStats> {
        let cropped;
        let points = match &self.config.crop {
            Some(crop) => {
                cropped = crop_range_points(&frame.range_points, crop);
                &cropped
            }
            None => &frame.range_points,
        };
        cluster_range_points(
            &mut frame.regions,
            points,
            self.config.shrink_factor,
            &self.projector,
        )
    }

    /// Runs association, region matching and both estimators on one frame pair.
    ///
    /// Regions of both frames are filled in place: their `range_points` are
    /// reassigned, and every matched current region gets its `matches` and
    /// `keypoint_indices` rebuilt from the trusted correspondences. Running
    /// the same pair twice gives the same report. Estimation failures are
    /// reported per region and never abort the pair.
    pub fn process(&self, pair: &mut FramePair) -> Result<FramePairReport> {
        self.associate_range_points(&mut pair.prev)?;
        self.associate_range_points(&mut pair.curr)?;

        let best = match_regions(
            &pair.matches,
            &pair.prev.keypoints,
            &pair.curr.keypoints,
            &pair.prev.regions,
            &pair.curr.regions,
        );

        let mut report = FramePairReport::default();
        for (&prev_id, &RegionMatch { current, votes }) in &best {
            report.region_matches.insert(prev_id, current);
            if votes == 0 && !self.config.keep_unreliable_matches {
                debug!("region {} has no keypoint votes, skipped", prev_id);
                continue;
            }
            report.regions.push(self.estimate(pair, prev_id, current, votes));
        }
        info!(
            "frame pair: {} region matches, {} estimated",
            report.region_matches.len(),
            report.regions.len()
        );
        Ok(report)
    }

    fn estimate(
        &self,
        pair: &mut FramePair,
        prev_id: RegionId,
        curr_id: RegionId,
        votes: u32,
    ) -> RegionTtc {
        let FramePair { prev, curr, matches } = pair;
        let prev_points: &[_] = prev
            .region(prev_id)
            .map(|r| r.range_points.as_slice())
            .unwrap_or_default();
        let Some(curr_region) = curr.regions.iter_mut().find(|r| r.id == curr_id) else {
            return RegionTtc {
                prev_id,
                curr_id,
                votes,
                lidar: TtcOutcome::Unavailable("matched region not found".to_string()),
                camera: TtcOutcome::Unavailable("matched region not found".to_string()),
                lidar_points: (prev_points.len(), 0),
                trusted_matches: 0,
            };
        };

        let lidar: TtcOutcome = compute_ttc_lidar(
            prev_points,
            &curr_region.range_points,
            self.config.frame_rate,
        )
        .into();

        // several previous regions may resolve to the same current region
        curr_region.matches.clear();
        curr_region.keypoint_indices.clear();
        let trusted = cluster_keypoint_matches(
            curr_region,
            &curr.keypoints,
            matches,
            self.config.distance_ratio,
        );
        let camera = if curr_region.matches.is_empty() {
            TtcOutcome::Unavailable("no trusted keypoint matches".to_string())
        } else {
            compute_ttc_camera(
                &prev.keypoints,
                &curr.keypoints,
                &curr_region.matches,
                self.config.frame_rate,
                self.config.min_keypoint_distance,
            )
            .into()
        };

        debug!(
            "region {} -> {}: lidar {:?}, camera {:?}",
            prev_id, curr_id, lidar, camera
        );
        RegionTtc {
            prev_id,
            curr_id,
            votes,
            lidar,
            camera,
            lidar_points: (prev_points.len(), curr_region.range_points.len()),
            trusted_matches: trusted,
        }
    }
}

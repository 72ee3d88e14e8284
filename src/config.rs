use serde::{Deserialize, Serialize};

use crate::error::{Result, TtcError};

/// Window in front of the ego vehicle that range points must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub min_x: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
    pub min_reflectivity: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            min_x: 2.0,
            max_x: 20.0,
            max_y: 2.0,
            min_z: -1.5,
            max_z: -0.9,
            min_reflectivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Fraction of a region's width and height trimmed before lidar association.
    pub shrink_factor: f32,
    /// Frames per second of both sensors.
    pub frame_rate: f64,
    /// Correspondences must score below `distance_ratio * mean` to be trusted.
    pub distance_ratio: f64,
    /// Minimum pixel distance between keypoints used in a scale ratio.
    pub min_keypoint_distance: f64,
    /// Also estimate TTC for region matches that received no votes.
    pub keep_unreliable_matches: bool,
    pub crop: Option<CropConfig>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            shrink_factor: 0.10,
            frame_rate: 10.0,
            distance_ratio: 0.8,
            min_keypoint_distance: 100.0,
            keep_unreliable_matches: false,
            crop: Some(CropConfig::default()),
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<()> {
        validate_frame_rate(self.frame_rate)?;
        validate_shrink_factor(self.shrink_factor)
    }
}

pub(crate) fn validate_frame_rate(frame_rate: f64) -> Result<()> {
    if frame_rate.is_finite() && frame_rate > 0.0 {
        Ok(())
    } else {
        Err(TtcError::InvalidFrameRate(frame_rate))
    }
}

pub(crate) fn validate_shrink_factor(shrink_factor: f32) -> Result<()> {
    if (0.0..1.0).contains(&shrink_factor) {
        Ok(())
    } else {
        Err(TtcError::InvalidShrinkFactor(shrink_factor as f64))
    }
}

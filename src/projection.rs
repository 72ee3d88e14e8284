use glam::Vec2;
use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TtcError};
use crate::types::RangePoint;

/// Below this homogeneous scale a projection is treated as degenerate.
pub const MIN_HOMOGENEOUS_SCALE: f64 = 1e-9;

/// Fixed lidar-to-image calibration, stored row major.
///
/// * `p_rect` - 3x4 rectified camera projection.
/// * `r_rect` - 4x4 rectifying rotation (homogeneous padding).
/// * `rt` - 4x4 lidar-to-camera extrinsic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub p_rect: [[f64; 4]; 3],
    pub r_rect: [[f64; 4]; 4],
    pub rt: [[f64; 4]; 4],
}

impl Default for Calibration {
    fn default() -> Self {
        Self::kitti_default()
    }
}

impl Calibration {
    /// KITTI left grey camera (cam 00) and Velodyne calibration.
    pub fn kitti_default() -> Calibration {
        Calibration {
            p_rect: [
                [7.215377e+02, 0.0, 6.095593e+02, 0.0],
                [0.0, 7.215377e+02, 1.728540e+02, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
            r_rect: [
                [9.999239e-01, 9.837760e-03, -7.445048e-03, 0.0],
                [-9.869795e-03, 9.999421e-01, -4.278459e-03, 0.0],
                [7.402527e-03, 4.351614e-03, 9.999631e-01, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            rt: [
                [7.533745e-03, -9.999714e-01, -6.166020e-04, -4.069766e-03],
                [1.480249e-02, 7.280733e-04, -9.998902e-01, -7.631618e-02],
                [9.998621e-01, 7.523790e-03, 1.480755e-02, -2.717806e-01],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn na_p_rect(&self) -> na::Matrix3x4<f64> {
        na::Matrix3x4::from_fn(|r, c| self.p_rect[r][c])
    }

    pub fn na_r_rect(&self) -> na::Matrix4<f64> {
        na::Matrix4::from_fn(|r, c| self.r_rect[r][c])
    }

    pub fn na_rt(&self) -> na::Matrix4<f64> {
        na::Matrix4::from_fn(|r, c| self.rt[r][c])
    }
}

/// Projects lidar points into the image with `P * R * RT`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    mat: na::Matrix3x4<f64>,
}

impl Projector {
    pub fn new(calibration: &Calibration) -> Projector {
        Projector {
            mat: calibration.na_p_rect() * calibration.na_r_rect() * calibration.na_rt(),
        }
    }

    pub fn from_matrix(mat: na::Matrix3x4<f64>) -> Projector {
        Projector { mat }
    }

    pub fn matrix(&self) -> &na::Matrix3x4<f64> {
        &self.mat
    }

    /// Pixel coordinates of `p`.
    ///
    /// Points behind the camera are projected literally. A vanishing homogeneous
    /// scale returns [`TtcError::DegenerateProjection`].
    pub fn project(&self, p: &RangePoint) -> Result<Vec2> {
        let x = na::Vector4::new(p.x, p.y, p.z, 1.0);
        let y = self.mat * x;
        if y[2].abs() < MIN_HOMOGENEOUS_SCALE {
            return Err(TtcError::DegenerateProjection(y[2]));
        }
        Ok(Vec2::new((y[0] / y[2]) as f32, (y[1] / y[2]) as f32))
    }
}

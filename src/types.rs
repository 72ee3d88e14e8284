use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the region detector. Only unique within one frame.
pub type RegionId = i32;

/// One lidar return in sensor coordinates.
///
/// `x` points forward, `y` to the left and `z` up, all in meters.
/// `r` is the reflectivity reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub r: f64,
}

impl RangePoint {
    pub fn new(x: f64, y: f64, z: f64, r: f64) -> RangePoint {
        RangePoint { x, y, z, r }
    }
}

/// Axis-aligned pixel rectangle with half-open containment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Roi {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Roi {
        Roi {
            x,
            y,
            width,
            height,
        }
    }

    /// `x <= p.x < x + width` and `y <= p.y < y + height`.
    pub fn contains(&self, p: Vec2) -> bool {
        self.x <= p.x && p.x < self.x + self.width && self.y <= p.y && p.y < self.y + self.height
    }

    /// Shrinks the rectangle about its center, trimming `factor` of width and height.
    pub fn shrink(&self, factor: f32) -> Roi {
        Roi {
            x: self.x + factor * self.width / 2.0,
            y: self.y + factor * self.height / 2.0,
            width: self.width * (1.0 - factor),
            height: self.height * (1.0 - factor),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A detected keypoint. Its index in the frame's keypoint list identifies it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub pt: Vec2,
    #[serde(default)]
    pub size: f32,
}

impl Keypoint {
    pub fn new(u: f32, v: f32) -> Keypoint {
        Keypoint {
            pt: Vec2::new(u, v),
            size: 0.0,
        }
    }
}

/// Keypoint match between the previous and the current frame.
///
/// Lower `distance` means a more confident match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    pub prev_idx: usize,
    pub curr_idx: usize,
    pub distance: f32,
}

impl Correspondence {
    pub fn new(prev_idx: usize, curr_idx: usize, distance: f32) -> Correspondence {
        Correspondence {
            prev_idx,
            curr_idx,
            distance,
        }
    }
}

/// One detected object projection in a single frame.
///
/// `range_points`, `matches` and `keypoint_indices` are filled by this crate;
/// everything else comes from the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub roi: Roi,
    #[serde(default)]
    pub class_id: i32,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub keypoint_indices: Vec<usize>,
    #[serde(default)]
    pub range_points: Vec<RangePoint>,
    #[serde(default)]
    pub matches: Vec<Correspondence>,
}

impl Region {
    pub fn new(id: RegionId, roi: Roi) -> Region {
        Region {
            id,
            roi,
            class_id: 0,
            confidence: 0.0,
            keypoint_indices: Vec::new(),
            range_points: Vec::new(),
            matches: Vec::new(),
        }
    }
}

/// Everything captured for one time step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub range_points: Vec<RangePoint>,
}

impl Frame {
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }
}

/// Two consecutive frames and the keypoint matches between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FramePair {
    pub prev: Frame,
    pub curr: Frame,
    #[serde(default)]
    pub matches: Vec<Correspondence>,
}

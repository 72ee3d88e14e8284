use log::{debug, trace};
use rayon::prelude::*;

use crate::config::{CropConfig, validate_shrink_factor};
use crate::error::Result;
use crate::projection::Projector;
use crate::types::{RangePoint, Region};

/// Outcome counts of one clustering pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterStats {
    pub assigned: usize,
    pub ambiguous: usize,
    pub unassigned: usize,
    pub unprojectable: usize,
}

/// Keeps only points inside the crop window.
pub fn crop_range_points(points: &[RangePoint], crop: &CropConfig) -> Vec<RangePoint> {
    let kept: Vec<RangePoint> = points
        .iter()
        .filter(|p| {
            p.x >= crop.min_x
                && p.x <= crop.max_x
                && p.y.abs() <= crop.max_y
                && p.z >= crop.min_z
                && p.z <= crop.max_z
                && p.r >= crop.min_reflectivity
        })
        .copied()
        .collect();
    trace!("cropped range points {} -> {}", points.len(), kept.len());
    kept
}

enum Enclosure {
    Unprojectable,
    None,
    One(usize),
    Many,
}

/// Copies every range point into the single region whose shrunk roi encloses
/// its projection. Points enclosed by no region or by several are dropped.
///
/// Any points the regions already held are replaced.
pub fn cluster_range_points(
    regions: &mut [Region],
    points: &[RangePoint],
    shrink_factor: f32,
    projector: &Projector,
) -> Result<ClusterStats> {
    validate_shrink_factor(shrink_factor)?;
    let shrunk: Vec<_> = regions.iter().map(|r| r.roi.shrink(shrink_factor)).collect();

    let enclosures: Vec<Enclosure> = points
        .par_iter()
        .map(|p| {
            let pt = match projector.project(p) {
                Ok(pt) => pt,
                Err(e) => {
                    trace!("skip range point {:?}: {}", p, e);
                    return Enclosure::Unprojectable;
                }
            };
            let mut enclosing = shrunk
                .iter()
                .enumerate()
                .filter(|(_, roi)| roi.contains(pt))
                .map(|(i, _)| i);
            match (enclosing.next(), enclosing.next()) {
                (None, _) => Enclosure::None,
                (Some(i), None) => Enclosure::One(i),
                (Some(_), Some(_)) => Enclosure::Many,
            }
        })
        .collect();

    for region in regions.iter_mut() {
        region.range_points.clear();
    }
    let mut stats = ClusterStats::default();
    for (p, enclosure) in points.iter().zip(enclosures) {
        match enclosure {
            Enclosure::One(i) => {
                regions[i].range_points.push(*p);
                stats.assigned += 1;
            }
            Enclosure::Many => stats.ambiguous += 1,
            Enclosure::None => stats.unassigned += 1,
            Enclosure::Unprojectable => stats.unprojectable += 1,
        }
    }
    debug!(
        "clustered {} range points into {} regions: {:?}",
        points.len(),
        regions.len(),
        stats
    );
    Ok(stats)
}

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use nalgebra as na;

use crate::types::{Correspondence, Keypoint, Region, RegionId};

/// Best current-frame region for one previous-frame region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionMatch {
    pub current: RegionId,
    pub votes: u32,
}

impl RegionMatch {
    /// A match without votes only means the current frame had a region to default to.
    pub fn is_reliable(&self) -> bool {
        self.votes > 0
    }
}

/// Correspondence votes between previous and current regions.
///
/// Rows follow the previous frame's region order, columns ascending current id.
pub struct VoteMatrix {
    prev_ids: Vec<RegionId>,
    curr_ids: Vec<RegionId>,
    prev_index: HashMap<RegionId, usize>,
    curr_index: HashMap<RegionId, usize>,
    counts: na::DMatrix<u32>,
}

impl VoteMatrix {
    pub fn new(prev_regions: &[Region], curr_regions: &[Region]) -> VoteMatrix {
        let mut prev_ids = Vec::with_capacity(prev_regions.len());
        let mut prev_index = HashMap::new();
        for r in prev_regions {
            if !prev_index.contains_key(&r.id) {
                prev_index.insert(r.id, prev_ids.len());
                prev_ids.push(r.id);
            }
        }
        let mut curr_ids: Vec<RegionId> = curr_regions.iter().map(|r| r.id).collect();
        curr_ids.sort_unstable();
        curr_ids.dedup();
        let curr_index = curr_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let counts = na::DMatrix::zeros(prev_ids.len(), curr_ids.len());
        VoteMatrix {
            prev_ids,
            curr_ids,
            prev_index,
            curr_index,
            counts,
        }
    }

    pub fn add_vote(&mut self, prev: RegionId, curr: RegionId) {
        if let (Some(&r), Some(&c)) = (self.prev_index.get(&prev), self.curr_index.get(&curr)) {
            self.counts[(r, c)] += 1;
        }
    }

    pub fn votes(&self, prev: RegionId, curr: RegionId) -> u32 {
        match (self.prev_index.get(&prev), self.curr_index.get(&curr)) {
            (Some(&r), Some(&c)) => self.counts[(r, c)],
            _ => 0,
        }
    }

    /// Strict-greater scan over ascending current ids, so ties keep the lowest id.
    /// An all-zero row falls back to the lowest id with zero votes.
    pub fn best_match(&self, prev: RegionId) -> Option<RegionMatch> {
        let row = *self.prev_index.get(&prev)?;
        let mut best = RegionMatch {
            current: *self.curr_ids.first()?,
            votes: 0,
        };
        for (c, id) in self.curr_ids.iter().enumerate() {
            let count = self.counts[(row, c)];
            if count > best.votes {
                best = RegionMatch {
                    current: *id,
                    votes: count,
                };
            }
        }
        Some(best)
    }

    pub fn prev_ids(&self) -> &[RegionId] {
        &self.prev_ids
    }
}

fn enclosing_ids(regions: &[Region], kp: &Keypoint) -> Vec<RegionId> {
    regions
        .iter()
        .filter(|r| r.roi.contains(kp.pt))
        .map(|r| r.id)
        .collect()
}

/// Builds the vote matrix from every correspondence whose keypoints lie in
/// regions of both frames.
pub fn count_region_votes(
    matches: &[Correspondence],
    prev_keypoints: &[Keypoint],
    curr_keypoints: &[Keypoint],
    prev_regions: &[Region],
    curr_regions: &[Region],
) -> VoteMatrix {
    let mut votes = VoteMatrix::new(prev_regions, curr_regions);
    let mut skipped = 0usize;
    for m in matches {
        let (Some(kp_prev), Some(kp_curr)) =
            (prev_keypoints.get(m.prev_idx), curr_keypoints.get(m.curr_idx))
        else {
            skipped += 1;
            continue;
        };
        let ids_prev = enclosing_ids(prev_regions, kp_prev);
        let ids_curr = enclosing_ids(curr_regions, kp_curr);
        for &id_prev in &ids_prev {
            for &id_curr in &ids_curr {
                votes.add_vote(id_prev, id_curr);
            }
        }
    }
    if skipped > 0 {
        warn!("skipped {} correspondences with out of range keypoint indices", skipped);
    }
    votes
}

/// Maps every previous region id to its best current region.
///
/// Returns an empty map when the current frame has no regions.
pub fn match_regions(
    matches: &[Correspondence],
    prev_keypoints: &[Keypoint],
    curr_keypoints: &[Keypoint],
    prev_regions: &[Region],
    curr_regions: &[Region],
) -> BTreeMap<RegionId, RegionMatch> {
    let votes = count_region_votes(
        matches,
        prev_keypoints,
        curr_keypoints,
        prev_regions,
        curr_regions,
    );
    let best: BTreeMap<RegionId, RegionMatch> = votes
        .prev_ids()
        .iter()
        .filter_map(|&id| votes.best_match(id).map(|m| (id, m)))
        .collect();
    debug!(
        "matched {} of {} previous regions ({} with votes)",
        best.len(),
        prev_regions.len(),
        best.values().filter(|m| m.is_reliable()).count()
    );
    best
}

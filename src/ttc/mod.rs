pub mod camera;
pub mod lidar;

pub use camera::*;
pub use lidar::*;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TtcError};

/// Per-region result of one estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum TtcOutcome {
    Seconds(f64),
    Indeterminate,
    Unavailable(String),
}

impl TtcOutcome {
    pub fn seconds(&self) -> Option<f64> {
        match self {
            TtcOutcome::Seconds(s) => Some(*s),
            _ => None,
        }
    }
}

impl From<Result<f64>> for TtcOutcome {
    fn from(result: Result<f64>) -> Self {
        match result {
            Ok(s) => TtcOutcome::Seconds(s),
            Err(TtcError::Indeterminate) => TtcOutcome::Indeterminate,
            Err(e) => TtcOutcome::Unavailable(e.to_string()),
        }
    }
}

/// Element at `len / 2` after an ascending sort, i.e. the upper middle for even lengths.
pub fn upper_median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    Some(values[values.len() / 2])
}

pub(crate) fn frame_interval(frame_rate: f64) -> Result<f64> {
    crate::config::validate_frame_rate(frame_rate)?;
    Ok(1.0 / frame_rate)
}

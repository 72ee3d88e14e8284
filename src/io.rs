use std::io::Write;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::pipeline::FramePairReport;
use crate::ttc::TtcOutcome;

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(output_path: &str, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(j.as_bytes())?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: &str) -> Result<T> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn outcome_to_string(outcome: &TtcOutcome) -> String {
    match outcome {
        TtcOutcome::Seconds(s) => format!("{:.3} s", s),
        TtcOutcome::Indeterminate => "indeterminate".to_string(),
        TtcOutcome::Unavailable(reason) => format!("unavailable ({})", reason),
    }
}

/// Human readable summary of one frame pair.
pub fn report_to_string(report: &FramePairReport) -> String {
    let mut s = String::new();
    s += format!("Region matches: {}\n\n", report.region_matches.len()).as_str();
    for r in &report.regions {
        s += format!("region {} -> {} ({} votes):\n", r.prev_id, r.curr_id, r.votes).as_str();
        s += format!(
            "    lidar  ttc: {} [{} / {} points]\n",
            outcome_to_string(&r.lidar),
            r.lidar_points.0,
            r.lidar_points.1
        )
        .as_str();
        s += format!(
            "    camera ttc: {} [{} matches]\n\n",
            outcome_to_string(&r.camera),
            r.trusted_matches
        )
        .as_str();
    }
    s
}

/// Writes the summary of [`report_to_string`] to a text file.
pub fn write_report(output_path: &str, report: &FramePairReport) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(report_to_string(report).as_bytes())?;
    Ok(())
}

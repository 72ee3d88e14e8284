pub mod clustering;
pub mod config;
pub mod error;
pub mod io;
pub mod keypoint_filter;
pub mod matching;
pub mod pipeline;
pub mod projection;
pub mod synthetic;
pub mod ttc;
pub mod types;

pub use error::{Result, TtcError};
pub use pipeline::{FramePairReport, RegionTtc, TtcPipeline};

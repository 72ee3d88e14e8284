use thiserror::Error;

/// Errors produced while associating sensor data and estimating TTC.
///
/// Estimation failures are local to one region; the pipeline records them per
/// region instead of aborting the frame pair.
#[derive(Error, Debug)]
pub enum TtcError {
    /// Third homogeneous coordinate was (nearly) zero during projection.
    #[error("degenerate projection: homogeneous scale {0} is too close to zero")]
    DegenerateProjection(f64),

    /// TTC denominator vanished, e.g. a static object.
    #[error("indeterminate ttc: no closing rate between frames")]
    Indeterminate,

    #[error("insufficient data: {0}")]
    InsufficientData(&'static str),

    #[error("frame rate must be finite and positive, got {0}")]
    InvalidFrameRate(f64),

    #[error("shrink factor must be in [0, 1), got {0}")]
    InvalidShrinkFactor(f64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TtcError>;

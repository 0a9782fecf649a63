use thiserror::Error;

/// Construction-time failures. Once a session is built, every operation on it
/// is total; clamping and nearest-point lookup leave no runtime error paths.
#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("calibration table is empty")]
    EmptyCalibration,
    #[error("calibration positions must be strictly increasing")]
    UnsortedCalibration,
    #[error("calibration control point is not finite")]
    NonFinitePoint,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

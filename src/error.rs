use thiserror::Error;

/// Errors raised at the point a trajectory is misused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown trajectory type: {0}")]
    UnknownTrajectoryType(String),

    #[error("derivative order {order} exceeds the supported maximum of {max}")]
    UnsupportedOrder { order: usize, max: usize },

    #[error("invalid horizon parameters: {0}")]
    InvalidHorizonParameters(String),
}

pub type Result<T> = std::result::Result<T, TrajectoryError>;

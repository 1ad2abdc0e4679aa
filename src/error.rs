use thiserror::Error;

use crate::domain::TargetId;

/// Errors raised by the twin engine and its command path
#[derive(Debug, Error)]
pub enum TwinError {
    #[error("fault type '{fault}' is not valid for {target}")]
    InvalidFaultKind { target: TargetId, fault: String },

    #[error("invalid fault duration: {0}")]
    InvalidDuration(String),

    #[error("asset registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("invalid target identifier: {0}")]
    InvalidTarget(String),
}

pub type Result<T> = std::result::Result<T, TwinError>;

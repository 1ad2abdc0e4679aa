use serde::{Deserialize, Serialize};
use strum::Display;

/// Health classification shown to operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HealthStatus {
    Normal,
    Warning,
    Critical,
}

/// Outcome of the smart-home safety check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum HomeStatus {
    #[serde(rename = "NORMAL")]
    #[strum(serialize = "NORMAL")]
    Normal,
    #[serde(rename = "WARNING")]
    #[strum(serialize = "WARNING")]
    Warning,
    #[serde(rename = "PROTECTION ACTIVE")]
    #[strum(serialize = "PROTECTION ACTIVE")]
    ProtectionActive,
}

impl HomeStatus {
    /// Severity used when a home is listed next to grid assets
    pub fn severity(&self) -> HealthStatus {
        match self {
            HomeStatus::ProtectionActive => HealthStatus::Critical,
            HomeStatus::Warning => HealthStatus::Warning,
            HomeStatus::Normal => HealthStatus::Normal,
        }
    }
}

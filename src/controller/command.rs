use chrono::{DateTime, Utc};
use serde::Serialize;

use super::TwinController;
use crate::domain::{FaultKind, TargetId};
use crate::error::Result;

/// Operator request to inject a fault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultCommand {
    pub target: TargetId,
    pub fault_type: String,
    pub duration_seconds: i64,
}

impl FaultCommand {
    pub fn new(raw_id: u32, is_home: bool, fault_type: impl Into<String>, duration_seconds: i64) -> Self {
        Self {
            target: TargetId::resolve(raw_id, is_home),
            fault_type: fault_type.into(),
            duration_seconds,
        }
    }
}

/// Acknowledgement returned once a fault is installed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultReceipt {
    pub status: String,
    pub target: TargetId,
    pub message: String,
    pub fault_type: FaultKind,
    pub expires_at: DateTime<Utc>,
}

impl TwinController {
    /// Validate and install a fault.
    ///
    /// The fault label is checked against the target's own fault set before
    /// the duration; a rejected command never touches the ledger. The target
    /// is not looked up in the registry.
    pub fn trigger_fault(&self, cmd: &FaultCommand) -> Result<FaultReceipt> {
        let kind = FaultKind::parse_for(cmd.target, &cmd.fault_type)?;
        let entry = self
            .engine
            .faults()
            .install(cmd.target, kind, cmd.duration_seconds)?;

        Ok(FaultReceipt {
            status: "Fault Injected".to_string(),
            target: entry.target,
            message: "Command Sent.".to_string(),
            fault_type: entry.kind,
            expires_at: entry.expires_at,
        })
    }
}

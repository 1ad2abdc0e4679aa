use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use strum::{Display, EnumString, IntoStaticStr};

use crate::domain::TargetId;
use crate::error::TwinError;

/// Faults that only make sense on a grid asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum GridFault {
    /// Sag: voltage scaled to 65%
    #[strum(serialize = "Voltage Dip")]
    VoltageDip,
    /// Swell: voltage scaled to 140%
    #[strum(serialize = "Voltage Spike")]
    VoltageSpike,
    /// Trip: voltage forced to zero
    #[strum(serialize = "Zero Voltage")]
    ZeroVoltage,
}

/// Faults that only make sense on a smart home
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum HomeFault {
    /// Supply voltage forced to 265 V
    #[strum(serialize = "Grid Surge")]
    GridSurge,
    /// Appliance strain: forces the reported current, not the voltage
    #[strum(serialize = "Home Wear")]
    HomeWear,
}

/// An injectable fault, partitioned by the kind of target it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    Grid(GridFault),
    Home(HomeFault),
}

impl FaultKind {
    /// Parse an operator-supplied fault label against the fault set of `target`.
    ///
    /// A home label sent to a grid asset (or the reverse) is rejected the same
    /// way as an unknown label.
    pub fn parse_for(target: TargetId, label: &str) -> Result<Self, TwinError> {
        let parsed = match target {
            TargetId::Grid(_) => label.parse::<GridFault>().map(FaultKind::Grid),
            TargetId::Home(_) => label.parse::<HomeFault>().map(FaultKind::Home),
        };
        parsed.map_err(|_| TwinError::InvalidFaultKind {
            target,
            fault: label.to_string(),
        })
    }

    pub fn applies_to(&self, target: TargetId) -> bool {
        matches!(
            (self, target),
            (FaultKind::Grid(_), TargetId::Grid(_)) | (FaultKind::Home(_), TargetId::Home(_))
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            FaultKind::Grid(f) => f.into(),
            FaultKind::Home(f) => f.into(),
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FaultKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// An installed fault and the instant after which it no longer applies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultEntry {
    pub target: TargetId,
    pub kind: FaultKind,
    pub expires_at: DateTime<Utc>,
}

impl FaultEntry {
    /// The fault still applies at exactly `expires_at`; it expires only once `now` is past it.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

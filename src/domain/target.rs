use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::TwinError;

/// Nominal residential supply voltage; homes carry no rated voltage of their own.
pub const HOME_RATED_VOLTAGE_V: f64 = 230.0;

/// Identity of a simulated target.
///
/// Grid asset and home ids come from independent sequences and can collide
/// numerically, so the kind tag is part of the key. The string form
/// (`grid_1`, `home_1`) is what the HTTP surface exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TargetId {
    Grid(u32),
    Home(u32),
}

impl TargetId {
    /// Resolve an identity from the raw id and the caller's `is_home` flag.
    pub fn resolve(raw_id: u32, is_home: bool) -> Self {
        if is_home {
            TargetId::Home(raw_id)
        } else {
            TargetId::Grid(raw_id)
        }
    }

    pub fn raw_id(&self) -> u32 {
        match self {
            TargetId::Grid(id) | TargetId::Home(id) => *id,
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self, TargetId::Home(_))
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Grid(id) => write!(f, "grid_{id}"),
            TargetId::Home(id) => write!(f, "home_{id}"),
        }
    }
}

impl FromStr for TargetId {
    type Err = TwinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, id) = s
            .split_once('_')
            .ok_or_else(|| TwinError::InvalidTarget(s.to_string()))?;
        let id: u32 = id
            .parse()
            .map_err(|_| TwinError::InvalidTarget(s.to_string()))?;
        match tag {
            "grid" => Ok(TargetId::Grid(id)),
            "home" => Ok(TargetId::Home(id)),
            _ => Err(TwinError::InvalidTarget(s.to_string())),
        }
    }
}

impl From<TargetId> for String {
    fn from(id: TargetId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for TargetId {
    type Error = TwinError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Grid asset category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum AssetCategory {
    Generation,
    Transmission,
    Distribution,
}

/// A generation, transmission or distribution asset tracked by the twin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAsset {
    pub id: u32,
    pub name: String,
    pub category: AssetCategory,
    /// Nominal voltage in V
    pub rated_voltage: f64,
    /// Pre-seeded impedance factor in Ohms used by the expected-voltage model
    pub impedance: f64,
}

impl GridAsset {
    pub fn target_id(&self) -> TargetId {
        TargetId::Grid(self.id)
    }
}

/// A smart-home endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Home {
    pub id: u32,
    pub address: String,
    pub owner: String,
}

impl Home {
    pub fn target_id(&self) -> TargetId {
        TargetId::Home(self.id)
    }

    pub fn rated_voltage(&self) -> f64 {
        HOME_RATED_VOLTAGE_V
    }
}

/// Everything the registry lists at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    pub grid_assets: Vec<GridAsset>,
    pub homes: Vec<Home>,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.grid_assets.len() + self.homes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid_assets.is_empty() && self.homes.is_empty()
    }
}

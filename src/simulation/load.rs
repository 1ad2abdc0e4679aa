//! # Load Model
//!
//! Simulated instantaneous current draw per target class. Each class has a
//! fixed mean and a bounded uniform jitter around it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::AssetCategory;

/// Current draw for a category label the model does not recognise
pub const UNCLASSIFIED_LOAD_AMPS: f64 = 10.0;

/// Load profile class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadClass {
    Generation,
    Transmission,
    Distribution,
    SmartHome,
}

impl LoadClass {
    /// Mean current in A
    pub fn mean_amps(&self) -> f64 {
        match self {
            LoadClass::Generation => 50.0,
            LoadClass::Transmission => 120.0,
            LoadClass::Distribution => 30.0,
            LoadClass::SmartHome => 8.0,
        }
    }

    /// Jitter bounds (low, high) added to the mean
    pub fn jitter_amps(&self) -> (f64, f64) {
        match self {
            LoadClass::Generation => (-5.0, 5.0),
            LoadClass::Transmission => (-10.0, 10.0),
            LoadClass::Distribution => (-2.0, 2.0),
            // Base loads around 5A (lights, TV), appliances push it up
            LoadClass::SmartHome => (-1.0, 3.0),
        }
    }

    /// Resolve a registry category label, as displayed in status records
    pub fn parse_label(label: &str) -> Option<Self> {
        match label {
            "Generation" => Some(LoadClass::Generation),
            "Transmission" => Some(LoadClass::Transmission),
            "Distribution" => Some(LoadClass::Distribution),
            "Smart Home" => Some(LoadClass::SmartHome),
            _ => None,
        }
    }
}

impl From<AssetCategory> for LoadClass {
    fn from(category: AssetCategory) -> Self {
        match category {
            AssetCategory::Generation => LoadClass::Generation,
            AssetCategory::Transmission => LoadClass::Transmission,
            AssetCategory::Distribution => LoadClass::Distribution,
        }
    }
}

/// Sample the current draw in A for `class`
pub fn load_for<R: Rng + ?Sized>(class: LoadClass, rng: &mut R) -> f64 {
    let (low, high) = class.jitter_amps();
    class.mean_amps() + rng.gen_range(low..=high)
}

/// Like [`load_for`], but degrades to [`UNCLASSIFIED_LOAD_AMPS`] for an unknown label
pub fn load_for_label<R: Rng + ?Sized>(label: &str, rng: &mut R) -> f64 {
    match LoadClass::parse_label(label) {
        Some(class) => load_for(class, rng),
        None => UNCLASSIFIED_LOAD_AMPS,
    }
}

//! Asset registry collaborator.
//!
//! The engine reads the registry once per tick and once per status request.
//! Listing must be cheap and side-effect free; seeding belongs to the
//! registry implementation.

use parking_lot::RwLock;
use tracing::info;

use crate::config::{GridAssetSeed, HomeSeed, RegistryConfig};
use crate::domain::{AssetCategory, GridAsset, Home, Roster};
use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
pub trait AssetRegistry: Send + Sync {
    fn list_grid_assets(&self) -> Result<Vec<GridAsset>>;
    fn list_homes(&self) -> Result<Vec<Home>>;

    /// Both listings, failing if either does
    fn roster(&self) -> Result<Roster> {
        Ok(Roster {
            grid_assets: self.list_grid_assets()?,
            homes: self.list_homes()?,
        })
    }
}

/// In-memory registry seeded at startup.
///
/// Ids are assigned per table starting at 1, so grid and home ids overlap.
#[derive(Debug, Default)]
pub struct SeededRegistry {
    roster: RwLock<Roster>,
}

impl SeededRegistry {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster: RwLock::new(roster),
        }
    }

    pub fn from_config(cfg: &RegistryConfig) -> Self {
        let registry = Self::default();
        for seed in &cfg.grid_assets {
            registry.add_grid_asset(seed);
        }
        for seed in &cfg.homes {
            registry.add_home(seed);
        }
        let roster = registry.roster.read();
        info!(
            grid_assets = roster.grid_assets.len(),
            homes = roster.homes.len(),
            "asset registry seeded"
        );
        drop(roster);
        registry
    }

    pub fn add_grid_asset(&self, seed: &GridAssetSeed) -> GridAsset {
        let mut roster = self.roster.write();
        let id = next_id(roster.grid_assets.iter().map(|a| a.id));
        let asset = GridAsset {
            id,
            name: seed.name.clone(),
            category: seed.category,
            rated_voltage: seed.rated_voltage,
            impedance: seed.impedance,
        };
        roster.grid_assets.push(asset.clone());
        asset
    }

    pub fn add_home(&self, seed: &HomeSeed) -> Home {
        let mut roster = self.roster.write();
        let id = next_id(roster.homes.iter().map(|h| h.id));
        let home = Home {
            id,
            address: seed.address.clone(),
            owner: seed.owner.clone(),
        };
        roster.homes.push(home.clone());
        home
    }
}

fn next_id(ids: impl Iterator<Item = u32>) -> u32 {
    ids.max().unwrap_or(0) + 1
}

impl AssetRegistry for SeededRegistry {
    fn list_grid_assets(&self) -> Result<Vec<GridAsset>> {
        Ok(self.roster.read().grid_assets.clone())
    }

    fn list_homes(&self) -> Result<Vec<Home>> {
        Ok(self.roster.read().homes.clone())
    }

    fn roster(&self) -> Result<Roster> {
        Ok(self.roster.read().clone())
    }
}

/// Seed used when no registry section is configured
pub fn default_grid_seed() -> Vec<GridAssetSeed> {
    vec![
        GridAssetSeed {
            name: "Kariba Hydro Gen".to_string(),
            category: AssetCategory::Generation,
            rated_voltage: 11_000.0,
            impedance: 5.2,
        },
        GridAssetSeed {
            name: "Marvel Substation".to_string(),
            category: AssetCategory::Transmission,
            rated_voltage: 33_000.0,
            impedance: 12.5,
        },
        GridAssetSeed {
            name: "Bulawayo Industry Feeder".to_string(),
            category: AssetCategory::Distribution,
            rated_voltage: 400.0,
            impedance: 1.1,
        },
    ]
}

pub fn default_home_seed() -> Vec<HomeSeed> {
    vec![HomeSeed {
        address: "14 Main St, Bulawayo".to_string(),
        owner: "Mr. Dube".to_string(),
    }]
}

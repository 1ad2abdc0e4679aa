use serde::Serialize;
use tracing::warn;

use super::TwinController;
use crate::domain::{
    FaultKind, GridAsset, HealthStatus, Home, HomeFault, HomeStatus, Roster, TargetId,
    HOME_RATED_VOLTAGE_V,
};
use crate::simulation::{round2, LoadClass};
use crate::twin;

/// Current forced onto a home while Home Wear is active
const HOME_WEAR_CURRENT_A: f64 = 18.5;

const SMART_HOME_LABEL: &str = "Smart Home";

/// One row of the status listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetStatus {
    pub id: TargetId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub real_value: f64,
    pub expected_value: f64,
    pub health_status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_status: Option<HomeStatus>,
    pub load_amps: f64,
    pub recommendation: String,
}

impl TwinController {
    /// Assemble registry, sensor readings and analyzer output.
    ///
    /// Targets missing from the sensor map (before the first tick) read at
    /// their rated voltage. Each row reads the sensor map independently, so
    /// rows may come from different ticks.
    pub fn status_report(&self) -> Vec<AssetStatus> {
        let roster = self.current_roster();
        let mut report = Vec::with_capacity(roster.len());
        report.extend(roster.grid_assets.iter().map(|asset| self.grid_status(asset)));
        report.extend(roster.homes.iter().map(|home| self.home_status(home)));
        report
    }

    fn current_roster(&self) -> Roster {
        match self.engine.registry().roster() {
            Ok(roster) => roster,
            Err(e) => {
                warn!(error = %e, "registry unavailable, serving last simulated roster");
                self.engine.last_roster().unwrap_or_default()
            }
        }
    }

    fn grid_status(&self, asset: &GridAsset) -> AssetStatus {
        let real = self
            .engine
            .sensors()
            .reading_or(asset.target_id(), asset.rated_voltage);
        let load = self.engine.sample_load(asset.category.into());

        let expected = twin::expected_voltage(asset.rated_voltage, load, asset.impedance);
        let health = twin::classify_health(real, expected);
        let recommendation = twin::recommend(real, expected, health);

        AssetStatus {
            id: asset.target_id(),
            name: asset.name.clone(),
            owner: None,
            kind: asset.category.to_string(),
            real_value: real,
            expected_value: round2(expected),
            health_status: health,
            home_status: None,
            load_amps: round2(load),
            recommendation: recommendation.to_string(),
        }
    }

    fn home_status(&self, home: &Home) -> AssetStatus {
        let target = home.target_id();
        let real = self.engine.sensors().reading_or(target, home.rated_voltage());

        // Home Wear is the one fault that acts on current, so it is applied
        // here rather than in the simulation tick.
        let wear = self.engine.faults().active_for(target, self.engine.now())
            == Some(FaultKind::Home(HomeFault::HomeWear));
        let current = if wear {
            HOME_WEAR_CURRENT_A
        } else {
            self.engine.sample_load(LoadClass::SmartHome)
        };

        let (status, advisory) = twin::analyze_home(real, current);

        AssetStatus {
            id: target,
            name: home.address.clone(),
            owner: Some(home.owner.clone()),
            kind: SMART_HOME_LABEL.to_string(),
            real_value: real,
            expected_value: HOME_RATED_VOLTAGE_V,
            health_status: status.severity(),
            home_status: Some(status),
            load_amps: round2(current),
            recommendation: advisory.to_string(),
        }
    }
}

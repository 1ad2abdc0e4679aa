//! # Simulation Loop
//!
//! Once per tick, recompute a simulated "real" voltage for every registered
//! target and publish the whole set into [`SensorState`].

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::faults::FaultLedger;
use super::load::{load_for, LoadClass};
use super::round2;
use super::sensors::SensorState;
use crate::clock::Clock;
use crate::config::SimulationConfig;
use crate::domain::{FaultKind, GridFault, HomeFault, Roster, TargetId};
use crate::error::Result;
use crate::registry::AssetRegistry;

/// Noise band as a fraction of rated voltage
const NOISE_FRACTION: f64 = 0.01;
/// Volts lost per amp of simulated load
const LOAD_DROP_COEFFICIENT: f64 = 0.05;

const DIP_FACTOR: f64 = 0.65;
const SPIKE_FACTOR: f64 = 1.40;
const SURGE_VOLTAGE_V: f64 = 265.0;

/// Summary of one completed tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub at: DateTime<Utc>,
    pub targets: usize,
    pub faulted: usize,
}

pub struct SimulationEngine {
    registry: Arc<dyn AssetRegistry>,
    sensors: Arc<SensorState>,
    faults: Arc<FaultLedger>,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
    last_roster: RwLock<Option<Roster>>,
    tick_interval: Duration,
}

impl SimulationEngine {
    pub fn new(
        cfg: &SimulationConfig,
        registry: Arc<dyn AssetRegistry>,
        sensors: Arc<SensorState>,
        faults: Arc<FaultLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let rng = match cfg.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            registry,
            sensors,
            faults,
            clock,
            rng: Mutex::new(rng),
            last_roster: RwLock::new(None),
            tick_interval: cfg.tick_interval(),
        }
    }

    pub fn sensors(&self) -> &Arc<SensorState> {
        &self.sensors
    }

    pub fn faults(&self) -> &Arc<FaultLedger> {
        &self.faults
    }

    pub fn registry(&self) -> &Arc<dyn AssetRegistry> {
        &self.registry
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Roster simulated by the last successful tick
    pub fn last_roster(&self) -> Option<Roster> {
        self.last_roster.read().clone()
    }

    /// Sample a load from the engine's random source
    pub fn sample_load(&self, class: LoadClass) -> f64 {
        load_for(class, &mut *self.rng.lock())
    }

    /// Run one simulation step across every registered target.
    ///
    /// Fails only when the registry cannot be read; sensor state is then left
    /// as the previous tick published it.
    pub fn tick(&self) -> Result<TickReport> {
        let roster = self.registry.roster()?;
        let now = self.clock.now();

        let mut readings = HashMap::with_capacity(roster.len());
        let mut faulted = 0;
        {
            let mut rng = self.rng.lock();

            for asset in &roster.grid_assets {
                let target = asset.target_id();
                let fault = self.faults.active_for(target, now);
                faulted += usize::from(fault.is_some());
                let value = simulate_voltage(
                    asset.rated_voltage,
                    asset.category.into(),
                    fault,
                    &mut *rng,
                );
                readings.insert(target, value);
            }

            for home in &roster.homes {
                let target = home.target_id();
                let fault = self.faults.active_for(target, now);
                faulted += usize::from(fault.is_some());
                let value =
                    simulate_voltage(home.rated_voltage(), LoadClass::SmartHome, fault, &mut *rng);
                readings.insert(target, value);
            }
        }

        let targets = readings.len();
        self.sensors.publish(readings, now);
        *self.last_roster.write() = Some(roster);

        debug!(targets, faulted, "simulation tick");
        Ok(TickReport {
            at: now,
            targets,
            faulted,
        })
    }

    /// Tick on a fixed interval until `shutdown` fires.
    ///
    /// A failed tick is logged and skipped; it never ends the loop.
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        info!(
            tick_ms = self.tick_interval.as_millis() as u64,
            "simulation loop started"
        );
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(e) = self.tick() {
                        warn!(error = %e, "simulation tick skipped");
                    }
                }
            }
        }
        info!("simulation loop stopped");
    }

    /// Start the loop as a background task
    pub fn spawn(self: &Arc<Self>) -> SimulationHandle {
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(self.clone().run(shutdown.clone()));
        SimulationHandle { shutdown, task }
    }
}

/// Handle to a running simulation loop
pub struct SimulationHandle {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl SimulationHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signal the loop and wait for it to exit
    pub async fn stop(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "simulation task ended abnormally");
        }
    }
}

/// Simulated voltage for one target on one tick.
///
/// baseline = rated ± 1% noise, minus 0.05 V per amp of load, then any
/// active fault override, rounded to 2 decimals.
///
/// Home Wear leaves the voltage alone. It is the one fault that acts on
/// current rather than voltage, and the status path applies it when it
/// computes a home's load. A fault that overrode a (voltage, current) pair
/// would remove that special case.
pub fn simulate_voltage<R: Rng + ?Sized>(
    rated_v: f64,
    class: LoadClass,
    fault: Option<FaultKind>,
    rng: &mut R,
) -> f64 {
    let noise = rng.gen_range(-NOISE_FRACTION..=NOISE_FRACTION) * rated_v;
    let load = load_for(class, rng);
    let value = rated_v + noise - load * LOAD_DROP_COEFFICIENT;

    let value = match fault {
        None | Some(FaultKind::Home(HomeFault::HomeWear)) => value,
        Some(FaultKind::Grid(GridFault::VoltageDip)) => value * DIP_FACTOR,
        Some(FaultKind::Grid(GridFault::VoltageSpike)) => value * SPIKE_FACTOR,
        Some(FaultKind::Grid(GridFault::ZeroVoltage)) => 0.0,
        Some(FaultKind::Home(HomeFault::GridSurge)) => SURGE_VOLTAGE_V,
    };
    round2(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::domain::{AssetCategory, GridAsset, Home};
    use crate::error::TwinError;
    use crate::registry::{MockAssetRegistry, SeededRegistry};
    use chrono::TimeZone;

    fn feeder() -> GridAsset {
        GridAsset {
            id: 1,
            name: "Feeder".to_string(),
            category: AssetCategory::Distribution,
            rated_voltage: 400.0,
            impedance: 1.1,
        }
    }

    fn home() -> Home {
        Home {
            id: 1,
            address: "14 Main St".to_string(),
            owner: "Owner".to_string(),
        }
    }

    fn engine_with(registry: Arc<dyn AssetRegistry>) -> (Arc<ManualClock>, SimulationEngine) {
        let start = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let cfg = SimulationConfig {
            tick_millis: 10,
            random_seed: Some(42),
        };
        let engine = SimulationEngine::new(
            &cfg,
            registry,
            Arc::new(SensorState::new()),
            Arc::new(FaultLedger::new(clock.clone())),
            clock.clone(),
        );
        (clock, engine)
    }

    fn seeded() -> Arc<dyn AssetRegistry> {
        Arc::new(SeededRegistry::new(Roster {
            grid_assets: vec![feeder()],
            homes: vec![home()],
        }))
    }

    #[test]
    fn test_unfaulted_voltage_band() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            // 400 ± 4 noise, minus 28..32 A * 0.05
            let v = simulate_voltage(400.0, LoadClass::Distribution, None, &mut rng);
            assert!((394.4..=402.6).contains(&v), "{v}");
            assert_eq!(v, round2(v));
        }
    }

    #[test]
    fn test_fault_overrides() {
        let mut rng = StdRng::seed_from_u64(42);
        let zero = simulate_voltage(
            400.0,
            LoadClass::Distribution,
            Some(FaultKind::Grid(GridFault::ZeroVoltage)),
            &mut rng,
        );
        assert_eq!(zero, 0.0);

        let surge = simulate_voltage(
            230.0,
            LoadClass::SmartHome,
            Some(FaultKind::Home(HomeFault::GridSurge)),
            &mut rng,
        );
        assert_eq!(surge, 265.0);

        let dip = simulate_voltage(
            400.0,
            LoadClass::Distribution,
            Some(FaultKind::Grid(GridFault::VoltageDip)),
            &mut rng,
        );
        assert!((256.0..=262.0).contains(&dip), "{dip}");

        let spike = simulate_voltage(
            400.0,
            LoadClass::Distribution,
            Some(FaultKind::Grid(GridFault::VoltageSpike)),
            &mut rng,
        );
        assert!((552.0..=564.0).contains(&spike), "{spike}");
    }

    #[test]
    fn test_home_wear_leaves_voltage_alone() {
        let mut rng = StdRng::seed_from_u64(9);
        let v = simulate_voltage(
            230.0,
            LoadClass::SmartHome,
            Some(FaultKind::Home(HomeFault::HomeWear)),
            &mut rng,
        );
        // 230 ± 2.3 noise, minus 7..11 A * 0.05
        assert!((227.1..=231.95).contains(&v), "{v}");
    }

    #[test]
    fn test_tick_publishes_every_target() {
        let (_clock, engine) = engine_with(seeded());
        let report = engine.tick().unwrap();

        assert_eq!(report.targets, 2);
        assert_eq!(report.faulted, 0);
        assert!(engine.sensors().reading(TargetId::Grid(1)).is_some());
        assert!(engine.sensors().reading(TargetId::Home(1)).is_some());
        assert_eq!(engine.last_roster().unwrap().len(), 2);
    }

    #[test]
    fn test_tick_applies_then_expires_fault() {
        let (clock, engine) = engine_with(seeded());
        engine
            .faults()
            .install(TargetId::Grid(1), FaultKind::Grid(GridFault::ZeroVoltage), 10)
            .unwrap();

        let report = engine.tick().unwrap();
        assert_eq!(report.faulted, 1);
        assert_eq!(engine.sensors().reading(TargetId::Grid(1)), Some(0.0));
        // Same raw id, other kind: untouched
        assert_ne!(engine.sensors().reading(TargetId::Home(1)), Some(0.0));

        clock.advance(chrono::Duration::seconds(11));
        let report = engine.tick().unwrap();
        assert_eq!(report.faulted, 0);
        assert!(engine.faults().is_empty());
        let v = engine.sensors().reading(TargetId::Grid(1)).unwrap();
        assert!(v > 390.0, "{v}");
    }

    #[test]
    fn test_registry_failure_keeps_previous_readings() {
        let mut registry = MockAssetRegistry::new();
        let mut calls = 0;
        registry.expect_roster().returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(Roster {
                    grid_assets: vec![feeder()],
                    homes: vec![],
                })
            } else {
                Err(TwinError::RegistryUnavailable("connection reset".to_string()))
            }
        });

        let (_clock, engine) = engine_with(Arc::new(registry));
        engine.tick().unwrap();
        let before = engine.sensors().reading(TargetId::Grid(1));

        let err = engine.tick().unwrap_err();
        assert!(matches!(err, TwinError::RegistryUnavailable(_)));
        assert_eq!(engine.sensors().reading(TargetId::Grid(1)), before);
        assert_eq!(engine.sensors().ticks(), 1);
    }

    #[tokio::test]
    async fn test_loop_survives_registry_failures_and_stops() {
        let mut registry = MockAssetRegistry::new();
        registry
            .expect_roster()
            .returning(|| Err(TwinError::RegistryUnavailable("down".to_string())));

        let (_clock, engine) = engine_with(Arc::new(registry));
        let engine = Arc::new(engine);
        let handle = engine.spawn();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_running());
        assert_eq!(engine.sensors().ticks(), 0);

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_loop_ticks_until_stopped() {
        let (_clock, engine) = engine_with(seeded());
        let engine = Arc::new(engine);
        let handle = engine.spawn();

        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.stop().await;

        let ticks = engine.sensors().ticks();
        assert!(ticks >= 2, "only {ticks} ticks");
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(engine.sensors().ticks(), ticks);
    }
}

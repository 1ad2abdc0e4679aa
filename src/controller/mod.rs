pub mod command;
pub mod status;

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::registry::{AssetRegistry, SeededRegistry};
use crate::simulation::{FaultLedger, SensorState, SimulationEngine, SimulationHandle};

pub use command::{FaultCommand, FaultReceipt};
pub use status::AssetStatus;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub controller: Arc<TwinController>,
}

impl AppState {
    /// Production wiring: seeded registry and wall clock
    pub fn new(cfg: Config) -> Self {
        let registry = Arc::new(SeededRegistry::from_config(&cfg.registry));
        Self::with_parts(cfg, registry, Arc::new(SystemClock))
    }

    pub fn with_parts(cfg: Config, registry: Arc<dyn AssetRegistry>, clock: Arc<dyn Clock>) -> Self {
        let sensors = Arc::new(SensorState::new());
        let faults = Arc::new(FaultLedger::new(clock.clone()));
        let engine = Arc::new(SimulationEngine::new(
            &cfg.simulation,
            registry,
            sensors,
            faults,
            clock,
        ));

        Self {
            cfg,
            controller: Arc::new(TwinController::new(engine)),
        }
    }
}

/// Start the simulation loop for `state`; stop it through the returned handle
pub fn spawn_simulation(state: &AppState) -> SimulationHandle {
    state.controller.engine().spawn()
}

/// Read/write surface over the running twin
pub struct TwinController {
    engine: Arc<SimulationEngine>,
}

impl TwinController {
    pub fn new(engine: Arc<SimulationEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<SimulationEngine> {
        &self.engine
    }

    /// True once at least one tick has been published
    pub fn is_ready(&self) -> bool {
        self.engine.sensors().ticks() > 0
    }
}

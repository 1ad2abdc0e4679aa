//! # Twin Simulation
//!
//! Produces the "real" side of the digital twin.
//!
//! ## Components
//!
//! - **Load**: per-class current draw with bounded jitter
//! - **Faults**: operator-injected, time-bounded overrides keyed by target
//! - **Sensors**: last-value-only store of simulated voltages
//! - **Engine**: the periodic loop tying the three together

pub mod engine;
pub mod faults;
pub mod load;
pub mod sensors;

pub use engine::{simulate_voltage, SimulationEngine, SimulationHandle, TickReport};
pub use faults::FaultLedger;
pub use load::{load_for, load_for_label, LoadClass, UNCLASSIFIED_LOAD_AMPS};
pub use sensors::SensorState;

/// Round to 2 decimal places, the precision readings are published at
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! # Digital Twin Analyzer
//!
//! Pure functions comparing the physics-expected value of a target with its
//! simulated reading. Nothing here looks at injected faults: the analyzer
//! judges the numbers, it does not know why they moved.

pub mod model;

pub use model::{
    analyze_home, classify_health, deviation_percent, expected_voltage, recommend,
};

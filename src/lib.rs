//! # Grid Digital Twin
//!
//! Keeps a live twin of grid assets and smart homes: a periodic loop simulates
//! sensor voltages (with operator-injected faults), and an analyzer compares
//! them against a physics-expected value to classify health.

pub mod api;
pub mod clock;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod registry;
pub mod simulation;
pub mod telemetry;
pub mod twin;

pub use error::{Result, TwinError};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::domain::TargetId;

/// Latest simulated voltage per target.
///
/// The simulation loop is the only writer. Each tick replaces the whole
/// generation under one write lock; readers never see a half-written map.
#[derive(Debug, Default)]
pub struct SensorState {
    inner: RwLock<SensorGeneration>,
}

#[derive(Debug, Default)]
struct SensorGeneration {
    readings: HashMap<TargetId, f64>,
    updated_at: Option<DateTime<Utc>>,
    ticks: u64,
}

impl SensorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all readings with the output of one tick
    pub fn publish(&self, readings: HashMap<TargetId, f64>, at: DateTime<Utc>) {
        let mut generation = self.inner.write();
        generation.readings = readings;
        generation.updated_at = Some(at);
        generation.ticks += 1;
    }

    pub fn reading(&self, target: TargetId) -> Option<f64> {
        self.inner.read().readings.get(&target).copied()
    }

    /// Reading for `target`, or `fallback` before the first tick covered it
    pub fn reading_or(&self, target: TargetId, fallback: f64) -> f64 {
        self.reading(target).unwrap_or(fallback)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().updated_at
    }

    /// Number of ticks published so far
    pub fn ticks(&self) -> u64 {
        self.inner.read().ticks
    }
}

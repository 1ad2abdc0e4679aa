use crate::domain::{HealthStatus, HomeStatus};

// Deviation thresholds, in percent of the expected value (exclusive)
const CRITICAL_DEVIATION_PERCENT: f64 = 10.0;
const WARNING_DEVIATION_PERCENT: f64 = 5.0;

// Smart-home safety limits
const SURGE_PROTECTION_VOLTAGE_V: f64 = 255.0;
const APPLIANCE_STRAIN_CURRENT_A: f64 = 15.0;

pub const ADVICE_OPTIMAL: &str = "System Optimal. No Action Required.";
pub const ADVICE_UNDERVOLTAGE: &str = "Possible Overload. Inspect Transformer Tap Changer.";
pub const ADVICE_OVERVOLTAGE: &str = "Load Rejection. Check for Capacitor Bank malfunction.";
pub const ADVICE_ANOMALY: &str = "Anomaly Detected. Manual Inspection Required.";

pub const HOME_SURGE_ADVICE: &str = "Surge Detected. Power Cut to Save Appliances.";
pub const HOME_STRAIN_ADVICE: &str = "High Current. Check AC Compressor Health.";
pub const HOME_NOMINAL_ADVICE: &str = "Home System Nominal.";

/// Physics-expected voltage from a linear drop model.
///
/// V_expected = V_rated - I_load * Z
///
/// `impedance` is a seeded per-asset constant, not a measured value.
pub fn expected_voltage(rated_v: f64, load_amps: f64, impedance: f64) -> f64 {
    rated_v - load_amps * impedance
}

/// Deviation of `real` from `expected` in percent, `None` when `expected` is zero
pub fn deviation_percent(real: f64, expected: f64) -> Option<f64> {
    if expected == 0.0 {
        return None;
    }
    Some(((real - expected) / expected).abs() * 100.0)
}

/// Classify health from the real/expected pair alone.
///
/// An expected value of zero is always CRITICAL.
pub fn classify_health(real: f64, expected: f64) -> HealthStatus {
    match deviation_percent(real, expected) {
        None => HealthStatus::Critical,
        Some(pct) if pct > CRITICAL_DEVIATION_PERCENT => HealthStatus::Critical,
        Some(pct) if pct > WARNING_DEVIATION_PERCENT => HealthStatus::Warning,
        Some(_) => HealthStatus::Normal,
    }
}

/// Engineering advice for a grid asset given its fault signature
pub fn recommend(real: f64, expected: f64, health: HealthStatus) -> &'static str {
    if health == HealthStatus::Normal {
        return ADVICE_OPTIMAL;
    }
    if real < expected {
        ADVICE_UNDERVOLTAGE
    } else if real > expected {
        ADVICE_OVERVOLTAGE
    } else {
        ADVICE_ANOMALY
    }
}

/// Smart-home safety check.
///
/// Surge protection takes priority over the current check: a home in surge
/// reports PROTECTION ACTIVE whatever it draws.
pub fn analyze_home(voltage: f64, current: f64) -> (HomeStatus, &'static str) {
    if voltage > SURGE_PROTECTION_VOLTAGE_V {
        return (HomeStatus::ProtectionActive, HOME_SURGE_ADVICE);
    }
    // Normal voltage with high current points at motor strain
    if current > APPLIANCE_STRAIN_CURRENT_A {
        return (HomeStatus::Warning, HOME_STRAIN_ADVICE);
    }
    (HomeStatus::Normal, HOME_NOMINAL_ADVICE)
}

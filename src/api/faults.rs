//! Fault injection endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::error::ApiError,
    controller::{AppState, FaultCommand, FaultReceipt},
    error::TwinError,
};

const DEFAULT_FAULT_DURATION_S: i64 = 10;

#[derive(Debug, Deserialize, Validate)]
pub struct TriggerFaultRequest {
    pub asset_id: u32,
    #[validate(length(min = 1))]
    pub fault_type: String,
    #[serde(default)]
    pub duration: DurationInput,
    #[serde(default)]
    pub is_home: bool,
}

/// Fault duration in seconds as sent by operator tooling.
///
/// Consoles send either a JSON number or a numeric string. Any other JSON
/// value is kept so it can be rejected as an invalid duration rather than
/// as a malformed body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    Seconds(i64),
    Fractional(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for DurationInput {
    fn default() -> Self {
        DurationInput::Seconds(DEFAULT_FAULT_DURATION_S)
    }
}

impl DurationInput {
    pub fn seconds(&self) -> Result<i64, TwinError> {
        let secs = match self {
            DurationInput::Seconds(secs) => *secs,
            DurationInput::Fractional(secs) if secs.fract() == 0.0 && secs.is_finite() => {
                *secs as i64
            }
            DurationInput::Fractional(secs) => {
                return Err(TwinError::InvalidDuration(format!("{secs} is not whole seconds")))
            }
            DurationInput::Text(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| TwinError::InvalidDuration(format!("'{raw}' is not a number")))?,
            DurationInput::Other(value) => {
                return Err(TwinError::InvalidDuration(format!("{value} is not a number")))
            }
        };
        if secs <= 0 {
            return Err(TwinError::InvalidDuration(format!("{secs}s (must be positive)")));
        }
        Ok(secs)
    }
}

/// POST /api/trigger_fault - Inject a time-bounded fault on one target
pub async fn trigger_fault(
    State(st): State<AppState>,
    payload: Result<Json<TriggerFaultRequest>, JsonRejection>,
) -> Result<Json<FaultReceipt>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    req.validate()?;

    let cmd = FaultCommand::new(
        req.asset_id,
        req.is_home,
        req.fault_type,
        req.duration.seconds()?,
    );
    let receipt = st.controller.trigger_fault(&cmd)?;
    Ok(Json(receipt))
}

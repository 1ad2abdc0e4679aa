use axum::{extract::State, Json};

use crate::controller::{AppState, AssetStatus};

/// GET /api/status - Expected vs real readings for every target
///
/// Grid assets are listed first, then homes, in registry order.
pub async fn get_status(State(st): State<AppState>) -> Json<Vec<AssetStatus>> {
    Json(st.controller.status_report())
}

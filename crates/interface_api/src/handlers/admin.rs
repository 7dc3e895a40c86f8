//! Administrative handlers

use axum::{extract::State, Json};
use tracing::info;

use crate::auth::{roles, Caller};
use crate::dto::policy::SweepResponse;
use crate::{error::ApiError, AppState};

/// Bans every customer whose policy has lapsed
pub async fn sweep(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<SweepResponse>, ApiError> {
    caller.require_role(roles::ADMIN)?;
    let banned = state.service.sweep().await;
    info!(caller = %caller.customer, banned = banned.len(), "Expiry sweep requested");
    Ok(Json(SweepResponse { banned }))
}

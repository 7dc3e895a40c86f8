//! Claims handlers

use axum::{extract::State, Json};

use crate::auth::{roles, Caller};
use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Files a claim against the caller's own policy
pub async fn file_claim(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<ClaimRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    caller.require_role(roles::CUSTOMER)?;
    let settlement = state.service.claim(caller.customer, request.amount).await?;
    Ok(Json(settlement.into()))
}

//! Risk pool handlers

use axum::{extract::State, Json};

use crate::auth::Caller;
use crate::dto::fund::*;
use crate::{error::ApiError, AppState};

/// Deposits funds into the pool
pub async fn deposit(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<DepositRequest>,
) -> Result<Json<DepositResponse>, ApiError> {
    let balance = state
        .service
        .deposit(Some(caller.customer), request.amount)
        .await?;
    Ok(Json(DepositResponse {
        deposited: request.amount,
        balance,
    }))
}

/// Pool aggregates
pub async fn get_pool(State(state): State<AppState>) -> Json<PoolResponse> {
    Json(state.service.pool_summary().await.into())
}

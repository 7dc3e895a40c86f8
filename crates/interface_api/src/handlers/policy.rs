//! Policy handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::{roles, Caller};
use crate::dto::policy::*;
use crate::handlers::parse_customer;
use crate::{error::ApiError, AppState};

/// Underwrites a policy for the caller
pub async fn underwrite(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<UnderwriteRequest>,
) -> Result<(StatusCode, Json<PolicyResponse>), ApiError> {
    caller.require_role(roles::CUSTOMER)?;
    let policy = state
        .service
        .underwrite(caller.customer, request.payment)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PolicyResponse::new(&policy.record, &policy.status)),
    ))
}

/// Pays the premium of the customer in the path
///
/// Only the policy holder may pay for their own policy.
pub async fn pay_premium(
    State(state): State<AppState>,
    caller: Caller,
    Path(customer): Path<String>,
    Json(request): Json<PremiumRequest>,
) -> Result<Json<PolicyResponse>, ApiError> {
    caller.require_role(roles::CUSTOMER)?;
    let customer = parse_customer(&customer)?;
    let policy = state
        .service
        .pay_premium_for(customer, caller.customer, request.payment)
        .await?;
    Ok(Json(PolicyResponse::new(&policy.record, &policy.status)))
}

/// Applies the lapse check, banning a lapsed customer
pub async fn refresh(
    State(state): State<AppState>,
    Path(customer): Path<String>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let customer = parse_customer(&customer)?;
    let banned = state.service.refresh(customer).await;
    Ok(Json(RefreshResponse { customer, banned }))
}

/// Gets a policy record with its current status
pub async fn get_policy(
    State(state): State<AppState>,
    Path(customer): Path<String>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let customer = parse_customer(&customer)?;
    let policy = state
        .service
        .policy_snapshot(customer)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("no policy for {}", customer)))?;
    Ok(Json(PolicyResponse::new(&policy.record, &policy.status)))
}

/// Gets the premium the customer currently owes
pub async fn get_premium(
    State(state): State<AppState>,
    Path(customer): Path<String>,
) -> Result<Json<PremiumResponse>, ApiError> {
    let customer = parse_customer(&customer)?;
    let premium = state.service.premium(customer).await;
    Ok(Json(PremiumResponse { customer, premium }))
}

pub async fn is_insured(
    State(state): State<AppState>,
    Path(customer): Path<String>,
) -> Result<Json<InsuredResponse>, ApiError> {
    let customer = parse_customer(&customer)?;
    let insured = state.service.is_insured(customer).await;
    Ok(Json(InsuredResponse { customer, insured }))
}

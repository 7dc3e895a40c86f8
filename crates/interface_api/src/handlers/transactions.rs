//! Transaction journal handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::auth::Caller;
use crate::dto::transactions::*;
use crate::handlers::parse_customer;
use crate::{error::ApiError, AppState};

/// Lists journal entries
///
/// Admins see every entry or filter by customer; everyone else sees only
/// entries involving themselves.
pub async fn list_transactions(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let requested = query.customer.as_deref().map(parse_customer).transpose()?;

    let filter = if caller.is_admin() {
        requested
    } else {
        match requested {
            Some(customer) if customer != caller.customer => {
                return Err(ApiError::Forbidden(
                    "transactions of other customers are not visible".to_string(),
                ))
            }
            _ => Some(caller.customer),
        }
    };

    let entries = state.service.transactions(filter).await;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

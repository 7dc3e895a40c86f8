//! Request handlers

pub mod health;
pub mod policy;
pub mod claims;
pub mod pool;
pub mod transactions;
pub mod admin;

use core_kernel::CustomerId;

use crate::error::ApiError;

/// Parses a customer id from a path or query segment
///
/// Accepts both the displayed `CUS-<uuid>` form and a bare uuid.
pub(crate) fn parse_customer(raw: &str) -> Result<CustomerId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid customer id: {}", raw)))
}

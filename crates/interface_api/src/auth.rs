//! Authentication and authorization
//!
//! Every authenticated request acts as exactly one customer: the token's
//! `sub` claim is the caller's `CustomerId`. Operations on "my policy" use
//! it directly; premium payments compare it with the target customer.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::CustomerId;

use crate::error::ApiError;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (customer ID)
    pub sub: String,
    /// Caller's roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    /// Parses the subject as a customer id
    pub fn customer_id(&self) -> Result<CustomerId, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidSubject(self.sub.clone()))
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token subject is not a customer id: {0}")]
    InvalidSubject(String),
    #[error("Missing role: {0}")]
    MissingRole(String),
}

/// Creates a new JWT token for `customer`
pub fn create_token(
    customer: CustomerId,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: customer.to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Checks if the caller has `required_role`
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims
        .roles
        .iter()
        .any(|r| r == required_role || r == roles::ADMIN)
}

/// Role names
pub mod roles {
    pub const CUSTOMER: &str = "customer";
    pub const ADMIN: &str = "admin";
}

/// The authenticated caller of a request
///
/// Extracted from the claims the auth middleware stored on the request.
#[derive(Debug, Clone)]
pub struct Caller {
    pub customer: CustomerId,
    pub claims: Claims,
}

impl Caller {
    /// Fails with `Forbidden` unless the caller holds `role`
    pub fn require_role(&self, role: &str) -> Result<(), ApiError> {
        if has_role(&self.claims, role) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(AuthError::MissingRole(role.to_string()).to_string()))
        }
    }

    pub fn is_admin(&self) -> bool {
        has_role(&self.claims, roles::ADMIN)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or(ApiError::Unauthorized)?;
        let customer = claims
            .customer_id()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        Ok(Caller { customer, claims })
    }
}

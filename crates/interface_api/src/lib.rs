//! HTTP API Layer
//!
//! The REST surface of the policy ledger, built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: one module per resource (policies, claims, pool, journal, admin)
//! - **Middleware**: JWT caller identity, audit logging, request ids, tracing
//! - **DTOs**: request/response bodies; amounts travel as decimal strings
//! - **Error Handling**: ledger rejections mapped to status codes
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_ledger::LedgerService;

use crate::config::ApiConfig;
use crate::handlers::{admin, claims, health, policy, pool, transactions};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: LedgerService,
    pub config: Arc<ApiConfig>,
}

/// Creates the main API router
///
/// Every route under `/api/v1` requires a bearer token whose subject is
/// the caller's customer id.
pub fn create_router(service: LedgerService, config: ApiConfig) -> Router {
    let state = AppState {
        service,
        config: Arc::new(config),
    };

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let policy_routes = Router::new()
        .route("/underwrite", post(policy::underwrite))
        .route("/:customer", get(policy::get_policy))
        .route("/:customer/premiums", post(policy::pay_premium))
        .route("/:customer/premium", get(policy::get_premium))
        .route("/:customer/insured", get(policy::is_insured))
        .route("/:customer/refresh", post(policy::refresh));

    let pool_routes = Router::new()
        .route("/", get(pool::get_pool))
        .route("/deposits", post(pool::deposit));

    let api_routes = Router::new()
        .nest("/policies", policy_routes)
        .route("/claims", post(claims::file_claim))
        .nest("/pool", pool_routes)
        .route("/transactions", get(transactions::list_transactions))
        .route("/admin/sweep", post(admin::sweep))
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

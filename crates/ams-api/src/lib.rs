//! # ams-api
//!
//! Reference REST backend for the role API the console consumes. Roles live in
//! memory for the lifetime of the process; the backend is the final authority
//! on name uniqueness.

pub mod middleware;
pub mod repository;
pub mod routes;

use ams_common::config::LimitsConfig;
use axum::{Router, middleware as axum_middleware};
use repository::RoleRepository;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub roles: RoleRepository,
    pub limits: LimitsConfig,
    /// Static bearer token required on role routes, if configured.
    pub api_token: Option<String>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(limits: LimitsConfig, api_token: Option<String>) -> Self {
        Self {
            roles: RoleRepository::new(),
            limits,
            api_token,
            started_at: Instant::now(),
        }
    }
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let role_routes = routes::roles::router().route_layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::require_token,
    ));

    let api_routes = Router::new()
        .merge(role_routes)
        .merge(routes::health::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::compression::CompressionLayer::new())
        .with_state(state)
}

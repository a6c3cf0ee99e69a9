//! HTTP application wiring (axum router + service wiring).
//!
//! Folder layout:
//! - `services.rs`: store wiring + the operations layer over the collections
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use chrono::Duration;
use tower::ServiceBuilder;

use storefront_auth::Hs256Jwt;
use storefront_orders::{CancellationPolicy, DEFAULT_CANCELLATION_WINDOW_HOURS};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub bind_addr: String,
    pub cancellation_window_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let cancellation_window_hours = std::env::var("CANCELLATION_WINDOW_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CANCELLATION_WINDOW_HOURS);

        Self {
            jwt_secret,
            bind_addr,
            cancellation_window_hours,
        }
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub async fn build_app(config: AppConfig) -> Router {
    let jwt = Arc::new(Hs256Jwt::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt: jwt.clone() };

    let policy = CancellationPolicy::new(Duration::hours(config.cancellation_window_hours));
    let services = Arc::new(services::build_services(jwt, policy).await);

    // Protected routes: require a verified bearer token.
    let protected = routes::protected_router().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .merge(routes::public_router())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}

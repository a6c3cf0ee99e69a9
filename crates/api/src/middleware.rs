use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use storefront_auth::JwtValidator;

use crate::app::errors;
use crate::context::AuthContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Verify the bearer token and attach an [`AuthContext`] to the request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let claims = {
        let token = match extract_bearer(req.headers()) {
            Ok(token) => token,
            Err(response) => return response,
        };

        match state.jwt.verify(token, Utc::now()) {
            Ok(claims) => claims,
            Err(_) => {
                return errors::json_error(
                    StatusCode::UNAUTHORIZED,
                    "invalid or expired token, please log in again",
                );
            }
        }
    };

    req.extensions_mut()
        .insert(AuthContext::new(claims.sub, claims.role));

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Response> {
    let missing = || {
        errors::json_error(
            StatusCode::UNAUTHORIZED,
            "authentication token is missing or invalid",
        )
    };

    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(missing)?;

    let header = header.to_str().map_err(|_| missing())?;

    let token = header.strip_prefix("Bearer ").ok_or_else(missing)?.trim();
    if token.is_empty() {
        return Err(missing());
    }

    Ok(token)
}

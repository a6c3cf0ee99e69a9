//! Registration and login.
//!
//! Tokens are issued here and nowhere else; every other route only ever
//! *verifies* them.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let (Some(email), Some(password)) = (body.email.as_deref(), body.password.as_deref()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "email and password are required");
    };

    if body.confirm_password.as_deref() != Some(password) {
        return errors::json_error(StatusCode::BAD_REQUEST, "passwords do not match");
    }

    match services.register(email, password).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(json!({ "message": "account created" })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let (Some(email), Some(password)) = (body.email.as_deref(), body.password.as_deref()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "email and password are required");
    };

    match services.login(email, password).await {
        Ok((token, _)) => (
            StatusCode::OK,
            Json(json!({ "message": "login successful", "token": token })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

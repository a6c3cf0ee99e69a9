use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_core::DomainError;

/// Map a domain error onto its HTTP status and `{"error": ...}` body.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match &err {
        DomainError::Validation(_) | DomainError::InvalidId(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match err {
        DomainError::Validation(msg)
        | DomainError::InvalidId(msg)
        | DomainError::Conflict(msg)
        | DomainError::Forbidden(msg) => msg,
        DomainError::NotFound => "not found".to_string(),
        DomainError::Unauthorized => "unauthorized".to_string(),
        DomainError::Internal(msg) => {
            // Store details go to the log, not to the client.
            tracing::error!("internal error: {msg}");
            "internal server error".to_string()
        }
    };

    json_error(status, message)
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}

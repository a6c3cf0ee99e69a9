//! Account endpoints.
//!
//! Profile fetch/update, password change, and cart additions are
//! self-service only; the directory listing is admin-only. Password change
//! and cart addition are separate named routes rather than one endpoint
//! inferring the operation from which body fields happen to be present.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use storefront_accounts::ProfilePatch;
use storefront_core::{AccountId, ProductId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

pub async fn list_accounts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_admin(&ctx) {
        return errors::domain_error_to_response(e);
    }

    match services.list_accounts().await {
        Ok(accounts) => (
            StatusCode::OK,
            Json(
                accounts
                    .iter()
                    .map(dto::account_summary_to_json)
                    .collect::<Vec<_>>(),
            ),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let account_id: AccountId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = authz::require_self(&ctx, account_id) {
        return errors::domain_error_to_response(e);
    }

    match services.require_account(account_id).await {
        Ok(account) => (StatusCode::OK, Json(dto::profile_to_json(&account))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> axum::response::Response {
    let account_id: AccountId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = authz::require_self(&ctx, account_id) {
        return errors::domain_error_to_response(e);
    }

    match services.update_profile(account_id, &patch).await {
        Ok(account) => (StatusCode::OK, Json(dto::profile_to_json(&account))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ChangePasswordRequest>,
) -> axum::response::Response {
    let account_id: AccountId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = authz::require_self(&ctx, account_id) {
        return errors::domain_error_to_response(e);
    }

    let (Some(current), Some(new)) = (
        body.current_password.as_deref(),
        body.new_password.as_deref(),
    ) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "current and new passwords are required",
        );
    };

    match services.change_password(account_id, current, new).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "password updated" }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn add_to_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AddToCartRequest>,
) -> axum::response::Response {
    let account_id: AccountId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = authz::require_self(&ctx, account_id) {
        return errors::domain_error_to_response(e);
    }

    let (Some(product_raw), Some(quantity), Some(price)) =
        (body.product_id.as_deref(), body.quantity, body.price)
    else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "productId, quantity, and price are required",
        );
    };

    let product_id: ProductId = match product_raw.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .add_to_cart(account_id, product_id, quantity, price)
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "product added to cart" })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use storefront_accounts::Account;
use storefront_catalog::Product;
use storefront_core::{AccountId, OrderId, ProductId};
use storefront_orders::OrderStatus;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AuthContext;

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::PlaceOrderRequest>,
) -> axum::response::Response {
    let items = match body.items {
        Some(items) if !items.is_empty() => items,
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "items array is required and must not be empty",
            );
        }
    };

    let Some(user) = body.user else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "user details (name, phone, address) are required",
        );
    };

    let mut drafts = Vec::with_capacity(items.len());
    for item in items {
        match item.into_draft() {
            Ok(draft) => drafts.push(draft),
            Err(e) => return errors::domain_error_to_response(e),
        }
    }

    match services.place_order(ctx.account_id(), drafts, user.into()).await {
        Ok(order) => (
            StatusCode::OK,
            Json(json!({
                "message": "order created successfully",
                "order": dto::order_to_json(&order),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    if let Err(e) = services.require_account(ctx.account_id()).await {
        return errors::domain_error_to_response(e);
    }

    let orders = match services.orders_visible_to(ctx.account_id(), ctx.role()).await {
        Ok(orders) => orders,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // Display enrichment re-resolves owners and current product data,
    // memoized across the orders in this response.
    let mut owners: HashMap<AccountId, Option<Account>> = HashMap::new();
    let mut products: HashMap<ProductId, Product> = HashMap::new();

    let mut enriched = Vec::with_capacity(orders.len());
    for order in &orders {
        if !owners.contains_key(&order.account_id) {
            match services.find_account(order.account_id).await {
                Ok(found) => {
                    owners.insert(order.account_id, found);
                }
                Err(e) => return errors::domain_error_to_response(e),
            }
        }

        for line in &order.items {
            if !products.contains_key(&line.product_id) {
                match services.find_product(line.product_id).await {
                    Ok(Some(product)) => {
                        products.insert(line.product_id, product);
                    }
                    Ok(None) => {}
                    Err(e) => return errors::domain_error_to_response(e),
                }
            }
        }

        let owner = owners.get(&order.account_id).and_then(|o| o.as_ref());
        enriched.push(dto::enriched_order_to_json(
            order,
            owner,
            &products,
            services.cancellation(),
        ));
    }

    (StatusCode::OK, Json(enriched)).into_response()
}

pub async fn update_order_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateStatusRequest>,
) -> axum::response::Response {
    let Some(status) = body.status.as_deref() else {
        return errors::json_error(StatusCode::BAD_REQUEST, "status is required");
    };

    let requested: OrderStatus = match status.parse() {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let order_id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .set_order_status(order_id, requested, ctx.account_id(), ctx.role())
        .await
    {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

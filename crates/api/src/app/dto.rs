use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use storefront_accounts::Account;
use storefront_catalog::{Product, ProductDraft};
use storefront_core::{DomainError, ProductId};
use storefront_orders::{CancellationPolicy, LineItemDraft, Order, ShippingDraft};

// -------------------------
// Request DTOs
// -------------------------
//
// Wire field names are camelCase (the JSON contract of the storefront
// clients); fields stay optional so missing values surface as 400s from the
// validation rules instead of body-rejection errors.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Option<String>,
    pub quantity: Option<u32>,
    pub price: Option<Decimal>,
    pub name: Option<String>,
}

impl OrderItemRequest {
    pub fn into_draft(self) -> Result<LineItemDraft, DomainError> {
        let product_id = match self.product_id {
            Some(raw) => Some(raw.parse::<ProductId>()?),
            None => None,
        };

        Ok(LineItemDraft {
            product_id,
            name: self.name,
            quantity: self.quantity,
            unit_price: self.price,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ShippingRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<ShippingRequest> for ShippingDraft {
    fn from(value: ShippingRequest) -> Self {
        ShippingDraft {
            name: value.name,
            phone: value.phone,
            address: value.address,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Option<Vec<OrderItemRequest>>,
    pub user: Option<ShippingRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub stock: Option<u32>,
    pub category: Option<String>,
}

impl From<ProductRequest> for ProductDraft {
    fn from(value: ProductRequest) -> Self {
        ProductDraft {
            name: value.name,
            price: value.price,
            description: value.description,
            image: value.image,
            stock: value.stock,
            category: value.category,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Option<String>,
    pub quantity: Option<u32>,
    pub price: Option<Decimal>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(product: &Product) -> serde_json::Value {
    json!({
        "id": product.id.to_string(),
        "name": product.name,
        "price": product.price,
        "description": product.description,
        "image": product.image,
        "stock": product.stock,
        "category": product.category,
        "createdAt": product.created_at.to_rfc3339(),
        "updatedAt": product.updated_at.to_rfc3339(),
    })
}

/// Stored order view: snapshot line items and totals as captured at
/// creation time.
pub fn order_to_json(order: &Order) -> serde_json::Value {
    json!({
        "id": order.id.to_string(),
        "userId": order.account_id.to_string(),
        "products": order.items.iter().map(|line| json!({
            "productId": line.product_id.to_string(),
            "name": line.name,
            "quantity": line.quantity,
            "price": line.unit_price,
            "total": line.line_total,
        })).collect::<Vec<_>>(),
        "totalAmount": order.total_amount,
        "userDetails": {
            "name": order.shipping.name,
            "phone": order.shipping.phone,
            "address": order.shipping.address,
        },
        "status": order.status.as_str(),
        "createdAt": order.created_at.to_rfc3339(),
    })
}

/// Listing view: line items re-resolve the current product name/price/image
/// (with placeholders when a product no longer exists), the display total is
/// recomputed from current prices, and the owner's name/email replace the
/// shipping block. The stored order is not touched.
pub fn enriched_order_to_json(
    order: &Order,
    owner: Option<&Account>,
    products: &HashMap<ProductId, Product>,
    policy: &CancellationPolicy,
) -> serde_json::Value {
    let lines: Vec<serde_json::Value> = order
        .items
        .iter()
        .map(|line| {
            let current = products.get(&line.product_id);
            let price = current.map(|p| p.price).unwrap_or(Decimal::ZERO);
            json!({
                "productId": line.product_id.to_string(),
                "name": current.map(|p| p.name.as_str()).unwrap_or("Unknown Product"),
                "quantity": line.quantity,
                "price": price,
                "image": current
                    .and_then(|p| p.image.as_deref())
                    .unwrap_or("/default-product-image.jpg"),
                "total": price * Decimal::from(line.quantity),
            })
        })
        .collect();

    let display_total: Decimal = order
        .items
        .iter()
        .map(|line| {
            let price = products
                .get(&line.product_id)
                .map(|p| p.price)
                .unwrap_or(Decimal::ZERO);
            price * Decimal::from(line.quantity)
        })
        .sum();

    json!({
        "id": order.id.to_string(),
        "userId": order.account_id.to_string(),
        "products": lines,
        "totalAmount": display_total,
        "userDetails": {
            "name": owner.and_then(|a| a.name.as_deref()).unwrap_or("Unknown User"),
            "email": owner.map(|a| a.email.as_str()).unwrap_or("No Email"),
        },
        "status": order.status.as_str(),
        "createdAt": order.created_at.to_rfc3339(),
        "cancellableUntil": policy.cancellable_until(order.created_at).to_rfc3339(),
    })
}

pub fn profile_to_json(account: &Account) -> serde_json::Value {
    json!({
        "id": account.id.to_string(),
        "name": account.name,
        "email": account.email,
        "phone": account.phone.as_deref().unwrap_or(""),
        "address": account.address.as_deref().unwrap_or(""),
        "role": account.role.as_str(),
        "cart": account.cart.iter().map(|entry| json!({
            "productId": entry.product_id.to_string(),
            "quantity": entry.quantity,
            "price": entry.unit_price,
        })).collect::<Vec<_>>(),
    })
}

pub fn account_summary_to_json(account: &Account) -> serde_json::Value {
    json!({
        "id": account.id.to_string(),
        "name": account.name.as_deref().unwrap_or("N/A"),
        "email": account.email,
        "role": account.role.as_str(),
        "phone": account.phone.as_deref().unwrap_or("N/A"),
        "address": account.address.as_deref().unwrap_or("N/A"),
    })
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, ProductId};

/// A catalog product.
///
/// # Invariants
/// - `price` ≥ 0 and `stock` ≥ 0 (by type).
/// - `category` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub image: Option<String>,
    pub stock: u32,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming product fields, before validation.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub stock: Option<u32>,
    pub category: Option<String>,
}

fn required_text(value: Option<String>, field: &str) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(DomainError::validation(format!("{field} is required"))),
    }
}

fn required_price(value: Option<Decimal>) -> Result<Decimal, DomainError> {
    let price = value.ok_or_else(|| DomainError::validation("price is required"))?;
    if price < Decimal::ZERO {
        return Err(DomainError::validation("price must not be negative"));
    }
    Ok(price)
}

impl Product {
    /// Validate a draft and build a new product.
    ///
    /// Name, price, description, and category are required; stock defaults
    /// to 0 when omitted; image stays optional.
    pub fn create(id: ProductId, draft: ProductDraft, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let name = required_text(draft.name, "name")?;
        let price = required_price(draft.price)?;
        let description = required_text(draft.description, "description")?;
        let category = required_text(draft.category, "category")?;

        Ok(Self {
            id,
            name,
            price,
            description,
            image: draft.image,
            stock: draft.stock.unwrap_or(0),
            category,
            created_at: now,
            updated_at: now,
        })
    }

    /// Full replace of the editable fields.
    ///
    /// Unlike creation, image and stock are also required here; a missing
    /// field fails the whole update rather than keeping the old value.
    pub fn update(&mut self, draft: ProductDraft, now: DateTime<Utc>) -> Result<(), DomainError> {
        let name = required_text(draft.name, "name")?;
        let price = required_price(draft.price)?;
        let description = required_text(draft.description, "description")?;
        let image = required_text(draft.image, "image")?;
        let stock = draft
            .stock
            .ok_or_else(|| DomainError::validation("stock is required"))?;
        let category = required_text(draft.category, "category")?;

        self.name = name;
        self.price = price;
        self.description = description;
        self.image = Some(image);
        self.stock = stock;
        self.category = category;
        self.updated_at = now;
        Ok(())
    }
}

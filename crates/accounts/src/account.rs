use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_auth::Role;
use storefront_core::{AccountId, DomainError, ProductId};

/// One product held in an account's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price captured when the product was added.
    pub unit_price: Decimal,
}

/// A registered identity (shopper or admin).
///
/// # Invariants
/// - Email is unique across the directory (enforced by the directory
///   operations, not by this record).
/// - Role defaults to `User` at registration and is never self-escalated.
/// - Accounts are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub cart: Vec<CartEntry>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh account record at registration time.
    ///
    /// The email is trimmed and lowercased; role starts as `User`.
    pub fn register(
        id: AccountId,
        email: &str,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        Ok(Self {
            id,
            email,
            password_hash,
            name: None,
            phone: None,
            address: None,
            role: Role::User,
            cart: Vec::new(),
            created_at,
        })
    }

    /// Apply a profile patch. Only fields present on [`ProfilePatch`] exist
    /// to be applied; everything else in an incoming payload was already
    /// dropped at the deserialization boundary.
    pub fn apply_patch(&mut self, patch: &ProfilePatch) {
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        if let Some(email) = &patch.email {
            self.email = email.trim().to_lowercase();
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(address) = &patch.address {
            self.address = Some(address.clone());
        }
    }

    /// Merge a product into the cart: an existing entry gains quantity, a
    /// new product is appended with its captured unit price.
    pub fn add_to_cart(&mut self, product_id: ProductId, quantity: u32, unit_price: Decimal) {
        if let Some(entry) = self.cart.iter_mut().find(|e| e.product_id == product_id) {
            entry.quantity += quantity;
        } else {
            self.cart.push(CartEntry {
                product_id,
                quantity,
                unit_price,
            });
        }
    }

    /// Capture checkout shipping details as the new profile defaults, so the
    /// next checkout can be pre-filled.
    pub fn remember_shipping(&mut self, name: &str, phone: &str, address: &str) {
        self.name = Some(name.to_string());
        self.phone = Some(phone.to_string());
        self.address = Some(address.to_string());
    }

    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
    }
}

/// Profile update patch.
///
/// The field set *is* the allow-list: unknown fields in an incoming payload
/// are dropped during deserialization rather than merged into the record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

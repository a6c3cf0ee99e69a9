//! `storefront-catalog` — the product catalog.
//!
//! Product records plus the create/update validation rules. Admin-only
//! mutation is enforced at the API boundary; reads are open to anyone.

pub mod product;

pub use product::{Product, ProductDraft};

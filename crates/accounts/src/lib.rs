//! `storefront-accounts` — the user directory.
//!
//! Account records, cart entries, and the profile/password mutation rules.
//! Storage and password hashing stay outside; this crate only decides what a
//! valid account mutation looks like.

pub mod account;

pub use account::{Account, CartEntry, ProfilePatch};

use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_auth::Role;
use storefront_core::{AccountId, DomainError, OrderId, ProductId};

use crate::policy::CancellationPolicy;

/// Order status lifecycle.
///
/// `Pending` is the only initial state. For non-admin requesters both
/// `Delivered` and `Canceled` are terminal; admins may set any status at any
/// time, including moving out of a terminal state. That asymmetry is an
/// intentional operator override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Canceled => "Canceled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Canceled" => Ok(OrderStatus::Canceled),
            other => Err(DomainError::validation(format!("unknown status: {other}"))),
        }
    }
}

/// One product-quantity-price line within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    /// Product name captured at order time; not tracked against later
    /// catalog edits.
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Shipping details captured at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// A persisted checkout.
///
/// # Invariants
/// - `total_amount` equals the sum of all line totals at creation time.
/// - Status only changes through [`Order::set_status`].
/// - Orders are never deleted; product references are weak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub account_id: AccountId,
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub shipping: ShippingDetails,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One order line as received from the client, before validation.
#[derive(Debug, Clone, Default)]
pub struct LineItemDraft {
    pub product_id: Option<ProductId>,
    pub name: Option<String>,
    pub quantity: Option<u32>,
    pub unit_price: Option<Decimal>,
}

/// Shipping details as received from the client, before validation.
#[derive(Debug, Clone, Default)]
pub struct ShippingDraft {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

fn required_text(value: Option<String>, field: &str) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::validation(format!("{field} is required"))),
    }
}

impl Order {
    /// Build a `Pending` order from a cart submission.
    ///
    /// The caller-supplied unit price is trusted here; each line total and
    /// the aggregate total are computed once and stored as a snapshot.
    pub fn place(
        id: OrderId,
        account_id: AccountId,
        items: Vec<LineItemDraft>,
        shipping: ShippingDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if items.is_empty() {
            return Err(DomainError::validation("order must contain at least one item"));
        }

        let mut lines = Vec::with_capacity(items.len());
        for draft in items {
            let product_id = draft
                .product_id
                .ok_or_else(|| DomainError::validation("item product id is required"))?;
            let quantity = match draft.quantity {
                Some(q) if q > 0 => q,
                Some(_) => return Err(DomainError::validation("item quantity must be positive")),
                None => return Err(DomainError::validation("item quantity is required")),
            };
            let unit_price = draft
                .unit_price
                .ok_or_else(|| DomainError::validation("item price is required"))?;
            if unit_price < Decimal::ZERO {
                return Err(DomainError::validation("item price must not be negative"));
            }

            let line_total = unit_price * Decimal::from(quantity);
            lines.push(LineItem {
                product_id,
                name: draft.name.unwrap_or_default(),
                quantity,
                unit_price,
                line_total,
            });
        }

        let total_amount: Decimal = lines.iter().map(|l| l.line_total).sum();

        let shipping = ShippingDetails {
            name: required_text(shipping.name, "shipping name")?,
            phone: required_text(shipping.phone, "shipping phone")?,
            address: required_text(shipping.address, "shipping address")?,
        };

        Ok(Self {
            id,
            account_id,
            items: lines,
            total_amount,
            shipping,
            status: OrderStatus::Pending,
            created_at: now,
        })
    }

    pub fn is_owned_by(&self, account_id: AccountId) -> bool {
        self.account_id == account_id
    }

    /// Apply a status transition requested by `requester`.
    ///
    /// Admins may set any of the three statuses unconditionally. Any other
    /// requester may only cancel their own order, and only while the
    /// cancellation window is still open. On error the order is left
    /// unchanged.
    pub fn set_status(
        &mut self,
        requested: OrderStatus,
        requester: AccountId,
        role: Role,
        now: DateTime<Utc>,
        policy: &CancellationPolicy,
    ) -> Result<(), DomainError> {
        if role.is_admin() {
            self.status = requested;
            return Ok(());
        }

        if requested != OrderStatus::Canceled {
            return Err(DomainError::forbidden("only order cancellation is permitted"));
        }
        if !self.is_owned_by(requester) {
            return Err(DomainError::forbidden("cannot cancel another account's order"));
        }
        if policy.has_expired(self.created_at, now) {
            return Err(DomainError::validation("cancellation window expired"));
        }

        self.status = OrderStatus::Canceled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(quantity: u32, cents: i64) -> LineItemDraft {
        LineItemDraft {
            product_id: Some(ProductId::new()),
            name: Some("Widget".to_string()),
            quantity: Some(quantity),
            unit_price: Some(Decimal::new(cents, 2)),
        }
    }

    fn shipping() -> ShippingDraft {
        ShippingDraft {
            name: Some("A".to_string()),
            phone: Some("555".to_string()),
            address: Some("X".to_string()),
        }
    }

    fn placed(items: Vec<LineItemDraft>) -> Order {
        Order::place(OrderId::new(), AccountId::new(), items, shipping(), Utc::now()).unwrap()
    }

    #[test]
    fn place_computes_line_and_aggregate_totals() {
        // 2 × 10.00 = 20.00
        let order = placed(vec![item(2, 1000)]);

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items[0].line_total, Decimal::new(2000, 2));
        assert_eq!(order.total_amount, Decimal::new(2000, 2));
    }

    #[test]
    fn place_sums_across_lines() {
        let order = placed(vec![item(2, 1000), item(3, 250)]);
        assert_eq!(order.total_amount, Decimal::new(2750, 2));
    }

    #[test]
    fn place_rejects_empty_cart() {
        let err = Order::place(OrderId::new(), AccountId::new(), vec![], shipping(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn place_rejects_incomplete_items() {
        let missing_product = LineItemDraft {
            product_id: None,
            ..item(1, 100)
        };
        let missing_quantity = LineItemDraft {
            quantity: None,
            ..item(1, 100)
        };
        let missing_price = LineItemDraft {
            unit_price: None,
            ..item(1, 100)
        };
        let zero_quantity = LineItemDraft {
            quantity: Some(0),
            ..item(1, 100)
        };

        for draft in [missing_product, missing_quantity, missing_price, zero_quantity] {
            let result =
                Order::place(OrderId::new(), AccountId::new(), vec![draft], shipping(), Utc::now());
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }
    }

    #[test]
    fn place_rejects_missing_shipping_fields() {
        let missing_phone = ShippingDraft {
            phone: None,
            ..shipping()
        };

        let result = Order::place(
            OrderId::new(),
            AccountId::new(),
            vec![item(1, 100)],
            missing_phone,
            Utc::now(),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn owner_can_cancel_within_window() {
        let mut order = placed(vec![item(1, 100)]);
        let owner = order.account_id;

        order
            .set_status(
                OrderStatus::Canceled,
                owner,
                Role::User,
                order.created_at + Duration::hours(1),
                &CancellationPolicy::hours(3),
            )
            .unwrap();

        assert_eq!(order.status, OrderStatus::Canceled);
    }

    #[test]
    fn cancel_after_window_fails_and_leaves_status_unchanged() {
        let mut order = placed(vec![item(1, 100)]);
        let owner = order.account_id;

        // Created five hours ago against a three-hour window.
        let err = order
            .set_status(
                OrderStatus::Canceled,
                owner,
                Role::User,
                order.created_at + Duration::hours(5),
                &CancellationPolicy::hours(3),
            )
            .unwrap_err();

        assert_eq!(err, DomainError::validation("cancellation window expired"));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn non_owner_cancel_is_forbidden() {
        let mut order = placed(vec![item(1, 100)]);

        let err = order
            .set_status(
                OrderStatus::Canceled,
                AccountId::new(),
                Role::User,
                order.created_at,
                &CancellationPolicy::default(),
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn non_admin_cannot_request_delivery() {
        let mut order = placed(vec![item(1, 100)]);
        let owner = order.account_id;

        let err = order
            .set_status(
                OrderStatus::Delivered,
                owner,
                Role::User,
                order.created_at,
                &CancellationPolicy::default(),
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn admin_override_leaves_terminal_state() {
        let mut order = placed(vec![item(1, 100)]);
        let admin = AccountId::new();

        order
            .set_status(
                OrderStatus::Canceled,
                admin,
                Role::Admin,
                order.created_at,
                &CancellationPolicy::default(),
            )
            .unwrap();
        assert_eq!(order.status, OrderStatus::Canceled);

        // Terminal for users, not for operators.
        order
            .set_status(
                OrderStatus::Delivered,
                admin,
                Role::Admin,
                order.created_at + Duration::days(7),
                &CancellationPolicy::default(),
            )
            .unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn admin_override_ignores_the_window() {
        let mut order = placed(vec![item(1, 100)]);

        order
            .set_status(
                OrderStatus::Canceled,
                AccountId::new(),
                Role::Admin,
                order.created_at + Duration::days(30),
                &CancellationPolicy::hours(3),
            )
            .unwrap();

        assert_eq!(order.status, OrderStatus::Canceled);
    }

    #[test]
    fn status_parses_exactly_three_values() {
        assert_eq!("Pending".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("Delivered".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
        assert_eq!("Canceled".parse::<OrderStatus>().unwrap(), OrderStatus::Canceled);
        assert!("Shipped".parse::<OrderStatus>().is_err());
        assert!("pending".parse::<OrderStatus>().is_err());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: the aggregate total always equals the sum of
            /// quantity × unit price across all lines.
            #[test]
            fn total_equals_sum_of_line_products(
                lines in prop::collection::vec((1u32..50, 0i64..100_000), 1..10)
            ) {
                let drafts: Vec<LineItemDraft> = lines
                    .iter()
                    .map(|(quantity, cents)| item(*quantity, *cents))
                    .collect();

                let order = Order::place(
                    OrderId::new(),
                    AccountId::new(),
                    drafts,
                    shipping(),
                    Utc::now(),
                )
                .unwrap();

                let expected: Decimal = lines
                    .iter()
                    .map(|(quantity, cents)| Decimal::new(*cents, 2) * Decimal::from(*quantity))
                    .sum();

                prop_assert_eq!(order.total_amount, expected);
            }
        }
    }
}

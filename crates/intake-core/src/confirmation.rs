//! # Confirmation Builder
//!
//! Turns a validation outcome into the record returned to the submitter.
//!
//! ```text
//! build(order, is_valid)
//!      │
//!      ├── true  ──► orderId, customerName, customerEmail, orderDate copied
//!      │             orderStatus = RECEIVED
//!      │             totalAmount = Σ quantity × unitPrice   (integer cents)
//!      │
//!      └── false ──► orderStatus = INVALID, everything else empty, total 0
//! ```
//!
//! Pure: no logging, no mutation, same inputs give the same record.

use crate::money::Money;
use crate::types::{OrderConfirmation, OrderRequest, OrderStatus};

/// Builds the confirmation for `order`.
///
/// `is_valid` is trusted as given. If it is `true` for an order whose total
/// cannot be computed (which the validator never allows), the total is zero.
///
/// ```rust
/// use intake_core::confirmation::build_confirmation;
/// use intake_core::{LineItem, OrderRequest, OrderStatus};
///
/// let order = OrderRequest {
///     order_id: Some("ORD-1".to_string()),
///     line_items: Some(vec![LineItem::new("P1", "Widget", 2, 9.99)]),
///     ..Default::default()
/// };
///
/// let confirmation = build_confirmation(&order, true);
/// assert_eq!(confirmation.order_status, OrderStatus::Received);
/// assert_eq!(confirmation.total_amount.cents(), 1998);
///
/// let rejected = build_confirmation(&order, false);
/// assert_eq!(rejected.order_id, None);
/// ```
pub fn build_confirmation(order: &OrderRequest, is_valid: bool) -> OrderConfirmation {
    if is_valid {
        OrderConfirmation::received(order)
    } else {
        OrderConfirmation::invalid()
    }
}

impl OrderConfirmation {
    /// Confirmation for an accepted order.
    pub fn received(order: &OrderRequest) -> Self {
        OrderConfirmation {
            order_id: order.order_id.clone(),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            order_date: order.order_date.clone(),
            order_status: OrderStatus::Received,
            total_amount: order.total_amount().unwrap_or_default(),
        }
    }

    /// Confirmation for a rejected order. Carries nothing but the status.
    pub fn invalid() -> Self {
        OrderConfirmation {
            order_id: None,
            customer_name: None,
            customer_email: None,
            order_date: None,
            order_status: OrderStatus::Invalid,
            total_amount: Money::zero(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

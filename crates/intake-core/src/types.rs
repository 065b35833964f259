//! # Domain Types
//!
//! Wire types for a submitted order and its confirmation.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐          ┌─────────────────────┐              │
//! │  │    OrderRequest     │ 1      * │      LineItem       │              │
//! │  │  ─────────────────  │─────────►│  ─────────────────  │              │
//! │  │  order_id           │          │  product_id         │              │
//! │  │  customer_*         │          │  product_name       │              │
//! │  │  shipping_address   │          │  quantity (i32)     │              │
//! │  │  order_date         │          │  unit_price (f64)   │              │
//! │  │  order_status (raw) │          └─────────────────────┘              │
//! │  └──────────┬──────────┘                                                │
//! │             │ validate + build                                          │
//! │             ▼                                                           │
//! │  ┌─────────────────────┐          ┌─────────────────────┐              │
//! │  │  OrderConfirmation  │─────────►│    OrderStatus      │              │
//! │  │  ─────────────────  │          │  ─────────────────  │              │
//! │  │  order_id, name,    │          │  RECEIVED           │              │
//! │  │  email, order_date  │          │  INVALID            │              │
//! │  │  total_amount       │          └─────────────────────┘              │
//! │  └─────────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Missing Fields
//! Every string on `OrderRequest` is an `Option`: the validator must cope with
//! whatever the deserializer produced, so nothing is assumed to be populated.
//! `OrderRequest::default()` is the entirely empty order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Line Item
// =============================================================================

/// One product entry in an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct LineItem {
    pub product_id: Option<String>,

    pub product_name: Option<String>,

    /// Units ordered. Absent on the wire means 0, which fails validation.
    pub quantity: i32,

    /// Price per unit as submitted (decimal).
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: i32,
        unit_price: f64,
    ) -> Self {
        LineItem {
            product_id: Some(product_id.into()),
            product_name: Some(product_name.into()),
            quantity,
            unit_price,
        }
    }

    /// The unit price in cents, `None` if it cannot be represented.
    #[inline]
    pub fn unit_price_money(&self) -> Option<Money> {
        Money::from_decimal(self.unit_price)
    }

    /// `quantity × unit_price`, derived on demand and never stored.
    ///
    /// `None` when the unit price is not representable or the product
    /// overflows.
    pub fn total_price(&self) -> Option<Money> {
        self.unit_price_money()?.checked_mul_quantity(self.quantity)
    }
}

// =============================================================================
// Order Request
// =============================================================================

/// A submitted purchase order, as deserialized from the inbound payload.
///
/// `order_status` is whatever the caller sent. It is carried through to the
/// downstream queue untouched and plays no part in validation or in the
/// derived [`OrderStatus`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct OrderRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub payment_method: Option<String>,

    /// Opaque date representation; never parsed.
    pub order_date: Option<String>,

    /// Caller-supplied status string (inert).
    pub order_status: Option<String>,

    pub order_id: Option<String>,

    /// Products in the order. `None` when the payload omitted the list or
    /// sent `null`.
    pub line_items: Option<Vec<LineItem>>,

    pub special_instructions: Option<String>,
    pub customer_id: Option<String>,
}

impl OrderRequest {
    /// Line items, empty when the list was missing.
    #[inline]
    pub fn items(&self) -> &[LineItem] {
        self.line_items.as_deref().unwrap_or_default()
    }

    /// Sum of every line item's total price.
    ///
    /// `None` if any line total is unrepresentable or the sum overflows.
    /// Integer addition makes the result independent of line item order.
    pub fn total_amount(&self) -> Option<Money> {
        let lines = self
            .items()
            .iter()
            .map(LineItem::total_price)
            .collect::<Option<Vec<Money>>>()?;
        Money::checked_sum(lines)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Status derived by intake.
///
/// Later states (shipped, cancelled, ...) belong to downstream systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum OrderStatus {
    /// Passed every constraint and was accepted.
    Received,
    /// Failed one or more constraints.
    Invalid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "RECEIVED",
            OrderStatus::Invalid => "INVALID",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order Confirmation
// =============================================================================

/// The record returned to the submitter.
///
/// For an INVALID order every identifying field is `None` and the total is
/// zero: nothing from a rejected order is echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderConfirmation {
    pub order_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub order_date: Option<String>,
    pub order_status: OrderStatus,

    #[ts(type = "number")]
    pub total_amount: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Order Intake
//!
//! Composes the validator, the confirmation builder and the publisher.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     OrderIntake::receive(order)                         │
//! │                                                                         │
//! │  Validator::is_valid(order) ──────────► bool                            │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  build_confirmation(order, bool) ──► OrderConfirmation                  │
//! │                                          │                              │
//! │       ┌── valid ─────────────────────────┤                              │
//! │       ▼                                  │                              │
//! │  OrderPublisher::publish(order)          │                              │
//! │   Ok  ──► Dispatch::Submitted            │                              │
//! │   Err ──► Dispatch::Failed(e)            │                              │
//! │                                          │                              │
//! │  invalid ──► Dispatch::NotSubmitted      ▼                              │
//! │                                   IntakeOutcome                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The publisher sees an order only when every constraint held, and then
//! exactly once. It receives the order unmodified.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::confirmation::build_confirmation;
use crate::error::PublishError;
use crate::types::{OrderConfirmation, OrderRequest};
use crate::validation::Validator;

// =============================================================================
// Publisher Seam
// =============================================================================

/// Downstream channel for accepted orders.
///
/// Implementations hand the order off and return immediately. Delivery,
/// retry and durability happen behind this call, not in it.
pub trait OrderPublisher: Send + Sync {
    fn publish(&self, order: &OrderRequest) -> Result<(), PublishError>;
}

// =============================================================================
// Outcome
// =============================================================================

/// What happened to the order after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Invalid; never offered to the publisher.
    NotSubmitted,
    /// Handed to the publisher.
    Submitted,
    /// Valid, but the publisher refused the hand-off.
    Failed(PublishError),
}

/// Result of one intake call.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeOutcome {
    pub confirmation: OrderConfirmation,
    pub dispatch: Dispatch,
}

// =============================================================================
// Order Intake
// =============================================================================

/// Validates, confirms, and forwards submitted orders.
///
/// Holds no per-order state; one instance serves concurrent requests.
pub struct OrderIntake {
    validator: Validator,
    publisher: Arc<dyn OrderPublisher>,
}

impl OrderIntake {
    pub fn new(validator: Validator, publisher: Arc<dyn OrderPublisher>) -> Self {
        OrderIntake {
            validator,
            publisher,
        }
    }

    /// Processes one order.
    pub fn receive(&self, order: &OrderRequest) -> IntakeOutcome {
        let order_id = order.order_id.as_deref().unwrap_or("<missing>");

        let is_valid = self.validator.is_valid(order);
        let confirmation = build_confirmation(order, is_valid);

        if !is_valid {
            debug!(order_id, "Order rejected; not forwarding");
            return IntakeOutcome {
                confirmation,
                dispatch: Dispatch::NotSubmitted,
            };
        }

        let dispatch = match self.publisher.publish(order) {
            Ok(()) => {
                info!(
                    order_id,
                    total = %confirmation.total_amount,
                    line_items = order.items().len(),
                    "Order received and forwarded"
                );
                Dispatch::Submitted
            }
            Err(e) => {
                warn!(order_id, error = %e, "Order valid but publish hand-off failed");
                Dispatch::Failed(e)
            }
        };

        IntakeOutcome {
            confirmation,
            dispatch,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

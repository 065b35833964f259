//! # intake-core: Decision Logic for Order Intake
//!
//! Decides whether a submitted purchase order is well-formed and derives
//! the confirmation returned to the submitter. Everything else (HTTP, JSON
//! body parsing, the downstream queue) lives in the app crate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Intake Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              intake-api (HTTP gateway, apps/)                   │   │
//! │  │    POST /api/ReceiveOrder ──► parse JSON ──► OrderRequest        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ intake-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌──────────────┐  ┌────────┐  │   │
//! │  │   │   types   │  │ validation │  │ confirmation │  │ intake │  │   │
//! │  │   │ Order...  │  │ rule table │  │   builder    │  │ gating │  │   │
//! │  │   └───────────┘  └────────────┘  └──────────────┘  └───┬────┘  │   │
//! │  │                                                        │       │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                 │       │   │
//! │  └────────────────────────────────────────────────────────┼───────┘   │
//! │                                                           │            │
//! │  ┌────────────────────────────────────────────────────────▼───────┐   │
//! │  │         OrderPublisher impl (queue hand-off, apps/)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (OrderRequest, LineItem, OrderConfirmation, OrderStatus)
//! - [`money`] - Integer-cent money with decimal wire form
//! - [`error`] - Violations, engine faults, publish errors
//! - [`validation`] - Rule table and fail-closed validator
//! - [`confirmation`] - Confirmation builder
//! - [`intake`] - Orchestration and the publisher seam
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use intake_core::{
//!     Dispatch, LineItem, OrderIntake, OrderPublisher, OrderRequest, OrderStatus,
//!     PublishError, Validator,
//! };
//!
//! struct Discard;
//! impl OrderPublisher for Discard {
//!     fn publish(&self, _order: &OrderRequest) -> Result<(), PublishError> {
//!         Ok(())
//!     }
//! }
//!
//! let intake = OrderIntake::new(Validator::default(), Arc::new(Discard));
//!
//! let order = OrderRequest {
//!     customer_name: Some("Ada".into()),
//!     customer_email: Some("ada@example.com".into()),
//!     customer_phone: Some("555-0100".into()),
//!     shipping_address: Some("1 Main St".into()),
//!     payment_method: Some("card".into()),
//!     order_date: Some("2024-05-01".into()),
//!     order_status: Some("NEW".into()),
//!     order_id: Some("ORD-1".into()),
//!     customer_id: Some("C-1".into()),
//!     line_items: Some(vec![LineItem::new("P1", "Widget", 2, 9.99)]),
//!     ..Default::default()
//! };
//!
//! let outcome = intake.receive(&order);
//! assert_eq!(outcome.dispatch, Dispatch::Submitted);
//! assert_eq!(outcome.confirmation.order_status, OrderStatus::Received);
//! assert_eq!(outcome.confirmation.total_amount.cents(), 1998);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod confirmation;
pub mod error;
pub mod intake;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use confirmation::build_confirmation;
pub use error::{EngineFault, PublishError, ValidationError, Violation};
pub use intake::{Dispatch, IntakeOutcome, OrderIntake, OrderPublisher};
pub use money::Money;
pub use types::*;
pub use validation::{TracingSink, ValidationConfig, Validator, ViolationSink};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest accepted local part of an email address (before the `@`).
pub const MAX_EMAIL_LOCAL_LEN: usize = 64;

/// Longest accepted domain part of an email address (after the `@`).
pub const MAX_EMAIL_DOMAIN_LEN: usize = 255;

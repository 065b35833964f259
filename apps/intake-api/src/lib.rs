//! # Order Intake API
//!
//! HTTP gateway for submitted purchase orders.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Intake API Service                             │
//! │                                                                         │
//! │  ┌────────────────────────┐  ┌────────────────────────────────────────┐│
//! │  │  routes                │  │  publisher                             ││
//! │  │                        │  │                                        ││
//! │  │ • POST ReceiveOrder    │  │ • QueuePublisher (bounded hand-off)    ││
//! │  │ • GET  /health         │  │ • QueueForwarder (retry + backoff)     ││
//! │  └───────────┬────────────┘  └───────────────────┬────────────────────┘│
//! │              │                                   │                      │
//! │              ▼                                   ▼                      │
//! │  ┌────────────────────────┐  ┌────────────────────────────────────────┐│
//! │  │  intake-core           │  │  Redis list (received-orders)          ││
//! │  │  Validator, builder    │  │  or log-only when REDIS_URL is unset   ││
//! │  └────────────────────────┘  └────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `INTAKE_BIND_ADDR` - Listen address (default: 0.0.0.0)
//! - `INTAKE_PORT` - HTTP port (default: 7071)
//! - `REDIS_URL` - Redis connection string (optional)
//! - `ORDER_QUEUE_NAME` - Redis list for accepted orders (default: received-orders)
//! - `PUBLISH_BUFFER` - Hand-off channel capacity (default: 1024)
//! - `PUBLISH_MAX_ATTEMPTS` - Push attempts per order (default: 5)
//! - `MAX_BODY_BYTES` - Request body cap (default: 1048576)
//! - `ORDER_EMAIL_PATTERN` - Email regex override (optional)

pub mod config;
pub mod error;
pub mod publisher;
pub mod routes;

use intake_core::OrderIntake;

// Re-exports
pub use config::{ConfigError, IntakeConfig};
pub use error::{ApiError, QueueError};
pub use publisher::{QueueForwarder, QueuePublisher};

/// Shared application state.
pub struct AppState {
    pub intake: OrderIntake,
    pub max_body_bytes: usize,
}

//! # Error Types
//!
//! Error types for intake-core.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ValidationError  - one field failed one rule (expected, data-driven)  │
//! │    └── wrapped in Violation with its full field path                   │
//! │        Never returned across the public boundary: the caller only     │
//! │        sees `is_valid == false` and an INVALID confirmation.          │
//! │                                                                         │
//! │  EngineFault      - the rule engine itself could not run               │
//! │    └── recovered locally: the order is treated as invalid             │
//! │                                                                         │
//! │  PublishError     - hand-off to the downstream queue failed            │
//! │    └── reported in the intake outcome, never raised                   │
//! │                                                                         │
//! │  Malformed input never reaches this crate: the gateway rejects it     │
//! │  before an OrderRequest exists.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// A single rule failure for one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required string or collection is missing or has no elements.
    #[error("must not be empty")]
    Empty,

    /// Value does not match the expected format.
    #[error("must be a well-formed {expected}")]
    InvalidFormat { expected: &'static str },

    /// Numeric value is below its lower bound.
    #[error("must be greater than or equal to {min}")]
    BelowMinimum { min: &'static str },

    /// Amount cannot be held as whole cents.
    #[error("must be a finite amount representable in cents")]
    NotRepresentable,

    /// A derived amount overflowed.
    #[error("must not overflow when totalled")]
    Overflow,
}

/// A [`ValidationError`] located at a field path such as
/// `lineItems[1].quantity`.
///
/// Violations are diagnostics only. They go to the violation sink and never
/// change what the caller receives beyond the final boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub error: ValidationError,
}

impl Violation {
    pub fn new(path: impl Into<String>, error: ValidationError) -> Self {
        Violation {
            path: path.into(),
            error,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

// =============================================================================
// Engine Fault
// =============================================================================

/// The validation machinery failed to run.
///
/// Any fault means the order is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFault {
    /// The configured email pattern does not compile.
    #[error("invalid email pattern: {0}")]
    InvalidEmailPattern(String),

    /// A rule panicked while evaluating.
    #[error("rule evaluation panicked: {0}")]
    Panicked(String),
}

// =============================================================================
// Publish Error
// =============================================================================

/// Handing an accepted order to the downstream channel failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The hand-off buffer is full.
    #[error("publish buffer is full (capacity {capacity})")]
    Backpressure { capacity: usize },

    /// Nothing is draining the channel any more.
    #[error("publish channel is closed")]
    Closed,
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Validation Module
//!
//! Decides whether a submitted order is well-formed.
//!
//! ## Rule Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validator.is_valid(order)                          │
//! │                                                                         │
//! │  ORDER_RULES (one pass over OrderRequest)                               │
//! │  ├── customerName, customerPhone, shippingAddress, paymentMethod,      │
//! │  │   orderDate, orderStatus, orderId, customerId   → not empty          │
//! │  ├── customerEmail                                 → not empty + email  │
//! │  └── lineItems                                     → not empty,         │
//! │                                                      total computable   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  LINE_ITEM_RULES (for every lineItems[i])                               │
//! │  ├── productId, productName                        → not empty          │
//! │  ├── quantity                                      → ≥ 1                │
//! │  └── unitPrice                                     → ≥ 0.01, in cents   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  violations.is_empty()  ──► true / false                                │
//! │  violations             ──► ViolationSink (diagnostics only)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rule runs; one violation anywhere invalidates the whole order.
//!
//! ## Fail Closed
//! If the engine cannot run (bad email pattern, a rule panics) the order is
//! invalid. Nothing escapes `is_valid` except the boolean.
//!
//! ## Usage
//! ```rust
//! use intake_core::validation::Validator;
//! use intake_core::{LineItem, OrderRequest};
//!
//! let validator = Validator::default();
//!
//! let order = OrderRequest {
//!     line_items: Some(vec![LineItem::new("P1", "Widget", 1, 5.00)]),
//!     ..Default::default()
//! };
//! // Customer fields are missing
//! assert!(!validator.is_valid(&order));
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use regex::Regex;
use tracing::{error, warn};

use crate::error::{EngineFault, ValidationError, Violation};
use crate::money::Money;
use crate::types::{LineItem, OrderRequest};
use crate::{MAX_EMAIL_DOMAIN_LEN, MAX_EMAIL_LOCAL_LEN};

/// Email addresses accepted by default: dot-atom local part, then a host
/// name or a bracketed IP literal. Case-insensitive.
pub const DEFAULT_EMAIL_PATTERN: &str = r##"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*|\[[0-9a-f:.]+\])$"##;

// =============================================================================
// Rules
// =============================================================================

/// The kind of constraint a rule applies, with the accessor it reads.
pub enum Check<T> {
    /// String is present and not empty.
    Required(fn(&T) -> Option<&str>),

    /// String, when present and not empty, is an email address.
    /// Pair with `Required` to make it mandatory.
    Email(fn(&T) -> Option<&str>),

    /// Collection is present with at least one element.
    NonEmpty(fn(&T) -> Option<usize>),

    /// Integer is at least `min`.
    MinInt {
        get: fn(&T) -> i64,
        min: i64,
        label: &'static str,
    },

    /// Decimal is at least `min`. NaN fails.
    MinDecimal {
        get: fn(&T) -> f64,
        min: f64,
        label: &'static str,
    },

    /// Decimal converts to whole cents.
    Cents(fn(&T) -> f64),

    /// Derived amounts can be computed without overflow.
    Computable(fn(&T) -> bool),
}

/// One row of the rule table: a field and the constraint it must satisfy.
pub struct Rule<T> {
    pub field: &'static str,
    pub check: Check<T>,
}

impl<T> Rule<T> {
    pub const fn new(field: &'static str, check: Check<T>) -> Self {
        Rule { field, check }
    }

    fn evaluate(&self, target: &T, email: &Regex) -> Option<ValidationError> {
        match &self.check {
            Check::Required(get) => match get(target) {
                Some(value) if !value.is_empty() => None,
                _ => Some(ValidationError::Empty),
            },
            Check::Email(get) => match get(target) {
                Some(value) if !value.is_empty() && !is_email(email, value) => {
                    Some(ValidationError::InvalidFormat {
                        expected: "email address",
                    })
                }
                _ => None,
            },
            Check::NonEmpty(get) => match get(target) {
                Some(len) if len > 0 => None,
                _ => Some(ValidationError::Empty),
            },
            Check::MinInt { get, min, label } => {
                (get(target) < *min).then_some(ValidationError::BelowMinimum { min: *label })
            }
            Check::MinDecimal { get, min, label } => {
                // written as !(x >= min) so NaN is rejected
                (!(get(target) >= *min)).then_some(ValidationError::BelowMinimum { min: *label })
            }
            Check::Cents(get) => Money::from_decimal(get(target))
                .is_none()
                .then_some(ValidationError::NotRepresentable),
            Check::Computable(ok) => (!ok(target)).then_some(ValidationError::Overflow),
        }
    }
}

fn is_email(pattern: &Regex, value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };

    local.len() <= MAX_EMAIL_LOCAL_LEN
        && domain.len() <= MAX_EMAIL_DOMAIN_LEN
        && pattern.is_match(value)
}

/// Rules applied to the order itself.
pub fn order_rules() -> Vec<Rule<OrderRequest>> {
    vec![
        Rule::new(
            "customerName",
            Check::Required(|o: &OrderRequest| o.customer_name.as_deref()),
        ),
        Rule::new(
            "customerEmail",
            Check::Required(|o: &OrderRequest| o.customer_email.as_deref()),
        ),
        Rule::new(
            "customerEmail",
            Check::Email(|o: &OrderRequest| o.customer_email.as_deref()),
        ),
        Rule::new(
            "customerPhone",
            Check::Required(|o: &OrderRequest| o.customer_phone.as_deref()),
        ),
        Rule::new(
            "shippingAddress",
            Check::Required(|o: &OrderRequest| o.shipping_address.as_deref()),
        ),
        Rule::new(
            "paymentMethod",
            Check::Required(|o: &OrderRequest| o.payment_method.as_deref()),
        ),
        Rule::new(
            "orderDate",
            Check::Required(|o: &OrderRequest| o.order_date.as_deref()),
        ),
        Rule::new(
            "orderStatus",
            Check::Required(|o: &OrderRequest| o.order_status.as_deref()),
        ),
        Rule::new(
            "orderId",
            Check::Required(|o: &OrderRequest| o.order_id.as_deref()),
        ),
        Rule::new(
            "lineItems",
            Check::NonEmpty(|o: &OrderRequest| o.line_items.as_ref().map(Vec::len)),
        ),
        // Unrepresentable prices are reported per item; only overflow is left here.
        Rule::new(
            "lineItems",
            Check::Computable(|o: &OrderRequest| {
                o.items().iter().any(|item| item.unit_price_money().is_none())
                    || o.total_amount().is_some()
            }),
        ),
        Rule::new(
            "customerId",
            Check::Required(|o: &OrderRequest| o.customer_id.as_deref()),
        ),
    ]
}

/// Rules applied to every line item.
pub fn line_item_rules() -> Vec<Rule<LineItem>> {
    vec![
        Rule::new(
            "productId",
            Check::Required(|i: &LineItem| i.product_id.as_deref()),
        ),
        Rule::new(
            "productName",
            Check::Required(|i: &LineItem| i.product_name.as_deref()),
        ),
        Rule::new(
            "quantity",
            Check::MinInt {
                get: |i: &LineItem| i64::from(i.quantity),
                min: 1,
                label: "1",
            },
        ),
        Rule::new(
            "unitPrice",
            Check::MinDecimal {
                get: |i: &LineItem| i.unit_price,
                min: 0.01,
                label: "0.01",
            },
        ),
        Rule::new("unitPrice", Check::Cents(|i: &LineItem| i.unit_price)),
    ]
}

// =============================================================================
// Violation Sink
// =============================================================================

/// Receives the violations found for a rejected order.
///
/// Best effort: whatever a sink does, including panicking, has no effect
/// on the validation outcome.
pub trait ViolationSink: Send + Sync {
    fn report(&self, order_id: Option<&str>, violations: &[Violation]);
}

/// Writes violations to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ViolationSink for TracingSink {
    fn report(&self, order_id: Option<&str>, violations: &[Violation]) {
        warn!(
            order_id = order_id.unwrap_or("<missing>"),
            violation_count = violations.len(),
            "Order failed validation"
        );
        for violation in violations {
            warn!(field = %violation.path, message = %violation.error, "Constraint violation");
        }
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Validator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Regex an email address must match.
    pub email_pattern: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            email_pattern: DEFAULT_EMAIL_PATTERN.to_string(),
        }
    }
}

/// Compiled rule tables.
struct RuleEngine {
    email: Regex,
    order_rules: Vec<Rule<OrderRequest>>,
    line_item_rules: Vec<Rule<LineItem>>,
}

impl RuleEngine {
    fn compile(config: &ValidationConfig) -> Result<Self, EngineFault> {
        let email = Regex::new(&config.email_pattern)
            .map_err(|e| EngineFault::InvalidEmailPattern(e.to_string()))?;

        Ok(RuleEngine {
            email,
            order_rules: order_rules(),
            line_item_rules: line_item_rules(),
        })
    }

    fn evaluate(&self, order: &OrderRequest) -> Vec<Violation> {
        let mut violations: Vec<Violation> = self
            .order_rules
            .iter()
            .filter_map(|rule| {
                rule.evaluate(order, &self.email)
                    .map(|error| Violation::new(rule.field, error))
            })
            .collect();

        for (index, item) in order.items().iter().enumerate() {
            for rule in &self.line_item_rules {
                if let Some(error) = rule.evaluate(item, &self.email) {
                    violations.push(Violation::new(
                        format!("lineItems[{index}].{}", rule.field),
                        error,
                    ));
                }
            }
        }

        violations
    }
}

/// Checks orders against the rule tables.
///
/// Stateless between calls and safe to share across threads.
pub struct Validator {
    engine: Result<RuleEngine, EngineFault>,
    sink: Arc<dyn ViolationSink>,
}

impl Validator {
    /// Builds a validator that reports violations through [`TracingSink`].
    pub fn new(config: &ValidationConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Builds a validator with a custom violation sink.
    ///
    /// A configuration that does not compile still yields a `Validator`, one
    /// that rejects every order.
    pub fn with_sink(config: &ValidationConfig, sink: Arc<dyn ViolationSink>) -> Self {
        let engine = RuleEngine::compile(config);
        if let Err(fault) = &engine {
            error!(%fault, "Validator misconfigured; every order will be rejected");
        }
        Validator { engine, sink }
    }

    /// The construction fault, if any.
    pub fn fault(&self) -> Option<&EngineFault> {
        self.engine.as_ref().err()
    }

    /// Runs every rule and returns the violations found.
    ///
    /// `Err` means the engine could not run, not that the order is bad.
    pub fn check(&self, order: &OrderRequest) -> Result<Vec<Violation>, EngineFault> {
        let engine = self.engine.as_ref().map_err(Clone::clone)?;

        panic::catch_unwind(AssertUnwindSafe(|| engine.evaluate(order)))
            .map_err(|payload| EngineFault::Panicked(panic_message(payload.as_ref())))
    }

    /// `true` only if every constraint holds; any engine fault is `false`.
    pub fn is_valid(&self, order: &OrderRequest) -> bool {
        match self.check(order) {
            Ok(violations) if violations.is_empty() => true,
            Ok(violations) => {
                self.report(order, &violations);
                false
            }
            Err(fault) => {
                error!(
                    order_id = order.order_id.as_deref().unwrap_or("<missing>"),
                    %fault,
                    "Validation engine fault; rejecting order"
                );
                false
            }
        }
    }

    fn report(&self, order: &OrderRequest, violations: &[Violation]) {
        let order_id = order.order_id.as_deref();
        let reported =
            panic::catch_unwind(AssertUnwindSafe(|| self.sink.report(order_id, violations)));
        if reported.is_err() {
            warn!("Violation sink panicked; ignoring");
        }
    }

    #[cfg(test)]
    fn from_rules(
        order_rules: Vec<Rule<OrderRequest>>,
        line_item_rules: Vec<Rule<LineItem>>,
        sink: Arc<dyn ViolationSink>,
    ) -> Self {
        let email = Regex::new(DEFAULT_EMAIL_PATTERN).expect("default pattern compiles");
        Validator {
            engine: Ok(RuleEngine {
                email,
                order_rules,
                line_item_rules,
            }),
            sink,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Validator::new(&ValidationConfig::default())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn valid_order() -> OrderRequest {
        OrderRequest {
            customer_name: Some("Grace Hopper".to_string()),
            customer_email: Some("grace@navy.example.com".to_string()),
            customer_phone: Some("+1-555-0100".to_string()),
            shipping_address: Some("1 Harbor Way".to_string()),
            billing_address: None,
            payment_method: Some("card".to_string()),
            order_date: Some("2024-05-01".to_string()),
            order_status: Some("NEW".to_string()),
            order_id: Some("ORD-100".to_string()),
            line_items: Some(vec![LineItem::new("P1", "Compiler", 2, 9.99)]),
            special_instructions: None,
            customer_id: Some("CUST-7".to_string()),
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        reports: Mutex<Vec<Vec<Violation>>>,
    }

    impl ViolationSink for RecordingSink {
        fn report(&self, _order_id: Option<&str>, violations: &[Violation]) {
            self.reports.lock().unwrap().push(violations.to_vec());
        }
    }

    struct PanickingSink;

    impl ViolationSink for PanickingSink {
        fn report(&self, _order_id: Option<&str>, _violations: &[Violation]) {
            panic!("sink unavailable");
        }
    }

    fn paths(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn test_valid_order_passes() {
        let validator = Validator::default();
        assert!(validator.fault().is_none());
        assert_eq!(validator.check(&valid_order()).unwrap(), vec![]);
        assert!(validator.is_valid(&valid_order()));
    }

    #[test]
    fn test_optional_fields_may_be_missing() {
        let mut order = valid_order();
        order.billing_address = None;
        order.special_instructions = None;
        assert!(Validator::default().is_valid(&order));
    }

    #[test]
    fn test_each_required_field_is_enforced() {
        let validator = Validator::default();
        let clears: [(&str, fn(&mut OrderRequest)); 9] = [
            ("customerName", |o| o.customer_name = None),
            ("customerEmail", |o| o.customer_email = None),
            ("customerPhone", |o| o.customer_phone = Some(String::new())),
            ("shippingAddress", |o| o.shipping_address = Some(String::new())),
            ("paymentMethod", |o| o.payment_method = None),
            ("orderDate", |o| o.order_date = None),
            ("orderStatus", |o| o.order_status = None),
            ("orderId", |o| o.order_id = Some(String::new())),
            ("customerId", |o| o.customer_id = None),
        ];

        for (field, clear) in clears {
            let mut order = valid_order();
            clear(&mut order);
            let violations = validator.check(&order).unwrap();
            assert_eq!(
                violations,
                vec![Violation::new(field, ValidationError::Empty)],
                "clearing {field}"
            );
            assert!(!validator.is_valid(&order));
        }
    }

    #[test]
    fn test_email_format() {
        let validator = Validator::default();
        let accepted = [
            "a@b",
            "first.last@example.com",
            "o'brien+tag@mail.example.co.uk",
            "user@[192.168.0.1]",
            "UPPER@EXAMPLE.COM",
        ];
        let rejected = [
            "not-an-email",
            "@example.com",
            "user@",
            "user@@example.com",
            "user@-example.com",
            "user@example..com",
            ".user@example.com",
            "user name@example.com",
        ];

        for email in accepted {
            let mut order = valid_order();
            order.customer_email = Some(email.to_string());
            assert!(validator.is_valid(&order), "{email} should be accepted");
        }
        for email in rejected {
            let mut order = valid_order();
            order.customer_email = Some(email.to_string());
            assert_eq!(
                validator.check(&order).unwrap(),
                vec![Violation::new(
                    "customerEmail",
                    ValidationError::InvalidFormat {
                        expected: "email address"
                    }
                )],
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_email_length_limits() {
        let validator = Validator::default();
        let mut order = valid_order();

        order.customer_email = Some(format!("{}@example.com", "a".repeat(64)));
        assert!(validator.is_valid(&order));

        order.customer_email = Some(format!("{}@example.com", "a".repeat(65)));
        assert!(!validator.is_valid(&order));
    }

    #[test]
    fn test_missing_email_reports_empty_only() {
        let mut order = valid_order();
        order.customer_email = Some(String::new());
        let violations = Validator::default().check(&order).unwrap();
        assert_eq!(
            violations,
            vec![Violation::new("customerEmail", ValidationError::Empty)]
        );
    }

    #[test]
    fn test_whitespace_only_values_count_as_present() {
        let mut order = valid_order();
        order.customer_name = Some(" ".to_string());
        order.customer_phone = Some("\t".to_string());
        order.line_items = Some(vec![LineItem::new(" ", "Compiler", 1, 9.99)]);

        let validator = Validator::default();
        assert_eq!(validator.check(&order).unwrap(), vec![]);
        assert!(validator.is_valid(&order));

        // An address of spaces is present but not an email address
        order.customer_email = Some("   ".to_string());
        assert_eq!(
            paths(&validator.check(&order).unwrap()),
            vec!["customerEmail"]
        );
    }

    #[test]
    fn test_line_items_required() {
        let validator = Validator::default();

        let mut order = valid_order();
        order.line_items = Some(vec![]);
        assert_eq!(
            validator.check(&order).unwrap(),
            vec![Violation::new("lineItems", ValidationError::Empty)]
        );

        order.line_items = None;
        assert!(!validator.is_valid(&order));
    }

    #[test]
    fn test_line_item_bounds() {
        let validator = Validator::default();
        let cases = [
            (0, 9.99, "lineItems[0].quantity"),
            (-3, 9.99, "lineItems[0].quantity"),
            (1, 0.0, "lineItems[0].unitPrice"),
            (1, 0.009, "lineItems[0].unitPrice"),
            (1, -1.0, "lineItems[0].unitPrice"),
        ];

        for (quantity, unit_price, path) in cases {
            let mut order = valid_order();
            order.line_items = Some(vec![LineItem::new("P1", "Thing", quantity, unit_price)]);
            let violations = validator.check(&order).unwrap();
            assert_eq!(paths(&violations), vec![path], "{quantity} × {unit_price}");
        }

        let mut order = valid_order();
        order.line_items = Some(vec![LineItem::new("P1", "Thing", 1, 0.01)]);
        assert!(validator.is_valid(&order));
    }

    #[test]
    fn test_every_line_item_is_checked() {
        let mut order = valid_order();
        order.line_items = Some(vec![
            LineItem::new("P1", "Good", 1, 1.00),
            LineItem {
                product_id: None,
                product_name: Some("Nameless".to_string()),
                quantity: 1,
                unit_price: 1.00,
            },
            LineItem::new("P3", "", 1, 1.00),
        ]);

        let violations = Validator::default().check(&order).unwrap();
        assert_eq!(
            paths(&violations),
            vec!["lineItems[1].productId", "lineItems[2].productName"]
        );
    }

    #[test]
    fn test_non_finite_and_huge_prices() {
        let validator = Validator::default();

        let mut order = valid_order();
        order.line_items = Some(vec![LineItem::new("P1", "Thing", 1, f64::NAN)]);
        assert_eq!(
            paths(&validator.check(&order).unwrap()),
            vec!["lineItems[0].unitPrice", "lineItems[0].unitPrice"]
        );

        order.line_items = Some(vec![LineItem::new("P1", "Thing", 1, 1e300)]);
        assert_eq!(
            validator.check(&order).unwrap(),
            vec![Violation::new(
                "lineItems[0].unitPrice",
                ValidationError::NotRepresentable
            )]
        );
    }

    #[test]
    fn test_total_overflow_is_a_violation() {
        let mut order = valid_order();
        order.line_items = Some(vec![
            LineItem::new("P1", "Yacht", i32::MAX, 9.0e15),
            LineItem::new("P2", "Yacht", i32::MAX, 9.0e15),
        ]);
        assert_eq!(
            Validator::default().check(&order).unwrap(),
            vec![Violation::new("lineItems", ValidationError::Overflow)]
        );
    }

    #[test]
    fn test_empty_order_collects_every_violation() {
        let violations = Validator::default()
            .check(&OrderRequest::default())
            .unwrap();
        assert_eq!(
            paths(&violations),
            vec![
                "customerName",
                "customerEmail",
                "customerPhone",
                "shippingAddress",
                "paymentMethod",
                "orderDate",
                "orderStatus",
                "orderId",
                "lineItems",
                "customerId",
            ]
        );
    }

    #[test]
    fn test_violations_go_to_sink_only_when_invalid() {
        let sink = Arc::new(RecordingSink::default());
        let validator = Validator::with_sink(&ValidationConfig::default(), sink.clone());

        assert!(validator.is_valid(&valid_order()));
        assert!(sink.reports.lock().unwrap().is_empty());

        let mut order = valid_order();
        order.customer_email = Some("not-an-email".to_string());
        assert!(!validator.is_valid(&order));

        let reports = sink.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(paths(&reports[0]), vec!["customerEmail"]);
    }

    #[test]
    fn test_panicking_sink_does_not_change_outcome() {
        let validator =
            Validator::with_sink(&ValidationConfig::default(), Arc::new(PanickingSink));

        let mut order = valid_order();
        order.order_id = None;
        assert!(!validator.is_valid(&order));
        assert!(validator.is_valid(&valid_order()));
    }

    #[test]
    fn test_bad_email_pattern_fails_closed() {
        let config = ValidationConfig {
            email_pattern: "(unclosed".to_string(),
        };
        let validator = Validator::new(&config);

        assert!(matches!(
            validator.fault(),
            Some(EngineFault::InvalidEmailPattern(_))
        ));
        assert!(matches!(
            validator.check(&valid_order()),
            Err(EngineFault::InvalidEmailPattern(_))
        ));
        assert!(!validator.is_valid(&valid_order()));
    }

    #[test]
    fn test_panicking_rule_fails_closed() {
        let exploding: Vec<Rule<OrderRequest>> = vec![Rule::new(
            "customerName",
            Check::Required(|_: &OrderRequest| panic!("rule exploded")),
        )];
        let validator =
            Validator::from_rules(exploding, line_item_rules(), Arc::new(TracingSink));

        assert_eq!(
            validator.check(&valid_order()),
            Err(EngineFault::Panicked("rule exploded".to_string()))
        );
        assert!(!validator.is_valid(&valid_order()));
    }

    #[test]
    fn test_is_valid_is_idempotent() {
        let validator = Validator::default();
        let order = valid_order();
        let first = validator.is_valid(&order);
        let second = validator.is_valid(&order);
        assert_eq!(first, second);

        let mut bad = valid_order();
        bad.line_items = Some(vec![]);
        assert_eq!(validator.check(&bad), validator.check(&bad));
    }
}

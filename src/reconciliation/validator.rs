//! Receipt validation.
//!
//! Checks the accounting identities and sanity bounds of a
//! [`ReceiptRecord`] and reports every violation in order.

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::models::{Money, ReceiptRecord};

/// Thresholds the validator checks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// Maximum gap treated as equal for the accounting identities.
    pub tolerance: Money,
    /// Totals above this amount are flagged.
    pub max_total: Money,
}

impl ValidationRules {
    /// Builds rules from the pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            tolerance: config.tolerances.detection,
            max_total: config.sanity.max_total,
        }
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// The result of validating a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// True when no violation was found.
    pub is_valid: bool,
    /// Human-readable violations, in check order.
    pub violations: Vec<String>,
}

/// Validates a receipt against the accounting identities and sanity bounds.
///
/// Checks run in a fixed order and all of them run:
/// 1. line items sum to the subtotal (an empty item list sums to zero),
/// 2. subtotal + tax + tip equals the total,
/// 3. subtotal, tax and total are not negative (tip may be),
/// 4. the total is below the sanity bound.
///
/// # Example
///
/// ```
/// use receipt_engine::models::{LineItem, Money, ReceiptRecord};
/// use receipt_engine::reconciliation::{validate_record, ValidationRules};
/// use chrono::NaiveDate;
///
/// let money = |s: &str| s.parse::<Money>().unwrap();
/// let receipt = ReceiptRecord {
///     restaurant_name: "Diner".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
///     items: vec![LineItem::new("Pancakes", 1, money("60.50"), money("60.50"))],
///     subtotal: money("60.50"),
///     tax: Money::ZERO,
///     tip: Money::ZERO,
///     total: money("64.00"),
///     confidence_score: 0.8,
///     provenance_text: String::new(),
/// };
/// let outcome = validate_record(&receipt, &ValidationRules::default());
/// assert!(!outcome.is_valid);
/// assert_eq!(
///     outcome.violations,
///     vec!["Calculated total ($60.50) doesn't match receipt total ($64.00)".to_string()]
/// );
/// ```
pub fn validate_record(record: &ReceiptRecord, rules: &ValidationRules) -> ValidationOutcome {
    let mut violations = Vec::new();

    let items_total = record.items_total();
    if !items_total.approx_eq(record.subtotal, rules.tolerance) {
        violations.push(format!(
            "Items total (${}) doesn't match subtotal (${})",
            items_total, record.subtotal
        ));
    }

    let computed_total = record.computed_total();
    if !computed_total.approx_eq(record.total, rules.tolerance) {
        violations.push(format!(
            "Calculated total (${}) doesn't match receipt total (${})",
            computed_total, record.total
        ));
    }

    if record.subtotal.is_negative() {
        violations.push("Subtotal cannot be negative".to_string());
    }
    if record.tax.is_negative() {
        violations.push("Tax cannot be negative".to_string());
    }
    if record.total.is_negative() {
        violations.push("Total cannot be negative".to_string());
    }

    if record.total > rules.max_total {
        violations.push(format!(
            "Total amount seems unreasonably high (${})",
            record.total
        ));
    }

    ValidationOutcome {
        is_valid: violations.is_empty(),
        violations,
    }
}

//! Receipt record model.
//!
//! A [`ReceiptRecord`] is built once from model output, optionally repaired
//! once by the corrector, and then handed to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{LineItem, Money};

/// A structured receipt with its accounting fields.
///
/// The record does not enforce the accounting identities on construction;
/// [`validate_record`](crate::reconciliation::validate_record) checks them and
/// [`correct_record`](crate::reconciliation::correct_record) restores them.
///
/// # Example
///
/// ```
/// use receipt_engine::models::{LineItem, Money, ReceiptRecord};
/// use chrono::NaiveDate;
///
/// let money = |s: &str| s.parse::<Money>().unwrap();
/// let receipt = ReceiptRecord {
///     restaurant_name: "Trattoria".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
///     items: vec![LineItem::new("Pasta", 1, money("18.00"), money("18.00"))],
///     subtotal: money("18.00"),
///     tax: money("1.62"),
///     tip: money("3.60"),
///     total: money("23.22"),
///     confidence_score: 0.9,
///     provenance_text: String::new(),
/// };
/// assert_eq!(receipt.discrepancy(), Money::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// The restaurant name as printed.
    pub restaurant_name: String,
    /// The date printed on the receipt.
    pub date: NaiveDate,
    /// Line items in printed order.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Printed (or reconciled) subtotal.
    pub subtotal: Money,
    /// Printed (or reconciled) tax.
    pub tax: Money,
    /// Printed (or reconciled) tip. May be negative when it represents a discount.
    pub tip: Money,
    /// Printed total. Treated as authoritative and never corrected.
    pub total: Money,
    /// Extraction confidence reported by the model, in `[0, 1]`.
    pub confidence_score: f64,
    /// The raw model response the record was built from.
    #[serde(rename = "raw_text", default)]
    pub provenance_text: String,
}

impl ReceiptRecord {
    /// Returns the sum of all line item totals.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(|item| item.total_price).sum()
    }

    /// Returns `subtotal + tax + tip`.
    pub fn computed_total(&self) -> Money {
        self.subtotal + self.tax + self.tip
    }

    /// Returns `total - (subtotal + tax + tip)`.
    pub fn discrepancy(&self) -> Money {
        self.total - self.computed_total()
    }

    /// Returns the record as a plain JSON structure for persistence or display.
    ///
    /// Money renders as numbers at two decimal places and the date as an
    /// ISO-8601 string. The live record keeps full precision.
    pub fn to_serializable(&self) -> serde_json::Value {
        let items: Vec<serde_json::Value> = self
            .items
            .iter()
            .map(|item| {
                serde_json::json!({
                    "name": item.name,
                    "quantity": item.quantity,
                    "unit_price": item.unit_price,
                    "total_price": item.total_price,
                })
            })
            .collect();

        serde_json::json!({
            "restaurant_name": self.restaurant_name,
            "date": self.date.format("%Y-%m-%d").to_string(),
            "items": items,
            "subtotal": self.subtotal,
            "tax": self.tax,
            "tip": self.tip,
            "total": self.total,
            "confidence_score": self.confidence_score,
            "raw_text": self.provenance_text,
        })
    }
}

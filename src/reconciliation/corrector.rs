//! Receipt correction.
//!
//! Repairs a receipt whose numbers do not add up. The printed total is
//! authoritative and never changes; the corrector rewrites subtotal, tax and
//! tip so that `subtotal + tax + tip == total` and the subtotal equals the sum
//! of the line items.
//!
//! Resolution order, against `discrepancy = total - (subtotal + tax + tip)`
//! after the subtotal has been reconciled with the items:
//!
//! | Case                                  | Resolution                               |
//! |---------------------------------------|------------------------------------------|
//! | `abs(discrepancy) <= tolerance`       | nothing further                          |
//! | tax = 0, tip = 0, discrepancy > 0     | discrepancy becomes the tip              |
//! | tax != 0 or tip != 0                  | split across tax and tip by their shares |
//! | tax = 0, tip = 0, discrepancy < 0     | discrepancy becomes a negative tip       |

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{CorrectionReason, CorrectionReport, Money, ReceiptRecord};

/// Tolerance the corrector reconciles to unless configured otherwise.
pub const DEFAULT_RECONCILIATION_TOLERANCE: Money =
    Money::new(Decimal::from_parts(1, 0, 0, false, 2));

/// Reconciles a receipt in place and reports what changed.
///
/// Only `subtotal`, `tax` and `tip` are written. When the line items do not
/// sum to the subtotal (beyond `tolerance`) the subtotal is replaced by the
/// item sum first. A receipt with no items has an item sum of zero.
///
/// `applied` is false whenever the totals match after that step, even if the
/// subtotal was replaced; `subtotal_recomputed` records the replacement.
///
/// After resolution the totals are compared again. A remaining gap larger
/// than `tolerance` is recorded as `residual_error` and logged; it is never
/// an error.
///
/// # Example
///
/// ```
/// use receipt_engine::models::{CorrectionReason, LineItem, Money, ReceiptRecord};
/// use receipt_engine::reconciliation::{correct_record, DEFAULT_RECONCILIATION_TOLERANCE};
/// use chrono::NaiveDate;
///
/// let money = |s: &str| s.parse::<Money>().unwrap();
/// let mut receipt = ReceiptRecord {
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
///
/// let report = correct_record(&mut receipt, DEFAULT_RECONCILIATION_TOLERANCE);
/// assert!(report.applied);
/// assert_eq!(report.reason, Some(CorrectionReason::DiscrepancyAsTip));
/// assert_eq!(receipt.tip, money("3.50"));
/// ```
pub fn correct_record(record: &mut ReceiptRecord, tolerance: Money) -> CorrectionReport {
    let original_subtotal = record.subtotal;
    let original_tax = record.tax;
    let original_tip = record.tip;

    let subtotal_recomputed = reconcile_subtotal(record, tolerance);
    let discrepancy = record.discrepancy();

    let reason = if discrepancy.abs() <= tolerance {
        CorrectionReason::TotalsAlreadyMatch
    } else if record.tax.is_zero() && record.tip.is_zero() {
        record.tip = discrepancy;
        if discrepancy.is_positive() {
            CorrectionReason::DiscrepancyAsTip
        } else {
            CorrectionReason::DiscrepancyAsDiscount
        }
    } else {
        let (tax, tip) = distribute(record.tax, record.tip, discrepancy);
        record.tax = tax;
        record.tip = tip;
        CorrectionReason::ProportionalAdjustment
    };

    debug!(
        reason = %reason,
        %discrepancy,
        subtotal = %record.subtotal,
        tax = %record.tax,
        tip = %record.tip,
        total = %record.total,
        "Correction branch resolved"
    );

    let residual = record.discrepancy();
    let residual_error = (residual.abs() > tolerance).then_some(residual);
    if let Some(residual) = residual_error {
        warn!(
            %residual,
            %tolerance,
            total = %record.total,
            "Receipt still inconsistent after correction"
        );
    }

    CorrectionReport {
        applied: reason != CorrectionReason::TotalsAlreadyMatch,
        reason: Some(reason),
        subtotal_recomputed,
        original_subtotal,
        original_tax,
        original_tip,
        corrected_subtotal: record.subtotal,
        corrected_tax: record.tax,
        corrected_tip: record.tip,
        discrepancy,
        residual_error,
        tolerance,
    }
}

/// Replaces the subtotal with the item sum when they disagree. Returns true if it did.
fn reconcile_subtotal(record: &mut ReceiptRecord, tolerance: Money) -> bool {
    let items_total = record.items_total();
    if items_total.approx_eq(record.subtotal, tolerance) {
        return false;
    }
    debug!(
        printed_subtotal = %record.subtotal,
        %items_total,
        "Replacing subtotal with line item sum"
    );
    record.subtotal = items_total;
    true
}

/// Splits `discrepancy` across tax and tip in proportion to their current amounts.
///
/// The tax share is rounded to the internal scale and the tip takes the exact
/// remainder, so `tax + tip` grows by exactly `discrepancy`. When tax and tip
/// cancel out (a negative extracted tax) the split is even.
fn distribute(tax: Money, tip: Money, discrepancy: Money) -> (Money, Money) {
    let pool = tax + tip;
    let tax_adjustment = if pool.is_zero() {
        discrepancy.scale_by(Decimal::new(5, 1))
    } else {
        discrepancy.prorate(tax, pool)
    };
    let tip_adjustment = discrepancy - tax_adjustment;
    clamp_negative(tax + tax_adjustment, tip + tip_adjustment)
}

/// Moves negative amounts between tax and tip without changing their sum.
///
/// Tax never ends negative. Tip only ends negative when tax and tip together
/// are negative, in which case the whole amount is a discount on the tip.
fn clamp_negative(mut tax: Money, mut tip: Money) -> (Money, Money) {
    if tax.is_negative() {
        tip += tax;
        tax = Money::ZERO;
    }
    if tip.is_negative() && !tax.is_zero() {
        if (tax + tip).is_negative() {
            tip += tax;
            tax = Money::ZERO;
        } else {
            tax += tip;
            tip = Money::ZERO;
        }
    }
    (tax, tip)
}

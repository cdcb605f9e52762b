//! Correction report models.
//!
//! A [`CorrectionReport`] is the audit record of a single corrector run. It is
//! informational only and never fed back into the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Money;

/// Why the corrector did (or did not) change a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionReason {
    /// Subtotal, tax and tip already summed to the total.
    TotalsAlreadyMatch,
    /// No tax or tip was printed; the positive gap became the tip.
    DiscrepancyAsTip,
    /// The gap was split across tax and tip in proportion to their amounts.
    ProportionalAdjustment,
    /// No tax or tip was printed; the negative gap became a negative tip.
    DiscrepancyAsDiscount,
}

impl CorrectionReason {
    /// Human-readable description of the reason.
    pub fn description(self) -> &'static str {
        match self {
            CorrectionReason::TotalsAlreadyMatch => "Totals already match",
            CorrectionReason::DiscrepancyAsTip => "Discrepancy treated as tip/service charge",
            CorrectionReason::ProportionalAdjustment => {
                "Discrepancy distributed proportionally between tax and tip"
            }
            CorrectionReason::DiscrepancyAsDiscount => "Negative discrepancy treated as discount",
        }
    }
}

impl fmt::Display for CorrectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The outcome of one corrector run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionReport {
    /// Whether a discrepancy branch changed tax or tip.
    ///
    /// False when the totals matched, including after a subtotal replacement.
    pub applied: bool,
    /// The branch the corrector took.
    pub reason: Option<CorrectionReason>,
    /// Whether the subtotal was replaced by the line item sum.
    pub subtotal_recomputed: bool,
    /// Subtotal before correction.
    pub original_subtotal: Money,
    /// Tax before correction.
    pub original_tax: Money,
    /// Tip before correction.
    pub original_tip: Money,
    /// Subtotal after correction.
    pub corrected_subtotal: Money,
    /// Tax after correction.
    pub corrected_tax: Money,
    /// Tip after correction.
    pub corrected_tip: Money,
    /// `total - (subtotal + tax + tip)` after subtotal reconciliation, before branch resolution.
    pub discrepancy: Money,
    /// The gap that remained after correction, if it exceeded the tolerance.
    pub residual_error: Option<Money>,
    /// The tolerance the corrector reconciled to.
    pub tolerance: Money,
}

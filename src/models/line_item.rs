//! Line item model.

use serde::{Deserialize, Serialize};

use super::Money;

/// One priced entry on a receipt.
///
/// Quantity and unit price are kept as extracted. Nothing ties
/// `quantity * unit_price` to `total_price`; the receipt-level subtotal check
/// is what the reconciler relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The item name as printed.
    pub name: String,
    /// The number of units ordered.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// The printed price of a single unit.
    #[serde(default)]
    pub unit_price: Money,
    /// The printed line total.
    #[serde(default)]
    pub total_price: Money,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    /// Creates a line item.
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: Money, total_price: Money) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
            total_price,
        }
    }
}

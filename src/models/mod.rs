//! Core data models for the receipt engine.
//!
//! This module contains the domain models shared by extraction,
//! reconciliation and bill splitting.

mod correction;
mod line_item;
mod money;
mod receipt;

pub use correction::{CorrectionReason, CorrectionReport};
pub use line_item::LineItem;
pub use money::Money;
pub use receipt::ReceiptRecord;

//! Bill splitting.
//!
//! Consumes a reconciled [`ReceiptRecord`](crate::models::ReceiptRecord) and
//! divides it across participants' fractional claims on line items.

mod proration;

pub use proration::{BillSplit, Claim, ParticipantShare, split_bill};

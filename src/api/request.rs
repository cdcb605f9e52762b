//! Request types for the receipt API.
//!
//! `POST /receipts` takes raw image bytes and has no request type; the JSON
//! endpoints are defined here.

use serde::{Deserialize, Serialize};

use crate::models::ReceiptRecord;
use crate::split::Claim;

/// Request body for `POST /receipts/text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextReceiptRequest {
    /// Text returned by a vision model.
    pub response_text: String,
}

/// Request body for `POST /receipts/split`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRequest {
    /// The reconciled receipt to split.
    pub receipt: ReceiptRecord,
    /// Participants' claims on line items.
    #[serde(default)]
    pub claims: Vec<Claim>,
}

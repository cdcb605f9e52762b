//! Vision model seam.
//!
//! The engine does not talk to any inference service itself. Callers supply a
//! [`VisionModel`] that turns a prepared receipt image into model text; the
//! pipeline treats that text as untrusted input.

use super::preprocess::PreparedImage;

/// Boxed error returned by inference collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Instructions a vision model should be given so that its answer parses.
pub const RECEIPT_EXTRACTION_PROMPT: &str = r#"You are a receipt data extraction assistant.
Read the restaurant receipt in the image and return ONLY a JSON object with this schema:
{
  "restaurant_name": "string",
  "date": "YYYY-MM-DD",
  "items": [
    {
      "name": "string",
      "quantity": integer,
      "unit_price": number,
      "total_price": number
    }
  ],
  "subtotal": number,
  "tax": number,
  "tip": number,
  "total": number,
  "confidence_score": number between 0 and 1
}

Notes:
- Use the amounts exactly as printed, without currency symbols.
- Use 0 for tax or tip when the receipt does not show them.
- Return ONLY the JSON object, no markdown fences, no commentary."#;

/// Turns a receipt image into model text.
///
/// Implementations own retries, timeouts and transport; any error they return
/// aborts the pipeline invocation with
/// [`EngineError::InferenceError`](crate::error::EngineError::InferenceError).
///
/// Closures with the matching signature implement the trait:
///
/// ```
/// use receipt_engine::pipeline::{BoxError, PreparedImage, VisionModel};
///
/// let model = |_image: &PreparedImage| -> Result<String, BoxError> {
///     Ok(r#"{"total": 12.00}"#.to_string())
/// };
/// let image = PreparedImage { bytes: vec![], media_type: "image/jpeg", width: 1, height: 1 };
/// assert!(model.extract_receipt_text(&image).unwrap().contains("total"));
/// ```
pub trait VisionModel: Send + Sync {
    /// Returns the model's text response for the image.
    fn extract_receipt_text(&self, image: &PreparedImage) -> Result<String, BoxError>;
}

impl<F> VisionModel for F
where
    F: Fn(&PreparedImage) -> Result<String, BoxError> + Send + Sync,
{
    fn extract_receipt_text(&self, image: &PreparedImage) -> Result<String, BoxError> {
        self(image)
    }
}

//! Receipt processing pipeline.
//!
//! [`ReceiptPipeline`] sequences image preparation, vision inference,
//! response parsing, record building, validation and correction. The vision
//! model is an injected [`VisionModel`].

mod orchestrator;
mod preprocess;
mod vision;

pub use orchestrator::{ProcessedReceipt, ReceiptPipeline};
pub use preprocess::{PreparedImage, SUPPORTED_FORMATS, preprocess_image};
pub use vision::{BoxError, RECEIPT_EXTRACTION_PROMPT, VisionModel};

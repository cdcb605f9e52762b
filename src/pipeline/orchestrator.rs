//! Pipeline orchestration.
//!
//! Runs one receipt through preprocessing, inference, parsing, building,
//! validation and correction.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{EngineError, EngineResult};
use crate::extraction::{BuiltRecord, RecordBuilder, parse_model_response};
use crate::models::{CorrectionReport, ReceiptRecord};
use crate::reconciliation::{ValidationOutcome, ValidationRules, correct_record, validate_record};

use super::preprocess::preprocess_image;
use super::vision::VisionModel;

/// Everything the pipeline produced for one receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedReceipt {
    /// The (possibly corrected) receipt.
    pub record: ReceiptRecord,
    /// What the corrector did, if it ran. It only runs on receipts that failed validation.
    pub correction: Option<CorrectionReport>,
    /// Validation of the returned record.
    pub validation: ValidationOutcome,
    /// Violations found before correction.
    pub initial_violations: Vec<String>,
    /// Items dropped and fields defaulted while building the record.
    pub extraction_warnings: Vec<String>,
}

/// The receipt pipeline.
///
/// Configuration and the vision model are fixed at construction. The pipeline
/// holds no mutable state, so one instance can serve concurrent invocations.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use receipt_engine::config::PipelineConfig;
/// use receipt_engine::pipeline::{BoxError, PreparedImage, ReceiptPipeline};
///
/// let model = |_image: &PreparedImage| -> Result<String, BoxError> { Err("offline".into()) };
/// let pipeline = ReceiptPipeline::new(PipelineConfig::default(), Arc::new(model));
///
/// let processed = pipeline
///     .process_response(r#"{"items": [{"name": "Soup", "total_price": 60.50}],
///                          "subtotal": 60.50, "tax": 0, "tip": 0, "total": 64.00}"#)
///     .unwrap();
/// assert_eq!(processed.record.tip.to_string(), "3.50");
/// assert!(processed.validation.is_valid);
/// ```
#[derive(Clone)]
pub struct ReceiptPipeline {
    config: Arc<PipelineConfig>,
    builder: RecordBuilder,
    model: Arc<dyn VisionModel>,
}

impl ReceiptPipeline {
    /// Creates a pipeline with the given configuration and vision model.
    pub fn new(config: PipelineConfig, model: Arc<dyn VisionModel>) -> Self {
        let builder = RecordBuilder::new(config.defaults.clone());
        Self {
            config: Arc::new(config),
            builder,
            model,
        }
    }

    /// Returns the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes an uploaded receipt image.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ImageLoadError`] if the image cannot be prepared
    /// - [`EngineError::InferenceError`] if the vision model fails
    /// - [`EngineError::ParseError`] if the model text holds no valid JSON object
    pub fn process(&self, image_bytes: &[u8]) -> EngineResult<ProcessedReceipt> {
        let image = preprocess_image(image_bytes, &self.config.image)?;

        let response_text = self.model.extract_receipt_text(&image).map_err(|e| {
            warn!(error = %e, "Vision model failed");
            EngineError::InferenceError {
                message: e.to_string(),
            }
        })?;

        self.process_response(&response_text)
    }

    /// Processes model text directly, skipping image preparation and inference.
    pub fn process_response(&self, response_text: &str) -> EngineResult<ProcessedReceipt> {
        self.process_response_at(response_text, Utc::now().date_naive())
    }

    /// Like [`process_response`](Self::process_response), with `today` used for missing dates.
    pub fn process_response_at(
        &self,
        response_text: &str,
        today: NaiveDate,
    ) -> EngineResult<ProcessedReceipt> {
        let payload = parse_model_response(response_text)?;
        let BuiltRecord {
            mut record,
            warnings,
        } = self.builder.build_with_today(&payload, response_text, today);

        let rules = ValidationRules::from_config(&self.config);
        let initial = validate_record(&record, &rules);

        let (correction, validation) = if initial.is_valid {
            (None, initial.clone())
        } else {
            let report = correct_record(&mut record, self.config.tolerances.reconciliation);
            (Some(report), validate_record(&record, &rules))
        };

        info!(
            restaurant = %record.restaurant_name,
            item_count = record.items.len(),
            total = %record.total,
            initially_valid = initial.is_valid,
            correction_applied = correction.as_ref().is_some_and(|r| r.applied),
            valid = validation.is_valid,
            "Processed receipt"
        );

        Ok(ProcessedReceipt {
            record,
            correction,
            validation,
            initial_violations: initial.violations,
            extraction_warnings: warnings,
        })
    }
}

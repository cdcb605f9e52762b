//! Configuration types for the receipt pipeline.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the pipeline YAML file. Every section falls back to
//! the documented defaults, so a partial file is valid.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::Money;

/// Tolerances used for the accounting identities.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// Maximum gap the validator treats as equal.
    pub detection: Money,
    /// Maximum gap the corrector leaves behind.
    pub reconciliation: Money,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            detection: Money::new(Decimal::new(10, 2)),
            reconciliation: Money::new(Decimal::new(1, 2)),
        }
    }
}

/// Soft sanity bounds checked by the validator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    /// Totals above this amount are flagged as implausible.
    pub max_total: Money,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            max_total: Money::from(10_000),
        }
    }
}

/// Limits applied to uploaded receipt images.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Largest accepted upload, in bytes.
    pub max_bytes: usize,
    /// Longest edge, in pixels, sent to the vision model.
    pub max_dimension: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            max_dimension: 2048,
        }
    }
}

/// Values substituted when the model omits or garbles a field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldDefaults {
    /// Restaurant name used when none was extracted.
    pub restaurant_name: String,
    /// Item name used when an entry has none.
    pub item_name: String,
    /// Confidence score used when none was extracted.
    pub confidence_score: f64,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            restaurant_name: "Unknown Restaurant".to_string(),
            item_name: "Unknown Item".to_string(),
            confidence_score: 0.5,
        }
    }
}

/// The complete pipeline configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Accounting tolerances.
    pub tolerances: ToleranceConfig,
    /// Sanity bounds.
    pub sanity: SanityConfig,
    /// Image limits.
    pub image: ImageConfig,
    /// Field defaults for the record builder.
    pub defaults: FieldDefaults,
}

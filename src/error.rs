//! Error types for the receipt engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every fatal condition the pipeline can surface. Field-level problems
//! in extracted data are not errors: they degrade to defaults and are logged.

use thiserror::Error;

/// The main error type for the receipt engine.
///
/// Only conditions that abort a pipeline invocation are represented here.
/// Accounting inconsistencies are reported through
/// [`CorrectionReport`](crate::models::CorrectionReport) instead.
///
/// # Example
///
/// ```
/// use receipt_engine::error::EngineError;
///
/// let error = EngineError::InferenceError {
///     message: "model endpoint unreachable".to_string(),
/// };
/// assert_eq!(error.to_string(), "Vision inference failed: model endpoint unreachable");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The uploaded receipt image could not be read or decoded.
    #[error("Failed to load receipt image: {message}")]
    ImageLoadError {
        /// A description of what was wrong with the image.
        message: String,
    },

    /// The external vision model failed to produce a response.
    #[error("Vision inference failed: {message}")]
    InferenceError {
        /// The message reported by the inference collaborator.
        message: String,
    },

    /// The model response did not contain a usable JSON object.
    #[error("Failed to parse model response: {message}")]
    ParseError {
        /// A description of the parse failure.
        message: String,
        /// The substring that failed to parse, when one was located.
        fragment: Option<String>,
    },

    /// A bill-split claim referenced data that does not exist or over-claimed an item.
    #[error("Invalid claim for '{participant}': {message}")]
    InvalidClaim {
        /// The participant whose claim was rejected.
        participant: String,
        /// A description of what made the claim invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

//! Application state for the receipt API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use crate::pipeline::ReceiptPipeline;

/// Shared application state.
///
/// Holds the receipt pipeline. The pipeline is immutable and internally
/// reference-counted, so cloning the state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pipeline: ReceiptPipeline,
}

impl AppState {
    /// Creates a new application state around the given pipeline.
    pub fn new(pipeline: ReceiptPipeline) -> Self {
        Self { pipeline }
    }

    /// Returns the receipt pipeline.
    pub fn pipeline(&self) -> &ReceiptPipeline {
        &self.pipeline
    }
}

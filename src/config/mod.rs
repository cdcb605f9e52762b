//! Configuration loading and management for the receipt pipeline.
//!
//! This module provides functionality to load tolerances, sanity bounds,
//! image limits and field defaults from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use receipt_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/pipeline.yaml").unwrap();
//! println!("Detection tolerance: {}", loader.config().tolerances.detection);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{FieldDefaults, ImageConfig, PipelineConfig, SanityConfig, ToleranceConfig};

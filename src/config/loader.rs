//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the pipeline
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::PipelineConfig;

/// Loads and provides access to pipeline configuration.
///
/// # File Structure
///
/// ```text
/// config/pipeline.yaml
/// tolerances:
///   detection: "0.10"
///   reconciliation: "0.01"
/// sanity:
///   max_total: "10000"
/// image:
///   max_bytes: 10485760
///   max_dimension: 2048
/// defaults:
///   restaurant_name: Unknown Restaurant
///   item_name: Unknown Item
///   confidence_score: 0.5
/// ```
///
/// # Example
///
/// ```no_run
/// use receipt_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/pipeline.yaml")?;
/// println!("Reconciling to {}", loader.config().tolerances.reconciliation);
/// # Ok::<(), receipt_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: PipelineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing or unreadable (`ConfigNotFound`)
    /// - The file contains invalid YAML or mistyped values (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config = Self::load_yaml::<PipelineConfig>(path.as_ref())?;
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> PipelineConfig {
        self.config
    }
}

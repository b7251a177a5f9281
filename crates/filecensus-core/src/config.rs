//! Scan configuration.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for a census scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CensusConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Worker budget (None = detected hardware parallelism, 0 = fully
    /// sequential execution in the caller's thread).
    #[builder(default)]
    #[serde(default)]
    pub workers: Option<usize>,

    /// Number of top categories to report.
    #[builder(default = "10")]
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_top() -> usize {
    10
}

impl CensusConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl CensusConfig {
    /// Create a new config builder.
    pub fn builder() -> CensusConfigBuilder {
        CensusConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            workers: None,
            top: 10,
        }
    }

    /// Resolve the worker budget in effect.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

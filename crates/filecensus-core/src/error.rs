//! Error types for scanning operations.
//!
//! Only configuration problems are errors; anything that goes wrong on
//! the filesystem, the root path included, is converted into a
//! `walk-error` or `classify-error` count instead.

use thiserror::Error;

use crate::config::CensusConfigBuilderError;

/// Fatal errors that abort before any scanning begins.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl From<CensusConfigBuilderError> for ScanError {
    fn from(err: CensusConfigBuilderError) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CensusConfig;

    #[test]
    fn test_builder_error_becomes_invalid_config() {
        let err: ScanError = CensusConfig::builder().build().unwrap_err().into();
        let ScanError::InvalidConfig { message } = err;
        assert!(message.contains("Root path"));
    }
}

//! Core types for filecensus.
//!
//! This crate provides the fundamental data structures used throughout
//! the filecensus ecosystem: classification labels, per-label tallies,
//! the census result container, and configuration.

mod census;
mod config;
mod error;
mod label;
mod tally;

pub use census::{Census, CensusStats};
pub use config::{CensusConfig, CensusConfigBuilder};
pub use error::ScanError;
pub use label::Label;
pub use tally::LabelTally;

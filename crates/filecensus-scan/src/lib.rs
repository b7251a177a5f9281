//! Bounded-parallelism recursive scanning engine for filecensus.
//!
//! This crate walks a directory tree with a budgeted pool of worker
//! threads and classifies every regular file by content. Key pieces:
//!
//! - **Worker budget** - an atomic counter of available workers; nodes
//!   that fail to acquire a slot run inline instead of waiting
//! - **Scan nodes** - one per directory, strictly owned by their parent,
//!   merged upward exactly once
//! - **Classifier adapter** - a trait seam over magic-byte detection,
//!   one handle per node, failures counted rather than propagated
//!
//! # Example
//!
//! ```rust,no_run
//! use filecensus_scan::{CensusConfig, Scanner};
//!
//! let config = CensusConfig::new("/path/to/scan");
//! let census = Scanner::new().scan(&config);
//!
//! for (rank, (label, count)) in census.top(10).iter().enumerate() {
//!     println!("{}) {}: {}", rank + 1, label, count);
//! }
//! ```

mod budget;
mod classify;
mod node;
mod scanner;

pub use budget::{BudgetSlot, WorkerBudget};
pub use classify::{
    Classify, ClassifierFactory, ClassifierInitError, ClassifyError, MagicClassifierFactory,
};
pub use node::ScanNode;
pub use scanner::Scanner;

// Re-export core types for convenience
pub use filecensus_core::{Census, CensusConfig, CensusStats, Label, LabelTally};

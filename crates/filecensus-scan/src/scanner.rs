//! The census scanner: drives the root node to completion.

use std::time::Instant;

use tracing::debug;

use filecensus_core::{Census, CensusConfig, CensusStats};

use crate::budget::WorkerBudget;
use crate::classify::{ClassifierFactory, MagicClassifierFactory};
use crate::node::ScanNode;

/// One-shot bounded-parallelism directory scanner.
///
/// Every scan gets its own worker budget sized from the config, so
/// multiple scanners (or repeated scans) in one process never contend
/// over shared state.
pub struct Scanner {
    factory: Box<dyn ClassifierFactory + Send + Sync>,
}

impl Scanner {
    /// Create a scanner with the default magic-byte classifier.
    pub fn new() -> Self {
        Self::with_factory(Box::new(MagicClassifierFactory))
    }

    /// Create a scanner with a custom classifier factory.
    pub fn with_factory(factory: Box<dyn ClassifierFactory + Send + Sync>) -> Self {
        Self { factory }
    }

    /// Scan the configured root and return the merged census.
    ///
    /// A scan always completes: filesystem failures, a missing or
    /// unreadable root included, are counted under `walk-error` /
    /// `classify-error` rather than propagated.
    pub fn scan(&self, config: &CensusConfig) -> Census {
        let start = Instant::now();

        // Best effort only; a root that cannot be resolved is walked
        // as given and counted by the root node.
        let root_path = config
            .root
            .canonicalize()
            .unwrap_or_else(|_| config.root.clone());

        let workers = config.effective_workers();
        let budget = WorkerBudget::new(workers);
        debug!(root = %root_path.display(), workers, "starting census");

        let root = ScanNode::scan(root_path.clone(), &budget, self.factory.as_ref());

        // Every acquired slot has been released by now.
        debug_assert_eq!(budget.available(), workers);

        let stats = CensusStats {
            entries_scanned: root.total_entries(),
            dirs_scanned: root.dir_count(),
            workers,
        };
        debug!(
            entries = stats.entries_scanned,
            dirs = stats.dirs_scanned,
            "census complete"
        );

        Census::new(root_path, root.into_tally(), stats, start.elapsed())
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filecensus_core::Label;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_is_counted_not_fatal() {
        let temp = TempDir::new().unwrap();
        let config = CensusConfig::new(temp.path().join("vanished"));

        let census = Scanner::new().scan(&config);

        assert!(census.tally.get(&Label::WalkError) >= 1);
        assert_eq!(census.stats.entries_scanned, 0);
    }

    #[test]
    fn test_file_root_is_counted_not_fatal() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain");
        fs::write(&file, "not a directory").unwrap();

        let census = Scanner::new().scan(&CensusConfig::new(&file));

        assert_eq!(census.tally.get(&Label::WalkError), 1);
        assert_eq!(census.stats.dirs_scanned, 1);
    }

    #[test]
    fn test_scan_reports_worker_budget() {
        let temp = TempDir::new().unwrap();
        let mut config = CensusConfig::new(temp.path());
        config.workers = Some(3);

        let census = Scanner::new().scan(&config);
        assert_eq!(census.stats.workers, 3);
    }
}

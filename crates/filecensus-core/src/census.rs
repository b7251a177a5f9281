//! Census result container and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::Serialize;

use crate::label::Label;
use crate::tally::LabelTally;

/// Summary statistics for a completed scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CensusStats {
    /// Directory entries observed across the whole tree.
    pub entries_scanned: u64,
    /// Directories walked, including the root.
    pub dirs_scanned: u64,
    /// Worker budget in effect for the scan.
    pub workers: usize,
}

/// Complete census of a directory tree.
#[derive(Debug, Clone, Serialize)]
pub struct Census {
    /// Root path that was scanned.
    pub root_path: PathBuf,

    /// Fully merged per-label counts for the whole tree.
    pub tally: LabelTally,

    /// Summary statistics.
    pub stats: CensusStats,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,
}

impl Census {
    /// Create a new census.
    pub fn new(
        root_path: PathBuf,
        tally: LabelTally,
        stats: CensusStats,
        scan_duration: Duration,
    ) -> Self {
        Self {
            root_path,
            tally,
            stats,
            scanned_at: SystemTime::now(),
            scan_duration,
        }
    }

    /// The `min(n, distinct labels)` most frequent labels, count descending.
    pub fn top(&self, n: usize) -> Vec<(Label, u64)> {
        let mut ranked = self.tally.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Total number of entries observed.
    pub fn total_entries(&self) -> u64 {
        self.stats.entries_scanned
    }

    /// Check if any walk or classify errors were counted.
    pub fn has_errors(&self) -> bool {
        self.tally.get(&Label::WalkError) > 0 || self.tally.get(&Label::ClassifyError) > 0
    }
}

//! Scan nodes: one per directory, walked inline or on a budgeted worker.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{Scope, ScopedJoinHandle};

use tracing::{debug, trace};

use filecensus_core::{Label, LabelTally};

use crate::budget::{BudgetSlot, WorkerBudget};
use crate::classify::{Classify, ClassifierFactory};

/// One directory in the recursive traversal.
///
/// A node owns its tally, its classifier handle and (after joining) its
/// children outright; nothing is shared across threads except the worker
/// budget. Children are handed off by move into scoped workers and moved
/// back when joined, so no node is ever aliased.
pub struct ScanNode {
    path: PathBuf,
    entry_count: u64,
    tally: LabelTally,
    children: Vec<ScanNode>,
    classifier: Option<Box<dyn Classify + Send>>,
}

/// A child whose subtree result is still owed to the parent.
enum Pending<'scope> {
    /// Ran in the parent's own thread; already fully merged.
    Inline(ScanNode),
    /// Running on a dispatched worker.
    Dispatched(ScopedJoinHandle<'scope, ScanNode>),
}

impl ScanNode {
    /// Create a node for `path`, acquiring its classifier handle.
    ///
    /// If the handle cannot be opened the node still walks, but every
    /// regular file it sees is counted as `classify-error`.
    fn new(path: PathBuf, factory: &dyn ClassifierFactory) -> Self {
        let classifier = match factory.open() {
            Ok(handle) => Some(handle),
            Err(err) => {
                debug!(path = %path.display(), %err, "classifier unavailable, degrading");
                None
            }
        };
        Self {
            path,
            entry_count: 0,
            tally: LabelTally::new(),
            children: Vec::new(),
            classifier,
        }
    }

    /// Walk the directory at `path` and everything below it, returning
    /// the fully merged node.
    ///
    /// The caller's thread drives the root; subtrees are handed to
    /// scoped workers as long as `budget` has slots left.
    pub fn scan(path: PathBuf, budget: &WorkerBudget, factory: &dyn ClassifierFactory) -> Self {
        let node = ScanNode::new(path, factory);
        std::thread::scope(|scope| {
            // The root participates in the budget like any other node.
            let slot = budget.try_acquire();
            node.execute(scope, budget, factory, slot)
        })
    }

    /// Walk this node's subtree to completion and return it merged.
    ///
    /// `slot` is the worker slot this node runs on, if it consumed one.
    /// The slot is released as soon as the node's own directory listing
    /// is done: descendants manage their own slots, so holding it across
    /// their joins would only starve the pool.
    fn execute<'scope, 'env>(
        mut self,
        scope: &'scope Scope<'scope, 'env>,
        budget: &'scope WorkerBudget,
        factory: &'scope dyn ClassifierFactory,
        slot: Option<BudgetSlot<'scope>>,
    ) -> Self {
        let pending = self.walk(scope, budget, factory);
        drop(slot);
        self.join(pending);
        self
    }

    /// List this directory's immediate entries, classifying files and
    /// dispatching subdirectories as they are discovered.
    fn walk<'scope, 'env>(
        &mut self,
        scope: &'scope Scope<'scope, 'env>,
        budget: &'scope WorkerBudget,
        factory: &'scope dyn ClassifierFactory,
    ) -> Vec<Pending<'scope>> {
        let mut pending = Vec::new();

        let entries = match fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(err) => {
                trace!(path = %self.path.display(), %err, "directory unreadable");
                self.tally.bump(Label::WalkError);
                return pending;
            }
        };

        for entry in entries {
            self.entry_count += 1;

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    trace!(path = %self.path.display(), %err, "entry unreadable");
                    self.tally.bump(Label::WalkError);
                    continue;
                }
            };

            // file_type() does not follow symlinks, so a link to a
            // directory is counted here and never descended.
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    trace!(path = %entry.path().display(), %err, "entry type unavailable");
                    self.tally.bump(Label::WalkError);
                    continue;
                }
            };

            if file_type.is_symlink() {
                self.tally.bump(Label::Symlink);
            } else if file_type.is_dir() {
                let child = ScanNode::new(entry.path(), factory);
                pending.push(child.dispatch(scope, budget, factory));
            } else if file_type.is_file() {
                self.classify_file(&entry.path());
            } else {
                self.tally.bump(Label::Other);
            }
        }

        pending
    }

    /// Decide at discovery time whether this child consumes a worker.
    ///
    /// With a slot the whole subtree runs on a scoped worker; without
    /// one it runs inline, blocking the parent's listing until done.
    fn dispatch<'scope, 'env>(
        self,
        scope: &'scope Scope<'scope, 'env>,
        budget: &'scope WorkerBudget,
        factory: &'scope dyn ClassifierFactory,
    ) -> Pending<'scope> {
        match budget.try_acquire() {
            Some(slot) => {
                debug!(path = %self.path.display(), "dispatching subtree to worker");
                Pending::Dispatched(
                    scope.spawn(move || self.execute(scope, budget, factory, Some(slot))),
                )
            }
            None => Pending::Inline(self.execute(scope, budget, factory, None)),
        }
    }

    /// Join children in discovery order and merge their tallies.
    ///
    /// Each joined child is already fully merged itself; its counts are
    /// moved up exactly once, leaving the child's tally empty.
    fn join(&mut self, pending: Vec<Pending<'_>>) {
        for child in pending {
            let mut child = match child {
                Pending::Inline(node) => node,
                Pending::Dispatched(handle) => match handle.join() {
                    Ok(node) => {
                        debug!(path = %node.path.display(), "joined worker");
                        node
                    }
                    Err(panic) => std::panic::resume_unwind(panic),
                },
            };
            self.tally.merge(child.tally.take());
            self.children.push(child);
        }
        // Walking and merging are finished; release the handle.
        self.classifier = None;
    }

    fn classify_file(&mut self, path: &Path) {
        let label = match self.classifier.as_mut() {
            Some(handle) => match handle.classify(path) {
                Ok(label) => label,
                Err(err) => {
                    trace!(%err, "classification failed");
                    Label::ClassifyError
                }
            },
            None => Label::ClassifyError,
        };
        self.tally.bump(label);
    }

    /// Path this node scanned.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries observed by this node's own walk (children excluded).
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// This node's tally. Empty for children after their parent merged.
    pub fn tally(&self) -> &LabelTally {
        &self.tally
    }

    /// Child nodes in discovery order.
    pub fn children(&self) -> &[ScanNode] {
        &self.children
    }

    /// Entries observed across the whole subtree.
    pub fn total_entries(&self) -> u64 {
        self.entry_count + self.children.iter().map(ScanNode::total_entries).sum::<u64>()
    }

    /// Directories walked in the whole subtree, this node included.
    pub fn dir_count(&self) -> u64 {
        1 + self.children.iter().map(ScanNode::dir_count).sum::<u64>()
    }

    /// Consume the node, keeping only its merged tally.
    pub(crate) fn into_tally(self) -> LabelTally {
        self.tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassifierInitError, ClassifyError};
    use std::fs;
    use tempfile::TempDir;

    /// Labels every file by its extension; content is never read.
    struct ExtensionClassifier;

    impl Classify for ExtensionClassifier {
        fn classify(&mut self, path: &Path) -> Result<Label, ClassifyError> {
            let label = match path.extension().and_then(|e| e.to_str()) {
                Some("txt") => "text",
                Some("png") => "image",
                _ => "data",
            };
            Ok(Label::category(label))
        }
    }

    struct ExtensionFactory;

    impl ClassifierFactory for ExtensionFactory {
        fn open(&self) -> Result<Box<dyn Classify + Send>, ClassifierInitError> {
            Ok(Box::new(ExtensionClassifier))
        }
    }

    struct BrokenFactory;

    impl ClassifierFactory for BrokenFactory {
        fn open(&self) -> Result<Box<dyn Classify + Send>, ClassifierInitError> {
            Err(ClassifierInitError("no database".to_string()))
        }
    }

    fn run_node(root: &Path, workers: usize, factory: &dyn ClassifierFactory) -> ScanNode {
        let budget = WorkerBudget::new(workers);
        let node = ScanNode::scan(root.to_path_buf(), &budget, factory);
        assert_eq!(budget.available(), workers);
        node
    }

    #[test]
    fn test_walk_counts_direct_entries() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("c.png"), "c").unwrap();

        let node = run_node(temp.path(), 0, &ExtensionFactory);

        assert_eq!(node.entry_count(), 3);
        assert_eq!(node.tally().get(&Label::category("text")), 2);
        assert_eq!(node.tally().get(&Label::category("image")), 1);
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_subtree_merges_upward_once() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("top.txt"), "t").unwrap();
        fs::write(temp.path().join("sub/inner.txt"), "i").unwrap();
        fs::write(temp.path().join("sub/inner.png"), "i").unwrap();

        let node = run_node(temp.path(), 4, &ExtensionFactory);

        assert_eq!(node.tally().get(&Label::category("text")), 2);
        assert_eq!(node.tally().get(&Label::category("image")), 1);
        assert_eq!(node.total_entries(), 4);
        assert_eq!(node.dir_count(), 2);

        // The child's counts moved up; it holds nothing to merge again.
        assert_eq!(node.children().len(), 1);
        let child = &node.children()[0];
        assert!(child.tally().is_empty());
        assert!(child.path().ends_with("sub"));
        assert_eq!(child.entry_count(), 2);
    }

    #[test]
    fn test_degraded_classifier_counts_errors() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join("b.png"), "b").unwrap();

        let node = run_node(temp.path(), 0, &BrokenFactory);

        assert_eq!(node.tally().get(&Label::ClassifyError), 2);
    }

    #[test]
    fn test_unreadable_root_counts_walk_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("vanished");

        let node = run_node(&missing, 0, &ExtensionFactory);

        assert_eq!(node.tally().get(&Label::WalkError), 1);
        assert_eq!(node.entry_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_counted_never_followed() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/inner.txt"), "i").unwrap();
        // Link back to the root: descending it would cycle forever.
        std::os::unix::fs::symlink(temp.path(), temp.path().join("sub/loop")).unwrap();

        let node = run_node(temp.path(), 2, &ExtensionFactory);

        assert_eq!(node.tally().get(&Label::Symlink), 1);
        assert_eq!(node.tally().get(&Label::category("text")), 1);
        assert_eq!(node.dir_count(), 2);
    }
}

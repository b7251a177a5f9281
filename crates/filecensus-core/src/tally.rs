//! Per-label occurrence counts.

use std::collections::HashMap;

use serde::Serialize;

use crate::label::Label;

/// Occurrence counts keyed by label.
///
/// Each scan node owns its tally exclusively while walking; when a child
/// finishes, its counts are moved into the parent with [`merge`] and the
/// child is left empty, so a subtree is never counted twice. Addition is
/// commutative, which makes the final totals independent of merge order.
///
/// [`merge`]: LabelTally::merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelTally {
    counts: HashMap<Label, u64>,
}

impl LabelTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count for a label.
    pub fn bump(&mut self, label: Label) {
        *self.counts.entry(label).or_insert(0) += 1;
    }

    /// Add another tally into this one, consuming it.
    pub fn merge(&mut self, other: LabelTally) {
        for (label, count) in other.counts {
            *self.counts.entry(label).or_insert(0) += count;
        }
    }

    /// Move all counts out, leaving this tally empty.
    pub fn take(&mut self) -> LabelTally {
        std::mem::take(self)
    }

    /// Get the count for a label.
    pub fn get(&self, label: &Label) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no labels have been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// All (label, count) pairs sorted by count descending.
    ///
    /// Ties are broken arbitrarily.
    pub fn ranked(&self) -> Vec<(Label, u64)> {
        let mut pairs: Vec<_> = self
            .counts
            .iter()
            .map(|(label, count)| (label.clone(), *count))
            .collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs
    }

    /// Iterate over (label, count) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Label, u64)> {
        self.counts.iter().map(|(label, count)| (label, *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_and_get() {
        let mut tally = LabelTally::new();
        tally.bump(Label::category("text"));
        tally.bump(Label::category("text"));
        tally.bump(Label::Symlink);

        assert_eq!(tally.get(&Label::category("text")), 2);
        assert_eq!(tally.get(&Label::Symlink), 1);
        assert_eq!(tally.get(&Label::Other), 0);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn test_merge_adds_entry_by_entry() {
        let mut parent = LabelTally::new();
        parent.bump(Label::category("text"));

        let mut child = LabelTally::new();
        child.bump(Label::category("text"));
        child.bump(Label::category("image"));

        parent.merge(child);

        assert_eq!(parent.get(&Label::category("text")), 2);
        assert_eq!(parent.get(&Label::category("image")), 1);
    }

    #[test]
    fn test_take_leaves_empty() {
        let mut tally = LabelTally::new();
        tally.bump(Label::Symlink);

        let taken = tally.take();

        assert!(tally.is_empty());
        assert_eq!(taken.get(&Label::Symlink), 1);

        // Merging the drained tally again adds nothing.
        let mut parent = LabelTally::new();
        parent.merge(taken);
        parent.merge(tally.take());
        assert_eq!(parent.get(&Label::Symlink), 1);
    }

    #[test]
    fn test_merge_is_commutative() {
        let mut a = LabelTally::new();
        a.bump(Label::category("text"));
        a.bump(Label::WalkError);

        let mut b = LabelTally::new();
        b.bump(Label::category("text"));
        b.bump(Label::category("image"));

        let mut left = a.clone();
        left.merge(b.clone());
        let mut right = b;
        right.merge(a);

        assert_eq!(left, right);
    }

    #[test]
    fn test_ranked_descending() {
        let mut tally = LabelTally::new();
        for _ in 0..3 {
            tally.bump(Label::category("text"));
        }
        tally.bump(Label::category("image"));
        tally.bump(Label::category("image"));
        tally.bump(Label::Symlink);

        let ranked = tally.ranked();
        assert_eq!(ranked[0], (Label::category("text"), 3));
        assert_eq!(ranked[1], (Label::category("image"), 2));
        assert_eq!(ranked[2], (Label::Symlink, 1));
    }
}

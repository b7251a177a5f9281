//! Classification labels.

use std::fmt;

use compact_str::CompactString;
use serde::{Serialize, Serializer};

/// The category assigned to one directory entry.
///
/// Regular files get a `Category` derived from the classifier's output.
/// The remaining variants are reserved pseudo-labels for entries the
/// classifier never sees (symlinks, special files) and for per-entry
/// failures, which are counted rather than propagated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    /// Content category reported by the classifier.
    Category(CompactString),
    /// Symbolic link. Never followed.
    Symlink,
    /// Other entry kinds (devices, sockets, FIFOs).
    Other,
    /// The entry could not be listed or its type could not be determined.
    WalkError,
    /// The classifier failed on this file.
    ClassifyError,
}

impl Label {
    /// Build a category label from a classifier description.
    ///
    /// Verbose descriptions are cut at the first `,` or `;` so that
    /// "ASCII text, with very long lines" and "ASCII text" land in the
    /// same bucket.
    pub fn category(desc: &str) -> Self {
        let short = desc.split([',', ';']).next().unwrap_or(desc).trim();
        Label::Category(CompactString::new(short))
    }

    /// Check if this is one of the error pseudo-labels.
    pub fn is_error(&self) -> bool {
        matches!(self, Label::WalkError | Label::ClassifyError)
    }

    /// Check if this is a classifier-assigned category.
    pub fn is_category(&self) -> bool {
        matches!(self, Label::Category(_))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Category(name) => f.write_str(name),
            Label::Symlink => f.write_str("symlink"),
            Label::Other => f.write_str("other"),
            Label::WalkError => f.write_str("walk-error"),
            Label::ClassifyError => f.write_str("classify-error"),
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

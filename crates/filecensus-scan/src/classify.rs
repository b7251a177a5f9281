//! Content classification adapter.
//!
//! Classification itself is an external concern hidden behind the
//! [`Classify`] trait; the scanner only cares that each node can open a
//! handle and that failures are countable, never fatal. The default
//! implementation detects file types from magic bytes via the `infer`
//! crate, which looks at the first few KiB of a file.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use filecensus_core::Label;

/// How much of the file head the default classifier inspects. Magic
/// signatures live in the first few KiB.
const HEADER_LEN: usize = 8192;

/// Classification failure for an individual file.
#[derive(Debug, Error)]
#[error("failed to classify {path}: {source}")]
pub struct ClassifyError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// The classifier handle could not be opened.
#[derive(Debug, Error)]
#[error("failed to open classifier: {0}")]
pub struct ClassifierInitError(pub String);

/// A stateful classification handle, owned by exactly one scan node.
pub trait Classify {
    /// Classify the file at `path` into a label.
    fn classify(&mut self, path: &Path) -> Result<Label, ClassifyError>;
}

/// Opens classification handles, one per scan node.
pub trait ClassifierFactory: Sync {
    fn open(&self) -> Result<Box<dyn Classify + Send>, ClassifierInitError>;
}

/// Magic-byte classifier backed by `infer`'s signature database.
///
/// Keeps a reusable read buffer per handle so classifying many files in
/// one directory does not reallocate.
pub struct MagicClassifier {
    buf: Vec<u8>,
}

impl MagicClassifier {
    fn new() -> Self {
        Self {
            buf: vec![0; HEADER_LEN],
        }
    }
}

impl Classify for MagicClassifier {
    fn classify(&mut self, path: &Path) -> Result<Label, ClassifyError> {
        let mut file = File::open(path).map_err(|source| ClassifyError {
            path: path.to_path_buf(),
            source,
        })?;
        let filled = read_head(&mut file, &mut self.buf).map_err(|source| ClassifyError {
            path: path.to_path_buf(),
            source,
        })?;

        // Unrecognized content is still a successful classification.
        Ok(match infer::get(&self.buf[..filled]) {
            Some(kind) => Label::category(kind.mime_type()),
            None => Label::category("unknown"),
        })
    }
}

/// Factory for [`MagicClassifier`] handles.
#[derive(Debug, Default)]
pub struct MagicClassifierFactory;

impl ClassifierFactory for MagicClassifierFactory {
    fn open(&self) -> Result<Box<dyn Classify + Send>, ClassifierInitError> {
        Ok(Box::new(MagicClassifier::new()))
    }
}

/// Fill `buf` from the start of the file, stopping at EOF.
fn read_head(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

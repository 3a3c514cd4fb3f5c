//! The phrase-source contract.
//!
//! Every layer the aggregator combines (global model, user phrases, excluded
//! phrases, replacement map, associated phrases) is some store with an
//! open/close lifecycle. The aggregator only sequences that lifecycle; the
//! store itself is pluggable.

use std::io;
use std::path::{Path, PathBuf};

use crate::Unigram;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        SourceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A key -> values store backing one layer of the language model.
///
/// An unloaded source behaves as if it had no entries for any key.
/// `close` must be safe to call at any time, including before `open`.
pub trait PhraseSource {
    fn open(&mut self, path: &Path) -> Result<(), SourceError>;

    fn close(&mut self);

    fn is_loaded(&self) -> bool;

    fn has_unigrams(&self, key: &str) -> bool;

    /// Entries for `key`, in source order.
    fn get_unigrams(&self, key: &str) -> Vec<Unigram>;

    /// Reverse lookup. Each record is three whitespace-separated fields:
    /// the key, an informational middle field, and the score.
    fn get_readings(&self, value: &str) -> Vec<String>;

    /// Values stored under `key`, in source order.
    fn values_for_key(&self, key: &str) -> Vec<String>;

    fn has_values_for_key(&self, key: &str) -> bool {
        !self.values_for_key(key).is_empty()
    }

    /// First value stored under `key`, or an empty string.
    fn value_for_key(&self, key: &str) -> String {
        self.values_for_key(key).into_iter().next().unwrap_or_default()
    }
}

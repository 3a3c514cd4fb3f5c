//! Plain-text phrase table.
//!
//! File format, one entry per line:
//!
//! ```text
//! # comment
//! ㄋㄧˇ 你 -3.27
//! ㄋㄧˇ 擬 -5.81
//! ㄏㄠˇ 好
//! ```
//!
//! Fields are whitespace separated: key, value, optional score (default 0).
//! Lines with fewer than two fields or an unparsable score are skipped.

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::source::{PhraseSource, SourceError};
use crate::Unigram;

#[derive(Debug, Clone, Default)]
pub struct TextPhraseTable {
    entries: AHashMap<String, Vec<Unigram>>,
    // value -> (key, score), in insertion order
    readings: AHashMap<String, Vec<(String, f64)>>,
    path: Option<PathBuf>,
    loaded: bool,
}

impl TextPhraseTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse table text. Malformed lines are skipped.
    pub fn from_text(text: &str) -> Self {
        let mut table = Self::new();
        table.parse_into(text);
        table.loaded = true;
        table
    }

    /// Add one entry and mark the table loaded.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V, score: f64) {
        let key = key.into();
        let value = value.into();
        self.readings
            .entry(value.clone())
            .or_default()
            .push((key.clone(), score));
        self.entries
            .entry(key)
            .or_default()
            .push(Unigram::new(value, score));
        self.loaded = true;
    }

    /// Path of the file last opened, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn parse_into(&mut self, text: &str) {
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(key), Some(value)) = (fields.next(), fields.next()) else {
                warn!(line = index + 1, "skipping phrase line without a value");
                continue;
            };
            let score = match fields.next().map(str::parse::<f64>) {
                None => 0.0,
                Some(Ok(score)) => score,
                Some(Err(err)) => {
                    warn!(line = index + 1, %err, "skipping phrase line with a bad score");
                    continue;
                }
            };
            self.insert(key, value, score);
        }
    }
}

impl PhraseSource for TextPhraseTable {
    fn open(&mut self, path: &Path) -> Result<(), SourceError> {
        self.close();
        let text = std::fs::read_to_string(path).map_err(|err| SourceError::io(path, err))?;
        self.parse_into(&text);
        self.path = Some(path.to_path_buf());
        self.loaded = true;
        debug!(path = %path.display(), keys = self.entries.len(), "opened phrase table");
        Ok(())
    }

    fn close(&mut self) {
        if self.loaded {
            debug!(path = ?self.path, "closing phrase table");
        }
        self.entries.clear();
        self.readings.clear();
        self.path = None;
        self.loaded = false;
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn has_unigrams(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get_unigrams(&self, key: &str) -> Vec<Unigram> {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    fn get_readings(&self, value: &str) -> Vec<String> {
        self.readings
            .get(value)
            .map(|found| {
                found
                    .iter()
                    .map(|(key, score)| format!("{key} {value} {score}"))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn values_for_key(&self, key: &str) -> Vec<String> {
        self.entries
            .get(key)
            .map(|unigrams| unigrams.iter().map(|u| u.value.clone()).collect())
            .unwrap_or_default()
    }

    fn has_values_for_key(&self, key: &str) -> bool {
        self.has_unigrams(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_values_and_scores() {
        let table = TextPhraseTable::from_text("# header\nni 你 -3.5\nni 擬 -6\n\nhao 好\n");
        assert!(table.is_loaded());
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get_unigrams("ni"),
            vec![Unigram::new("你", -3.5), Unigram::new("擬", -6.0)]
        );
        assert_eq!(table.get_unigrams("hao"), vec![Unigram::new("好", 0.0)]);
        assert!(!table.has_unigrams("ma"));
    }

    #[test]
    fn skips_malformed_lines() {
        let table = TextPhraseTable::from_text("lonely\nni 你 abc\nni 妳 -2\n");
        assert_eq!(table.get_unigrams("ni"), vec![Unigram::new("妳", -2.0)]);
        assert!(!table.has_unigrams("lonely"));
    }

    #[test]
    fn readings_are_three_field_records() {
        let table = TextPhraseTable::from_text("ni 你 -3.5\nnii 你 -7\n");
        assert_eq!(table.get_readings("你"), vec!["ni 你 -3.5", "nii 你 -7"]);
        assert!(table.get_readings("好").is_empty());
    }

    #[test]
    fn value_lookups() {
        let table = TextPhraseTable::from_text("台 臺\nni 你\nni 妳\n");
        assert_eq!(table.value_for_key("台"), "臺");
        assert_eq!(table.value_for_key("臺"), "");
        assert_eq!(table.values_for_key("ni"), vec!["你", "妳"]);
        assert!(table.has_values_for_key("ni"));
    }

    #[test]
    fn close_unloads_and_is_idempotent() {
        let mut table = TextPhraseTable::new();
        table.close();
        assert!(!table.is_loaded());
        table.insert("ni", "你", 0.0);
        assert!(table.is_loaded());
        table.close();
        table.close();
        assert!(!table.is_loaded());
        assert!(table.get_unigrams("ni").is_empty());
    }

    #[test]
    fn open_missing_file_fails() {
        let mut table = TextPhraseTable::from_text("ni 你 -1\n");
        let err = table
            .open(Path::new("/nonexistent/phrases.txt"))
            .expect_err("missing file");
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(!table.is_loaded());
        assert!(table.is_empty());
        assert!(!table.has_unigrams("ni"));
    }
}

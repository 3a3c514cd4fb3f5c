//! Layered language model.
//!
//! [`AggregateModel`] answers unigram queries by merging five phrase
//! sources:
//!
//! - user phrases, which always outrank the global model
//! - the global language model
//! - excluded phrases, removed from both layers above
//! - a phrase replacement map, applied when enabled
//! - associated phrases, passed through untouched
//!
//! An optional host-supplied converter rewrites every value last. Values
//! are deduplicated after replacement and conversion, so the first layer to
//! produce a final value keeps it.

use std::fmt;
use std::path::Path;

use ahash::AHashSet;
use tracing::{debug, warn};

use crate::source::PhraseSource;
use crate::table::TextPhraseTable;
use crate::{Config, Unigram};

/// The key that always maps to a literal space.
pub const SPACE_KEY: &str = " ";

/// Query interface consumed by the composition engine.
pub trait LanguageModel {
    fn get_unigrams(&self, key: &str) -> Vec<Unigram>;

    fn has_unigrams(&self, key: &str) -> bool;
}

/// One of the sources an [`AggregateModel`] owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    LanguageModel,
    UserPhrases,
    ExcludedPhrases,
    PhraseReplacement,
    AssociatedPhrases,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::LanguageModel,
        Layer::UserPhrases,
        Layer::ExcludedPhrases,
        Layer::PhraseReplacement,
        Layer::AssociatedPhrases,
    ];
}

pub type ExternalConverter = Box<dyn Fn(&str) -> String + Send + Sync>;

pub struct AggregateModel<S: PhraseSource = TextPhraseTable> {
    language_model: S,
    user_phrases: S,
    excluded_phrases: S,
    phrase_replacement: S,
    associated_phrases: S,
    phrase_replacement_enabled: bool,
    external_converter_enabled: bool,
    external_converter: Option<ExternalConverter>,
}

impl<S: PhraseSource + Default> AggregateModel<S> {
    pub fn new() -> Self {
        Self {
            language_model: S::default(),
            user_phrases: S::default(),
            excluded_phrases: S::default(),
            phrase_replacement: S::default(),
            associated_phrases: S::default(),
            phrase_replacement_enabled: false,
            external_converter_enabled: false,
            external_converter: None,
        }
    }

    /// Build a model and load every source the config names.
    pub fn from_config(config: &Config) -> Self {
        let mut model = Self::new();
        if let Some(path) = &config.language_model_path {
            model.load_language_model(path);
        }
        model.load_user_phrases(
            config.user_phrases_path.as_deref(),
            config.excluded_phrases_path.as_deref(),
        );
        if let Some(path) = &config.phrase_replacement_path {
            model.load_phrase_replacement_map(path);
        }
        if let Some(path) = &config.associated_phrases_path {
            model.load_associated_phrases(path);
        }
        model.set_phrase_replacement_enabled(config.phrase_replacement_enabled);
        model.set_external_converter_enabled(config.external_converter_enabled);
        model
    }
}

impl<S: PhraseSource + Default> Default for AggregateModel<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PhraseSource> AggregateModel<S> {
    /// Returns whether the source is loaded afterwards. A failed load is
    /// logged and leaves the layer empty.
    pub fn load_language_model<P: AsRef<Path>>(&mut self, path: P) -> bool {
        reload(&mut self.language_model, path.as_ref(), Layer::LanguageModel)
    }

    /// Either path may be omitted to leave that source as it is.
    pub fn load_user_phrases(&mut self, user: Option<&Path>, excluded: Option<&Path>) -> bool {
        let mut ok = true;
        if let Some(path) = user {
            ok &= reload(&mut self.user_phrases, path, Layer::UserPhrases);
        }
        if let Some(path) = excluded {
            ok &= reload(&mut self.excluded_phrases, path, Layer::ExcludedPhrases);
        }
        ok
    }

    pub fn load_phrase_replacement_map<P: AsRef<Path>>(&mut self, path: P) -> bool {
        reload(&mut self.phrase_replacement, path.as_ref(), Layer::PhraseReplacement)
    }

    pub fn load_associated_phrases<P: AsRef<Path>>(&mut self, path: P) -> bool {
        reload(&mut self.associated_phrases, path.as_ref(), Layer::AssociatedPhrases)
    }

    pub fn source(&self, layer: Layer) -> &S {
        match layer {
            Layer::LanguageModel => &self.language_model,
            Layer::UserPhrases => &self.user_phrases,
            Layer::ExcludedPhrases => &self.excluded_phrases,
            Layer::PhraseReplacement => &self.phrase_replacement,
            Layer::AssociatedPhrases => &self.associated_phrases,
        }
    }

    fn source_mut(&mut self, layer: Layer) -> &mut S {
        match layer {
            Layer::LanguageModel => &mut self.language_model,
            Layer::UserPhrases => &mut self.user_phrases,
            Layer::ExcludedPhrases => &mut self.excluded_phrases,
            Layer::PhraseReplacement => &mut self.phrase_replacement,
            Layer::AssociatedPhrases => &mut self.associated_phrases,
        }
    }

    /// Install an already-populated source, closing the one it replaces.
    pub fn set_source(&mut self, layer: Layer, source: S) {
        let slot = self.source_mut(layer);
        slot.close();
        *slot = source;
    }

    pub fn is_loaded(&self, layer: Layer) -> bool {
        self.source(layer).is_loaded()
    }

    pub fn set_phrase_replacement_enabled(&mut self, enabled: bool) {
        self.phrase_replacement_enabled = enabled;
    }

    pub fn phrase_replacement_enabled(&self) -> bool {
        self.phrase_replacement_enabled
    }

    pub fn set_external_converter_enabled(&mut self, enabled: bool) {
        self.external_converter_enabled = enabled;
    }

    pub fn external_converter_enabled(&self) -> bool {
        self.external_converter_enabled
    }

    /// The converter only runs while it is also enabled.
    pub fn set_external_converter<F>(&mut self, converter: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.external_converter = Some(Box::new(converter));
    }

    pub fn clear_external_converter(&mut self) {
        self.external_converter = None;
    }

    /// Best-scoring key for `value` in the global model, or an empty
    /// string. Ties keep the first record seen.
    pub fn get_reading(&self, value: &str) -> String {
        let mut best: Option<(f64, String)> = None;
        for record in self.language_model.get_readings(value) {
            let fields: Vec<&str> = record.split_whitespace().collect();
            let [reading, _, score] = fields.as_slice() else {
                warn!(%record, "skipping reading record without three fields");
                continue;
            };
            let score = match score.parse::<f64>() {
                Ok(score) if !score.is_nan() => score,
                _ => {
                    warn!(%record, "skipping reading record with a bad score");
                    continue;
                }
            };
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, reading.to_string()));
            }
        }
        best.map(|(_, reading)| reading).unwrap_or_default()
    }

    pub fn associated_phrases_for_key(&self, key: &str) -> Vec<String> {
        self.associated_phrases.values_for_key(key)
    }

    pub fn has_associated_phrases_for_key(&self, key: &str) -> bool {
        self.associated_phrases.has_values_for_key(key)
    }

    fn excluded_values(&self, key: &str) -> AHashSet<String> {
        unigrams_from(&self.excluded_phrases, key)
            .into_iter()
            .map(|unigram| unigram.value)
            .collect()
    }

    fn filter_and_transform(
        &self,
        unigrams: Vec<Unigram>,
        excluded: &AHashSet<String>,
        inserted: &mut AHashSet<String>,
    ) -> Vec<Unigram> {
        let mut results = Vec::with_capacity(unigrams.len());
        for unigram in unigrams {
            if excluded.contains(&unigram.value) {
                continue;
            }

            let mut value = unigram.value;
            if self.phrase_replacement_enabled {
                let replacement = self.phrase_replacement.value_for_key(&value);
                if !replacement.is_empty() {
                    value = replacement;
                }
            }
            if self.external_converter_enabled {
                if let Some(convert) = &self.external_converter {
                    value = convert(&value);
                }
            }

            if inserted.insert(value.clone()) {
                results.push(Unigram::new(value, unigram.score));
            }
        }
        results
    }
}

impl<S: PhraseSource> LanguageModel for AggregateModel<S> {
    fn get_unigrams(&self, key: &str) -> Vec<Unigram> {
        if key == SPACE_KEY {
            return vec![Unigram::new(SPACE_KEY, 0.0)];
        }

        let excluded = self.excluded_values(key);
        let mut inserted = AHashSet::new();

        let mut results = self.filter_and_transform(
            unigrams_from(&self.user_phrases, key),
            &excluded,
            &mut inserted,
        );
        results.extend(self.filter_and_transform(
            unigrams_from(&self.language_model, key),
            &excluded,
            &mut inserted,
        ));
        results
    }

    fn has_unigrams(&self, key: &str) -> bool {
        if key == SPACE_KEY {
            return true;
        }

        if !has_unigrams_in(&self.excluded_phrases, key) {
            return has_unigrams_in(&self.user_phrases, key)
                || has_unigrams_in(&self.language_model, key);
        }
        !self.get_unigrams(key).is_empty()
    }
}

impl<S: PhraseSource> Drop for AggregateModel<S> {
    fn drop(&mut self) {
        for layer in Layer::ALL {
            self.source_mut(layer).close();
        }
    }
}

impl<S: PhraseSource> fmt::Debug for AggregateModel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded: Vec<Layer> = Layer::ALL
            .into_iter()
            .filter(|layer| self.is_loaded(*layer))
            .collect();
        f.debug_struct("AggregateModel")
            .field("loaded", &loaded)
            .field("phrase_replacement_enabled", &self.phrase_replacement_enabled)
            .field("external_converter_enabled", &self.external_converter_enabled)
            .field("has_external_converter", &self.external_converter.is_some())
            .finish()
    }
}

fn has_unigrams_in<S: PhraseSource>(source: &S, key: &str) -> bool {
    source.is_loaded() && source.has_unigrams(key)
}

fn unigrams_from<S: PhraseSource>(source: &S, key: &str) -> Vec<Unigram> {
    if has_unigrams_in(source, key) {
        source.get_unigrams(key)
    } else {
        Vec::new()
    }
}

fn reload<S: PhraseSource>(source: &mut S, path: &Path, layer: Layer) -> bool {
    source.close();
    match source.open(path) {
        Ok(()) => {
            debug!(?layer, path = %path.display(), "loaded phrase source");
            true
        }
        Err(err) => {
            warn!(?layer, %err, "failed to load phrase source");
            false
        }
    }
}

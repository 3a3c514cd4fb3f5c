//! # libbopomofo
//!
//! Bopomofo phonetic input core built on libbopomofo-core: the packed
//! syllable and its textual forms, keyboard layouts with key
//! disambiguation, and the per-session reading buffer.

pub mod config;
pub mod layout;
pub mod pht;
pub mod pinyin;
pub mod reading_buffer;
pub mod syllable;

// Re-export the language-model layer from core
pub use libbopomofo_core::{
    AggregateModel, Config, LanguageModel, Layer, PhraseSource, SourceError, TextPhraseTable,
    Unigram,
};

pub use config::BopomofoConfig;
pub use layout::{apply_hsu_corrections, KeyboardLayout, LayoutKind, LayoutRegistry, UnknownLayout};
pub use reading_buffer::ReadingBuffer;
pub use syllable::{Component, Syllable, ABSOLUTE_ORDER_SPACE};

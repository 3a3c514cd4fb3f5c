//! Per-session keystroke accumulator.
//!
//! In layout mode the buffer stores only the syllable: every edit rebuilds
//! the canonical key sequence from it, applies the edit, and runs the full
//! disambiguation again. A key's meaning can depend on what follows it, so
//! an incremental update would not be safe.
//!
//! When the layout is [`LayoutKind::HanyuPinyin`] the buffer is in direct
//! mode instead: keys are ASCII letters plus an optional trailing tone
//! digit, kept verbatim and re-decoded as Hanyu Pinyin after each edit.

use std::sync::Arc;

use crate::layout::{KeyboardLayout, LayoutKind};
use crate::syllable::Syllable;

#[derive(Debug, Clone)]
pub struct ReadingBuffer {
    layout: Arc<KeyboardLayout>,
    syllable: Syllable,
    pinyin_sequence: String,
    pinyin_mode: bool,
}

impl ReadingBuffer {
    pub fn new(layout: Arc<KeyboardLayout>) -> Self {
        let pinyin_mode = layout.kind() == LayoutKind::HanyuPinyin;
        Self {
            layout,
            syllable: Syllable::empty(),
            pinyin_sequence: String::new(),
            pinyin_mode,
        }
    }

    pub fn keyboard_layout(&self) -> &Arc<KeyboardLayout> {
        &self.layout
    }

    /// Switch layouts. Any pending input is discarded.
    pub fn set_keyboard_layout(&mut self, layout: Arc<KeyboardLayout>) {
        self.pinyin_mode = layout.kind() == LayoutKind::HanyuPinyin;
        self.layout = layout;
        self.clear();
    }

    /// True when the buffer reads Hanyu Pinyin letters directly.
    pub fn is_pinyin_mode(&self) -> bool {
        self.pinyin_mode
    }

    pub fn is_valid_key(&self, key: char) -> bool {
        if !self.pinyin_mode {
            return !self.layout.key_to_components(key).is_empty();
        }

        let key = key.to_ascii_lowercase();
        let ends_with_tone = self
            .pinyin_sequence
            .chars()
            .last()
            .map_or(false, is_pinyin_tone_digit);
        if key.is_ascii_lowercase() {
            return !ends_with_tone;
        }
        is_pinyin_tone_digit(key) && !self.pinyin_sequence.is_empty() && !ends_with_tone
    }

    /// Feed one key. Returns false, leaving the buffer untouched, when the
    /// key is not valid here.
    pub fn combine_key(&mut self, key: char) -> bool {
        if !self.is_valid_key(key) {
            return false;
        }

        if self.pinyin_mode {
            self.pinyin_sequence.push(key.to_ascii_lowercase());
            self.syllable = Syllable::from_hanyu_pinyin(&self.pinyin_sequence);
            return true;
        }

        let mut sequence = self.layout.key_sequence_from_syllable(self.syllable);
        sequence.push(key);
        self.syllable = self.layout.syllable_from_key_sequence(&sequence);
        true
    }

    /// Drop the most recent component. A no-op on an empty buffer.
    pub fn backspace(&mut self) {
        if self.pinyin_mode {
            if self.pinyin_sequence.pop().is_some() {
                self.syllable = Syllable::from_hanyu_pinyin(&self.pinyin_sequence);
            }
            return;
        }

        let mut sequence = self.layout.key_sequence_from_syllable(self.syllable);
        if sequence.pop().is_some() {
            self.syllable = self.layout.syllable_from_key_sequence(&sequence);
        }
    }

    pub fn clear(&mut self) {
        self.pinyin_sequence.clear();
        self.syllable.clear();
    }

    /// In direct mode this looks at the raw letters, which may not decode to
    /// a syllable yet.
    pub fn is_empty(&self) -> bool {
        if self.pinyin_mode {
            self.pinyin_sequence.is_empty()
        } else {
            self.syllable.is_empty()
        }
    }

    /// Text to show while composing: the raw letters in direct mode, the
    /// Bopomofo syllable otherwise.
    pub fn composed_string(&self) -> String {
        if self.pinyin_mode {
            self.pinyin_sequence.clone()
        } else {
            self.syllable.composed_string()
        }
    }

    pub fn syllable(&self) -> Syllable {
        self.syllable
    }

    pub fn has_tone_marker(&self) -> bool {
        self.syllable.has_tone_marker()
    }

    /// The current syllable as typed on another layout.
    pub fn key_sequence_in(&self, layout: &KeyboardLayout) -> String {
        layout.key_sequence_from_syllable(self.syllable)
    }

    pub fn standard_layout_query_string(&self, standard: &KeyboardLayout) -> String {
        self.key_sequence_in(standard)
    }

    pub fn absolute_order_query_string(&self) -> String {
        self.syllable.absolute_order_string()
    }
}

fn is_pinyin_tone_digit(c: char) -> bool {
    ('2'..='5').contains(&c)
}

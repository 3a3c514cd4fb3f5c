//! PHT (Pai-hua-tsi style) phonetic letters.
//!
//! Unlike Hanyu Pinyin, PHT spells every Bopomofo component with its own
//! fixed letter group, so a syllable is written field by field: consonant,
//! medial, final, tone digit. Aspiration is marked with a trailing `h`
//! (`p`/`ph`, `t`/`th`, `k`/`kh`), retroflexes with `r`.
//!
//! No medial or final starts with `h`, `r` or `s`, which keeps the greedy
//! longest match of the consonant group unambiguous.

use crate::syllable::{Component, Syllable};

const PHT_CONSONANTS: &[(&str, Component)] = &[
    ("p", Syllable::B),
    ("ph", Syllable::P),
    ("m", Syllable::M),
    ("f", Syllable::F),
    ("t", Syllable::D),
    ("th", Syllable::T),
    ("n", Syllable::N),
    ("l", Syllable::L),
    ("k", Syllable::G),
    ("kh", Syllable::K),
    ("h", Syllable::H),
    ("c", Syllable::J),
    ("ch", Syllable::Q),
    ("x", Syllable::X),
    ("tr", Syllable::ZH),
    ("trh", Syllable::CH),
    ("sr", Syllable::SH),
    ("j", Syllable::R),
    ("ts", Syllable::Z),
    ("tsh", Syllable::C),
    ("s", Syllable::S),
];

const PHT_MEDIALS: &[(&str, Component)] = &[
    ("i", Syllable::I),
    ("u", Syllable::U),
    ("y", Syllable::UE),
];

const PHT_VOWELS: &[(&str, Component)] = &[
    ("a", Syllable::A),
    ("o", Syllable::O),
    ("or", Syllable::ER),
    ("e", Syllable::E),
    ("ai", Syllable::AI),
    ("ei", Syllable::EI),
    ("au", Syllable::AO),
    ("ou", Syllable::OU),
    ("an", Syllable::AN),
    ("en", Syllable::EN),
    ("ang", Syllable::ANG),
    ("eng", Syllable::ENG),
    ("er", Syllable::ERR),
];

const PHT_TONES: &[(&str, Component)] = &[
    ("1", Syllable::TONE1),
    ("2", Syllable::TONE2),
    ("3", Syllable::TONE3),
    ("4", Syllable::TONE4),
    ("5", Syllable::TONE5),
];

/// Longest spelling in `table` that prefixes `input`.
fn longest_match(input: &str, table: &[(&str, Component)]) -> Option<(usize, Component)> {
    table
        .iter()
        .filter(|(spelling, _)| input.starts_with(spelling))
        .max_by_key(|(spelling, _)| spelling.len())
        .map(|(spelling, component)| (spelling.len(), *component))
}

fn spelling_of(component: Component, table: &[(&'static str, Component)]) -> &'static str {
    table
        .iter()
        .find(|(_, c)| *c == component)
        .map(|(spelling, _)| *spelling)
        .unwrap_or("")
}

impl Syllable {
    /// Decode a PHT spelling. Unknown letters or leftovers yield empty.
    pub fn from_pht(input: &str) -> Syllable {
        let lowered = input.trim().to_lowercase();
        let mut rest = lowered.as_str();
        let mut packed: Component = 0;

        for table in [PHT_CONSONANTS, PHT_MEDIALS, PHT_VOWELS] {
            if let Some((len, component)) = longest_match(rest, table) {
                packed |= component;
                rest = &rest[len..];
            }
        }
        if packed == 0 {
            return Syllable::empty();
        }
        if let Some((len, component)) = longest_match(rest, PHT_TONES) {
            packed |= component;
            rest = &rest[len..];
        }

        if rest.is_empty() {
            Syllable::new(packed)
        } else {
            Syllable::empty()
        }
    }

    /// Encode as PHT letters, optionally with a tone digit (tone 1 is never
    /// written).
    pub fn pht_string(&self, includes_tone: bool) -> String {
        let mut out = String::new();
        out.push_str(spelling_of(self.consonant_component(), PHT_CONSONANTS));
        out.push_str(spelling_of(self.middle_vowel_component(), PHT_MEDIALS));
        out.push_str(spelling_of(self.vowel_component(), PHT_VOWELS));
        if includes_tone && self.has_tone_marker() {
            out.push_str(spelling_of(self.tone_marker_component(), PHT_TONES));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_each_field() {
        let s = Syllable::from_composed_string("ㄔㄨㄤˊ");
        assert_eq!(s.pht_string(true), "trhuang2");
        assert_eq!(s.pht_string(false), "trhuang");
        assert_eq!(Syllable::from_composed_string("ㄑㄩㄝ").pht_string(true), "chye");
    }

    #[test]
    fn decodes_aspirated_and_plain_consonants() {
        assert_eq!(Syllable::from_pht("pa"), Syllable::from_composed_string("ㄅㄚ"));
        assert_eq!(Syllable::from_pht("pha"), Syllable::from_composed_string("ㄆㄚ"));
        assert_eq!(Syllable::from_pht("tsor4"), Syllable::from_composed_string("ㄗㄜˋ"));
        assert_eq!(Syllable::from_pht("tshor4"), Syllable::from_composed_string("ㄘㄜˋ"));
        assert_eq!(Syllable::from_pht("sr"), Syllable::from_composed_string("ㄕ"));
    }

    #[test]
    fn rejects_leftovers() {
        assert!(Syllable::from_pht("").is_empty());
        assert!(Syllable::from_pht("3").is_empty());
        assert!(Syllable::from_pht("paq").is_empty());
        assert!(Syllable::from_pht("pa3x").is_empty());
    }

    #[test]
    fn round_trips_every_field_combination() {
        let consonants = PHT_CONSONANTS.iter().map(|(_, c)| *c).chain([0]);
        for consonant in consonants {
            for (_, medial) in PHT_MEDIALS.iter().chain(&[("", 0)]) {
                for (_, vowel) in PHT_VOWELS.iter().chain(&[("", 0)]) {
                    for (_, tone) in PHT_TONES {
                        let packed = consonant | medial | vowel | tone;
                        if packed & !Syllable::TONE_MARKER_MASK == 0 {
                            continue;
                        }
                        let s = Syllable::new(packed);
                        assert_eq!(Syllable::from_pht(&s.pht_string(true)), s, "{}", s);
                    }
                }
            }
        }
    }
}

//! Hanyu Pinyin <-> Bopomofo syllable conversion.
//!
//! Decoding accepts the ASCII, "v"-tolerant, TW-style spelling: `lv` and `lü`
//! are the same syllable, `bong`/`pong`/`fong` stand for ㄅㄥ/ㄆㄥ/ㄈㄥ, and the
//! tone may be given either as a trailing digit or as a diacritic on a vowel.
//! Matching is greedy (longest spelling first) and any residue left after
//! the consonant, medial and final have been consumed makes the whole input
//! decode to the empty syllable.

use unicode_normalization::UnicodeNormalization;

use crate::syllable::{Component, Syllable};

/// Syllables spelled with a leading `y` whose medial/final differ from what
/// the letters after `y` would suggest. Longest first.
const Y_SPELLINGS: &[(&str, Component, Component)] = &[
    ("yuan", Syllable::UE, Syllable::AN),
    ("ying", Syllable::I, Syllable::ENG),
    ("yung", Syllable::UE, Syllable::ENG),
    ("yong", Syllable::UE, Syllable::ENG),
    ("yue", Syllable::UE, Syllable::E),
    ("yun", Syllable::UE, Syllable::EN),
    ("you", Syllable::I, Syllable::OU),
    ("yu", Syllable::UE, 0),
];

const SINGLE_LETTER_CONSONANTS: &[(char, Component)] = &[
    ('b', Syllable::B),
    ('p', Syllable::P),
    ('m', Syllable::M),
    ('f', Syllable::F),
    ('d', Syllable::D),
    ('t', Syllable::T),
    ('n', Syllable::N),
    ('l', Syllable::L),
    ('g', Syllable::G),
    ('k', Syllable::K),
    ('h', Syllable::H),
    ('j', Syllable::J),
    ('q', Syllable::Q),
    ('x', Syllable::X),
];

/// Consonants that may stand alone (`zhi`, `ri`, `si`): a following `i` is
/// silent.
const INDEPENDENT_CONSONANTS: &[(&str, Component)] = &[
    ("zh", Syllable::ZH),
    ("ch", Syllable::CH),
    ("sh", Syllable::SH),
    ("r", Syllable::R),
    ("z", Syllable::Z),
    ("c", Syllable::C),
    ("s", Syllable::S),
];

/// Finals whose spelling hides a medial. Longest first.
const CONTRACTED_FINALS: &[(&str, Component, Component)] = &[
    ("veng", Syllable::UE, Syllable::ENG),
    ("iong", Syllable::UE, Syllable::ENG),
    ("ing", Syllable::I, Syllable::ENG),
    ("ien", Syllable::I, Syllable::EN),
    ("iou", Syllable::I, Syllable::OU),
    ("uen", Syllable::U, Syllable::EN),
    ("ven", Syllable::UE, Syllable::EN),
    ("uei", Syllable::U, Syllable::EI),
    ("iu", Syllable::I, Syllable::OU),
    ("in", Syllable::I, Syllable::EN),
    ("vn", Syllable::UE, Syllable::EN),
    ("ui", Syllable::U, Syllable::EI),
    ("ue", Syllable::UE, Syllable::E),
];

/// Finals, longest first. A bare `e` is resolved separately.
const FINALS: &[(&str, Component)] = &[
    ("ang", Syllable::ANG),
    ("eng", Syllable::ENG),
    ("err", Syllable::ERR),
    ("ai", Syllable::AI),
    ("ei", Syllable::EI),
    ("ao", Syllable::AO),
    ("ou", Syllable::OU),
    ("an", Syllable::AN),
    ("en", Syllable::EN),
    ("er", Syllable::ERR),
    ("a", Syllable::A),
    ("o", Syllable::O),
];

const COMBINING_MACRON: char = '\u{0304}';
const COMBINING_ACUTE: char = '\u{0301}';
const COMBINING_CARON: char = '\u{030C}';
const COMBINING_GRAVE: char = '\u{0300}';
const COMBINING_DIAERESIS: char = '\u{0308}';

fn consume<'a>(input: &mut &'a str, prefix: &str) -> bool {
    match input.strip_prefix(prefix) {
        Some(rest) => {
            *input = rest;
            true
        }
        None => false,
    }
}

fn is_jqx(consonant: Component) -> bool {
    matches!(consonant, Syllable::J | Syllable::Q | Syllable::X)
}

/// Lowercase, fold ü to `v`, and lift tone diacritics out of the letters.
fn normalize_spelling(input: &str) -> (String, Component) {
    let mut letters = String::with_capacity(input.len());
    let mut tone = Syllable::TONE1;
    for ch in input.trim().to_lowercase().nfd() {
        match ch {
            COMBINING_MACRON => tone = Syllable::TONE1,
            COMBINING_ACUTE => tone = Syllable::TONE2,
            COMBINING_CARON => tone = Syllable::TONE3,
            COMBINING_GRAVE => tone = Syllable::TONE4,
            COMBINING_DIAERESIS => {
                if letters.ends_with('u') {
                    letters.pop();
                    letters.push('v');
                }
            }
            _ => letters.push(ch),
        }
    }
    (letters, tone)
}

impl Syllable {
    /// Decode a Hanyu Pinyin spelling such as `zhong1`, `lv4`, `nǚ` or `fong`.
    pub fn from_hanyu_pinyin(input: &str) -> Syllable {
        let (letters, mut tone) = normalize_spelling(input);
        let mut rest = letters.as_str();

        if let Some(last) = rest.chars().last() {
            let digit_tone = match last {
                '1' => Some(Syllable::TONE1),
                '2' => Some(Syllable::TONE2),
                '3' => Some(Syllable::TONE3),
                '4' => Some(Syllable::TONE4),
                '5' => Some(Syllable::TONE5),
                _ => None,
            };
            if let Some(t) = digit_tone {
                tone = t;
                rest = &rest[..rest.len() - 1];
            }
        }
        if rest.is_empty() {
            return Syllable::empty();
        }

        let mut consonant: Component = 0;
        let mut medial: Component = 0;
        let mut vowel: Component = 0;
        let mut independent = false;

        for (spelling, m, v) in Y_SPELLINGS {
            if consume(&mut rest, spelling) {
                medial = *m;
                vowel = *v;
                break;
            }
        }

        if let Some(first) = rest.chars().next() {
            if let Some((_, c)) = SINGLE_LETTER_CONSONANTS.iter().find(|(k, _)| *k == first) {
                consonant = *c;
                rest = &rest[1..];
            } else if first == 'w' {
                medial = Syllable::U;
                rest = &rest[1..];
            } else if first == 'y' {
                if medial == 0 && vowel == 0 {
                    medial = Syllable::I;
                }
                rest = &rest[1..];
            }
        }

        if consonant == 0 {
            for (spelling, c) in INDEPENDENT_CONSONANTS {
                if consume(&mut rest, spelling) {
                    consonant = *c;
                    independent = true;
                    break;
                }
            }
        }

        let mut matched_final = false;
        for (spelling, m, v) in CONTRACTED_FINALS {
            if consume(&mut rest, spelling) {
                medial = *m;
                vowel = *v;
                matched_final = true;
                break;
            }
        }

        if !matched_final {
            if consume(&mut rest, "ung") || consume(&mut rest, "ong") {
                // TW-style bong/pong/fong keep the bare ㄥ
                if !matches!(consonant, Syllable::B | Syllable::P | Syllable::F) {
                    medial = Syllable::U;
                }
                vowel = Syllable::ENG;
                matched_final = true;
            } else if consume(&mut rest, "un") {
                medial = if is_jqx(consonant) { Syllable::UE } else { Syllable::U };
                vowel = Syllable::EN;
                matched_final = true;
            }
        }

        if !matched_final {
            if consume(&mut rest, "i") {
                if !independent {
                    medial = Syllable::I;
                }
            } else if consume(&mut rest, "u") {
                medial = if is_jqx(consonant) { Syllable::UE } else { Syllable::U };
            } else if consume(&mut rest, "v") {
                medial = Syllable::UE;
            }

            if let Some((spelling, v)) = FINALS.iter().find(|(s, _)| rest.starts_with(s)) {
                rest = &rest[spelling.len()..];
                vowel = *v;
            } else if consume(&mut rest, "e") {
                vowel = if medial != 0 { Syllable::E } else { Syllable::ER };
            }
        }

        if !rest.is_empty() {
            return Syllable::empty();
        }

        Syllable::new(consonant | medial | vowel | tone)
    }

    /// Encode as Hanyu Pinyin. Tone 1 is never written; tones 2-5 become a
    /// trailing digit when `includes_tone` is set.
    pub fn hanyu_pinyin_string(&self, includes_tone: bool, use_v_for_u_umlaut: bool) -> String {
        let cc = self.consonant_component();
        let mvc = self.middle_vowel_component();
        let vc = self.vowel_component();
        let has_no_mvc_or_vc = mvc == 0 && vc == 0;

        let mut consonant = match cc {
            Syllable::B => "b",
            Syllable::P => "p",
            Syllable::M => "m",
            Syllable::F => "f",
            Syllable::D => "d",
            Syllable::T => "t",
            Syllable::N => "n",
            Syllable::L => "l",
            Syllable::G => "g",
            Syllable::K => "k",
            Syllable::H => "h",
            Syllable::J => "j",
            Syllable::Q => "q",
            Syllable::X => "x",
            Syllable::ZH => "zh",
            Syllable::CH => "ch",
            Syllable::SH => "sh",
            Syllable::R => "r",
            Syllable::Z => "z",
            Syllable::C => "c",
            Syllable::S => "s",
            _ => "",
        };

        let mut middle = "";
        if has_no_mvc_or_vc && self.belongs_to_zcsr_class() {
            middle = "i";
        }

        match mvc {
            Syllable::I => {
                if cc == 0 {
                    consonant = "y";
                }
                middle = if vc == 0 || cc != 0 { "i" } else { "" };
            }
            Syllable::U => {
                if cc == 0 {
                    consonant = "w";
                }
                middle = if vc == 0 || cc != 0 { "u" } else { "" };
            }
            Syllable::UE => {
                if cc == 0 {
                    consonant = "y";
                }
                middle = if matches!(cc, Syllable::N | Syllable::L) && vc != Syllable::E {
                    if use_v_for_u_umlaut {
                        "v"
                    } else {
                        "ü"
                    }
                } else {
                    "u"
                };
            }
            _ => {}
        }

        let mut vowel = match vc {
            Syllable::A => "a",
            Syllable::O => "o",
            Syllable::ER | Syllable::E => "e",
            Syllable::AI => "ai",
            Syllable::EI => "ei",
            Syllable::AO => "ao",
            Syllable::OU => "ou",
            Syllable::AN => "an",
            Syllable::EN => "en",
            Syllable::ANG => "ang",
            Syllable::ENG => "eng",
            Syllable::ERR => "er",
            _ => "",
        };

        // ueng/üeng -> ong, iong; bare "weng" keeps its spelling
        if (mvc == Syllable::U || mvc == Syllable::UE) && vc == Syllable::ENG {
            middle = "";
            vowel = if is_jqx(cc) {
                "iong"
            } else if cc == 0 && mvc == Syllable::U {
                "eng"
            } else {
                "ong"
            };
        }

        // ien, uen, üen -> in, un, ün; bare "wen" keeps its spelling
        if mvc != 0 && vc == Syllable::EN {
            if cc != 0 || mvc == Syllable::UE {
                vowel = "n";
            } else if mvc == Syllable::I {
                vowel = "in";
            }
        }

        if cc != 0 && mvc == Syllable::I && vc == Syllable::OU {
            middle = "";
            vowel = "iu";
        }

        if mvc == Syllable::I && vc == Syllable::ENG {
            middle = "";
            vowel = "ing";
        }

        if cc != 0 && mvc == Syllable::U && vc == Syllable::EI {
            middle = "";
            vowel = "ui";
        }

        let tone = if includes_tone {
            match self.tone_marker_component() {
                Syllable::TONE2 => "2",
                Syllable::TONE3 => "3",
                Syllable::TONE4 => "4",
                Syllable::TONE5 => "5",
                _ => "",
            }
        } else {
            ""
        };

        [consonant, middle, vowel, tone].concat()
    }
}

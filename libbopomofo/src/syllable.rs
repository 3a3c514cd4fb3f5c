//! Packed Bopomofo syllable.
//!
//! A syllable is a single `u16` made of four mutually exclusive bit-fields:
//!
//! ```text
//! 0011 1000 0000 0000  tone marker (5 tones, tone 1 = no bits)
//! 0000 0111 1000 0000  vowel / final (13 values)
//! 0000 0000 0110 0000  medial glide (ㄧ, ㄨ, ㄩ)
//! 0000 0000 0001 1111  consonant (21 values)
//! ```
//!
//! The medial ㄩ is encoded as `ㄧ | ㄨ` (0x60), so the medial field must
//! always be read and written as a whole.
//!
//! Conversions live next to the type:
//! - composed Bopomofo string (this module)
//! - Hanyu Pinyin (`crate::pinyin`)
//! - PHT phonetic letters (`crate::pht`)
//! - absolute order, a dense number used to compact persistence keys

use std::fmt;
use std::ops::{Add, AddAssign};

use phf::phf_map;

/// A single phonetic sub-component code, or any union of them.
pub type Component = u16;

/// One phonetic unit: consonant + medial + vowel + tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Syllable(Component);

/// Number of distinct absolute orders (22 * 4 * 14 * 5).
pub const ABSOLUTE_ORDER_SPACE: u16 = 6160;

const ORDER_RADIX: u16 = 79;
const ORDER_OFFSET: u16 = 48;

impl Syllable {
    pub const CONSONANT_MASK: Component = 0x001f;
    pub const MIDDLE_VOWEL_MASK: Component = 0x0060;
    pub const VOWEL_MASK: Component = 0x0780;
    pub const TONE_MARKER_MASK: Component = 0x3800;

    pub const B: Component = 0x0001;
    pub const P: Component = 0x0002;
    pub const M: Component = 0x0003;
    pub const F: Component = 0x0004;
    pub const D: Component = 0x0005;
    pub const T: Component = 0x0006;
    pub const N: Component = 0x0007;
    pub const L: Component = 0x0008;
    pub const G: Component = 0x0009;
    pub const K: Component = 0x000a;
    pub const H: Component = 0x000b;
    pub const J: Component = 0x000c;
    pub const Q: Component = 0x000d;
    pub const X: Component = 0x000e;
    pub const ZH: Component = 0x000f;
    pub const CH: Component = 0x0010;
    pub const SH: Component = 0x0011;
    pub const R: Component = 0x0012;
    pub const Z: Component = 0x0013;
    pub const C: Component = 0x0014;
    pub const S: Component = 0x0015;

    pub const I: Component = 0x0020;
    pub const U: Component = 0x0040;
    /// ü, written with the German convention.
    pub const UE: Component = 0x0060;

    pub const A: Component = 0x0080;
    pub const O: Component = 0x0100;
    /// ㄜ
    pub const ER: Component = 0x0180;
    /// ㄝ
    pub const E: Component = 0x0200;
    pub const AI: Component = 0x0280;
    pub const EI: Component = 0x0300;
    pub const AO: Component = 0x0380;
    pub const OU: Component = 0x0400;
    pub const AN: Component = 0x0480;
    pub const EN: Component = 0x0500;
    pub const ANG: Component = 0x0580;
    pub const ENG: Component = 0x0600;
    /// ㄦ
    pub const ERR: Component = 0x0680;

    pub const TONE1: Component = 0x0000;
    pub const TONE2: Component = 0x0800;
    pub const TONE3: Component = 0x1000;
    pub const TONE4: Component = 0x1800;
    pub const TONE5: Component = 0x2000;

    const FIELD_MASKS: [Component; 4] = [
        Self::CONSONANT_MASK,
        Self::MIDDLE_VOWEL_MASK,
        Self::VOWEL_MASK,
        Self::TONE_MARKER_MASK,
    ];

    /// Wrap a packed value.
    pub const fn new(packed: Component) -> Self {
        Syllable(packed)
    }

    /// The empty syllable.
    pub const fn empty() -> Self {
        Syllable(0)
    }

    /// The raw packed value.
    pub const fn packed(&self) -> Component {
        self.0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn has_consonant(&self) -> bool {
        self.0 & Self::CONSONANT_MASK != 0
    }

    pub const fn has_middle_vowel(&self) -> bool {
        self.0 & Self::MIDDLE_VOWEL_MASK != 0
    }

    pub const fn has_vowel(&self) -> bool {
        self.0 & Self::VOWEL_MASK != 0
    }

    pub const fn has_tone_marker(&self) -> bool {
        self.0 & Self::TONE_MARKER_MASK != 0
    }

    pub const fn consonant_component(&self) -> Component {
        self.0 & Self::CONSONANT_MASK
    }

    pub const fn middle_vowel_component(&self) -> Component {
        self.0 & Self::MIDDLE_VOWEL_MASK
    }

    pub const fn vowel_component(&self) -> Component {
        self.0 & Self::VOWEL_MASK
    }

    pub const fn tone_marker_component(&self) -> Component {
        self.0 & Self::TONE_MARKER_MASK
    }

    /// True if both syllables occupy at least one common field.
    pub fn is_overlapping_with(&self, other: &Syllable) -> bool {
        Self::FIELD_MASKS
            .iter()
            .any(|mask| self.0 & mask != 0 && other.0 & mask != 0)
    }

    /// Consonants ㄐㄑㄒ, which need a following ㄧ or ㄩ.
    pub fn belongs_to_jqx_class(&self) -> bool {
        matches!(self.consonant_component(), Self::J | Self::Q | Self::X)
    }

    /// Consonants ㄓㄔㄕㄖㄗㄘㄙ, which can stand without a vowel.
    pub fn belongs_to_zcsr_class(&self) -> bool {
        (Self::ZH..=Self::S).contains(&self.consonant_component())
    }

    /// Union of the masks of every occupied field.
    pub fn mask_type(&self) -> Component {
        Self::FIELD_MASKS
            .iter()
            .filter(|mask| self.0 & **mask != 0)
            .fold(0, |acc, mask| acc | mask)
    }

    /// Dense ordering number: consonant + medial*22 + vowel*88 + tone*1232.
    pub fn absolute_order(&self) -> u16 {
        self.consonant_component()
            + (self.middle_vowel_component() >> 5) * 22
            + (self.vowel_component() >> 7) * 22 * 4
            + (self.tone_marker_component() >> 11) * 22 * 4 * 14
    }

    /// Absolute order as two printable characters, low digit first.
    pub fn absolute_order_string(&self) -> String {
        let order = self.absolute_order();
        let low = (ORDER_OFFSET + order % ORDER_RADIX) as u8 as char;
        let high = (ORDER_OFFSET + order / ORDER_RADIX) as u8 as char;
        [low, high].iter().collect()
    }

    pub fn from_absolute_order(order: u16) -> Syllable {
        if order >= ABSOLUTE_ORDER_SPACE {
            return Syllable::empty();
        }
        Syllable(
            (order % 22)
                | ((order / 22) % 4) << 5
                | ((order / (22 * 4)) % 14) << 7
                | ((order / (22 * 4 * 14)) % 5) << 11,
        )
    }

    /// Inverse of [`Syllable::absolute_order_string`]. Anything that is not
    /// exactly two in-range digit characters decodes to the empty syllable.
    pub fn from_absolute_order_string(s: &str) -> Syllable {
        let mut chars = s.chars();
        let (Some(low), Some(high), None) = (chars.next(), chars.next(), chars.next()) else {
            return Syllable::empty();
        };
        let digit = |c: char| -> Option<u16> {
            let v = (c as u32).checked_sub(ORDER_OFFSET as u32)?;
            (v < ORDER_RADIX as u32).then_some(v as u16)
        };
        match (digit(low), digit(high)) {
            (Some(l), Some(h)) => Syllable::from_absolute_order(h * ORDER_RADIX + l),
            _ => Syllable::empty(),
        }
    }

    /// Bopomofo display string: consonant, medial, vowel, tone mark.
    pub fn composed_string(&self) -> String {
        [
            self.consonant_component(),
            self.middle_vowel_component(),
            self.vowel_component(),
            self.tone_marker_component(),
        ]
        .into_iter()
        .filter_map(component_char)
        .collect()
    }

    /// Parse a composed Bopomofo string. Unknown characters yield empty.
    pub fn from_composed_string(s: &str) -> Syllable {
        let normalized = libbopomofo_core::utils::normalize(s);
        let mut syllable = Syllable::empty();
        for ch in normalized.chars() {
            match COMPOSED_CHARS.get(&ch) {
                Some(component) => syllable += Syllable(*component),
                None => return Syllable::empty(),
            }
        }
        syllable
    }
}

impl From<Component> for Syllable {
    fn from(packed: Component) -> Self {
        Syllable(packed)
    }
}

impl Add for Syllable {
    type Output = Syllable;

    /// Fields present on the right replace the same fields on the left.
    fn add(self, rhs: Syllable) -> Syllable {
        let mut out = self;
        out += rhs;
        out
    }
}

impl AddAssign for Syllable {
    fn add_assign(&mut self, rhs: Syllable) {
        for mask in Self::FIELD_MASKS {
            if rhs.0 & mask != 0 {
                self.0 = (self.0 & !mask) | (rhs.0 & mask);
            }
        }
    }
}

impl fmt::Display for Syllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.composed_string())
    }
}

static COMPOSED_CHARS: phf::Map<char, Component> = phf_map! {
    'ㄅ' => Syllable::B, 'ㄆ' => Syllable::P, 'ㄇ' => Syllable::M, 'ㄈ' => Syllable::F,
    'ㄉ' => Syllable::D, 'ㄊ' => Syllable::T, 'ㄋ' => Syllable::N, 'ㄌ' => Syllable::L,
    'ㄍ' => Syllable::G, 'ㄎ' => Syllable::K, 'ㄏ' => Syllable::H,
    'ㄐ' => Syllable::J, 'ㄑ' => Syllable::Q, 'ㄒ' => Syllable::X,
    'ㄓ' => Syllable::ZH, 'ㄔ' => Syllable::CH, 'ㄕ' => Syllable::SH, 'ㄖ' => Syllable::R,
    'ㄗ' => Syllable::Z, 'ㄘ' => Syllable::C, 'ㄙ' => Syllable::S,
    'ㄧ' => Syllable::I, 'ㄨ' => Syllable::U, 'ㄩ' => Syllable::UE,
    'ㄚ' => Syllable::A, 'ㄛ' => Syllable::O, 'ㄜ' => Syllable::ER, 'ㄝ' => Syllable::E,
    'ㄞ' => Syllable::AI, 'ㄟ' => Syllable::EI, 'ㄠ' => Syllable::AO, 'ㄡ' => Syllable::OU,
    'ㄢ' => Syllable::AN, 'ㄣ' => Syllable::EN, 'ㄤ' => Syllable::ANG, 'ㄥ' => Syllable::ENG,
    'ㄦ' => Syllable::ERR,
    'ˉ' => Syllable::TONE1, 'ˊ' => Syllable::TONE2, 'ˇ' => Syllable::TONE3,
    'ˋ' => Syllable::TONE4, '˙' => Syllable::TONE5,
};

/// Display character of a single isolated component (tone 1 has none).
fn component_char(component: Component) -> Option<char> {
    let ch = match component {
        Syllable::B => 'ㄅ',
        Syllable::P => 'ㄆ',
        Syllable::M => 'ㄇ',
        Syllable::F => 'ㄈ',
        Syllable::D => 'ㄉ',
        Syllable::T => 'ㄊ',
        Syllable::N => 'ㄋ',
        Syllable::L => 'ㄌ',
        Syllable::G => 'ㄍ',
        Syllable::K => 'ㄎ',
        Syllable::H => 'ㄏ',
        Syllable::J => 'ㄐ',
        Syllable::Q => 'ㄑ',
        Syllable::X => 'ㄒ',
        Syllable::ZH => 'ㄓ',
        Syllable::CH => 'ㄔ',
        Syllable::SH => 'ㄕ',
        Syllable::R => 'ㄖ',
        Syllable::Z => 'ㄗ',
        Syllable::C => 'ㄘ',
        Syllable::S => 'ㄙ',
        Syllable::I => 'ㄧ',
        Syllable::U => 'ㄨ',
        Syllable::UE => 'ㄩ',
        Syllable::A => 'ㄚ',
        Syllable::O => 'ㄛ',
        Syllable::ER => 'ㄜ',
        Syllable::E => 'ㄝ',
        Syllable::AI => 'ㄞ',
        Syllable::EI => 'ㄟ',
        Syllable::AO => 'ㄠ',
        Syllable::OU => 'ㄡ',
        Syllable::AN => 'ㄢ',
        Syllable::EN => 'ㄣ',
        Syllable::ANG => 'ㄤ',
        Syllable::ENG => 'ㄥ',
        Syllable::ERR => 'ㄦ',
        Syllable::TONE2 => 'ˊ',
        Syllable::TONE3 => 'ˇ',
        Syllable::TONE4 => 'ˋ',
        Syllable::TONE5 => '˙',
        _ => return None,
    };
    Some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_by_default() {
        let s = Syllable::default();
        assert!(s.is_empty());
        assert_eq!(s.composed_string(), "");
        assert_eq!(s.mask_type(), 0);
    }

    #[test]
    fn field_accessors_isolate_each_field() {
        let s = Syllable::new(Syllable::ZH | Syllable::UE | Syllable::ANG | Syllable::TONE4);
        assert_eq!(s.consonant_component(), Syllable::ZH);
        assert_eq!(s.middle_vowel_component(), Syllable::UE);
        assert_eq!(s.vowel_component(), Syllable::ANG);
        assert_eq!(s.tone_marker_component(), Syllable::TONE4);
        assert!(s.has_consonant() && s.has_middle_vowel() && s.has_vowel() && s.has_tone_marker());
    }

    #[test]
    fn combine_overrides_only_present_fields() {
        let base = Syllable::new(Syllable::N | Syllable::I | Syllable::AO);
        let toned = base + Syllable::new(Syllable::TONE3);
        assert_eq!(toned.consonant_component(), Syllable::N);
        assert_eq!(toned.middle_vowel_component(), Syllable::I);
        assert_eq!(toned.vowel_component(), Syllable::AO);
        assert_eq!(toned.tone_marker_component(), Syllable::TONE3);

        // ㄩ replaces ㄧ wholesale instead of or-ing bits into it
        let mut s = Syllable::new(Syllable::I);
        s += Syllable::new(Syllable::U);
        assert_eq!(s.middle_vowel_component(), Syllable::U);
    }

    #[test]
    fn overlap_and_mask_type() {
        let a = Syllable::new(Syllable::B | Syllable::A);
        let b = Syllable::new(Syllable::I | Syllable::AN);
        let c = Syllable::new(Syllable::TONE2);
        assert!(a.is_overlapping_with(&b));
        assert!(!a.is_overlapping_with(&c));
        assert_eq!(a.mask_type(), Syllable::CONSONANT_MASK | Syllable::VOWEL_MASK);
    }

    #[test]
    fn consonant_classes() {
        assert!(Syllable::new(Syllable::Q).belongs_to_jqx_class());
        assert!(!Syllable::new(Syllable::ZH).belongs_to_jqx_class());
        assert!(Syllable::new(Syllable::ZH).belongs_to_zcsr_class());
        assert!(Syllable::new(Syllable::S).belongs_to_zcsr_class());
        assert!(!Syllable::new(Syllable::X).belongs_to_zcsr_class());
    }

    #[test]
    fn composed_string_round_trip() {
        let s = Syllable::new(Syllable::X | Syllable::I | Syllable::ANG | Syllable::TONE3);
        assert_eq!(s.composed_string(), "ㄒㄧㄤˇ");
        assert_eq!(Syllable::from_composed_string("ㄒㄧㄤˇ"), s);
        assert_eq!(s.to_string(), "ㄒㄧㄤˇ");
    }

    #[test]
    fn composed_string_tone1_mark_and_garbage() {
        assert_eq!(
            Syllable::from_composed_string("ㄇㄚˉ"),
            Syllable::new(Syllable::M | Syllable::A)
        );
        assert!(Syllable::from_composed_string("ㄇa").is_empty());
        assert!(Syllable::from_composed_string("").is_empty());
    }

    #[test]
    fn absolute_order_extremes() {
        let max = Syllable::new(Syllable::S | Syllable::UE | Syllable::ERR | Syllable::TONE5);
        assert_eq!(max.absolute_order(), ABSOLUTE_ORDER_SPACE - 1);
        assert_eq!(Syllable::from_absolute_order(max.absolute_order()), max);
        assert!(Syllable::from_absolute_order(ABSOLUTE_ORDER_SPACE).is_empty());
        assert_eq!(Syllable::empty().absolute_order_string(), "00");
    }

    #[test]
    fn absolute_order_string_rejects_malformed() {
        assert!(Syllable::from_absolute_order_string("0").is_empty());
        assert!(Syllable::from_absolute_order_string("000").is_empty());
        assert!(Syllable::from_absolute_order_string(" 0").is_empty());
        // '~' is the largest digit, but 78 * 79 lies past the order space
        assert!(Syllable::from_absolute_order_string("0~").is_empty());
        assert!(Syllable::from_absolute_order_string("0\u{7f}").is_empty());
    }

    #[test]
    fn absolute_order_string_round_trip() {
        let s = Syllable::new(Syllable::D | Syllable::U | Syllable::O | Syllable::TONE4);
        let encoded = s.absolute_order_string();
        assert_eq!(encoded.chars().count(), 2);
        assert_eq!(Syllable::from_absolute_order_string(&encoded), s);
    }
}

//! Bopomofo keyboard layouts.
//!
//! A layout maps each physical key to one or more phonetic components. In
//! the Standard, ETen and IBM layouts every key carries exactly one
//! component; Hsu and ETen26 squeeze 37 symbols and 4 tone marks onto the 26
//! letter keys, so a key can stand for up to three components and the
//! meaning of a keystroke depends on its neighbours.
//! [`KeyboardLayout::syllable_from_key_sequence`] resolves that ambiguity.
//!
//! Layouts are immutable. [`LayoutRegistry`] builds all of them once and
//! hands out shared handles.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::syllable::{Component, Syllable};

/// Identifies one of the pre-built layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Standard,
    #[serde(rename = "eten")]
    ETen,
    Hsu,
    #[serde(rename = "eten26")]
    ETen26,
    Ibm,
    /// No keys at all: a reading buffer on this layout reads Hanyu Pinyin
    /// letters directly.
    #[serde(rename = "hanyupinyin")]
    HanyuPinyin,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 6] = [
        LayoutKind::Standard,
        LayoutKind::ETen,
        LayoutKind::Hsu,
        LayoutKind::ETen26,
        LayoutKind::Ibm,
        LayoutKind::HanyuPinyin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::Standard => "standard",
            LayoutKind::ETen => "eten",
            LayoutKind::Hsu => "hsu",
            LayoutKind::ETen26 => "eten26",
            LayoutKind::Ibm => "ibm",
            LayoutKind::HanyuPinyin => "hanyupinyin",
        }
    }

    /// Position in [`LayoutKind::ALL`].
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown keyboard layout: {0}")]
pub struct UnknownLayout(pub String);

impl FromStr for LayoutKind {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        LayoutKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lowered)
            .ok_or_else(|| UnknownLayout(s.to_string()))
    }
}

/// Immutable key <-> component mapping for one layout.
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    kind: LayoutKind,
    name: String,
    key_to_components: BTreeMap<char, Vec<Component>>,
    component_to_key: HashMap<Component, char>,
}

impl KeyboardLayout {
    /// Build a layout from its key table. The reverse map is derived here;
    /// when two keys carry the same component the later key (in key order)
    /// wins.
    pub fn new<N: Into<String>>(
        kind: LayoutKind,
        name: N,
        key_to_components: BTreeMap<char, Vec<Component>>,
    ) -> Self {
        let mut component_to_key = HashMap::new();
        for (key, components) in &key_to_components {
            for component in components {
                component_to_key.insert(*component, *key);
            }
        }
        Self {
            kind,
            name: name.into(),
            key_to_components,
            component_to_key,
        }
    }

    fn from_table(kind: LayoutKind, table: &[(char, &[Component])]) -> Self {
        let map = table
            .iter()
            .map(|(key, components)| (*key, components.to_vec()))
            .collect();
        Self::new(kind, kind.name(), map)
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn component_to_key(&self, component: Component) -> Option<char> {
        self.component_to_key.get(&component).copied()
    }

    /// Candidate components for a key; empty when the key is unmapped.
    pub fn key_to_components(&self, key: char) -> &[Component] {
        self.key_to_components
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Canonical keys for a syllable: consonant, medial, vowel, tone.
    /// Fields that are empty or not on this layout are skipped.
    pub fn key_sequence_from_syllable(&self, syllable: Syllable) -> String {
        [
            syllable.consonant_component(),
            syllable.middle_vowel_component(),
            syllable.vowel_component(),
            syllable.tone_marker_component(),
        ]
        .into_iter()
        .filter(|component| *component != 0)
        .filter_map(|component| self.component_to_key(component))
        .collect()
    }

    /// Rebuild the syllable a key sequence denotes on this layout.
    pub fn syllable_from_key_sequence(&self, sequence: &str) -> Syllable {
        let keys: Vec<char> = sequence.chars().collect();
        let mut syllable = Syllable::empty();

        for (index, &key) in keys.iter().enumerate() {
            let before = &keys[..index];
            let ahead = &keys[index + 1..];

            let components = self.key_to_components(key);
            match components {
                [] => continue,
                [only] => {
                    syllable += Syllable::new(*only);
                    continue;
                }
                _ => {}
            }

            let head = Syllable::new(components[0]);
            let follow = Syllable::new(components[1]);
            let ending = components.get(2).map(|c| Syllable::new(*c)).unwrap_or(follow);

            // ㄝ only follows ㄧ or ㄩ
            let head_is_e = head.vowel_component() == Syllable::E;
            let follow_is_e = follow.vowel_component() == Syllable::E;
            if head_is_e != follow_is_e {
                let prefer_e = self.sequence_contains_i_or_ue(before);
                syllable += match (head_is_e, prefer_e) {
                    (true, true) | (false, false) => head,
                    _ => follow,
                };
                continue;
            }

            // ㄐㄑㄒ need a following ㄧ or ㄩ
            let head_is_jqx = head.belongs_to_jqx_class();
            if head_is_jqx != follow.belongs_to_jqx_class() {
                if !syllable.is_empty() {
                    if ending != follow {
                        syllable += ending;
                    }
                } else {
                    let ahead_has_i_or_ue = self.sequence_contains_i_or_ue(ahead);
                    syllable += if head_is_jqx == ahead_has_i_or_ue {
                        head
                    } else {
                        follow
                    };
                }
                continue;
            }

            if before.is_empty() && ahead.is_empty() {
                syllable += Self::resolve_lone_key(head, follow, ending);
                continue;
            }

            let tone_ahead = self.end_ahead_or_ahead_has_tone_mark_key(ahead);
            if syllable.mask_type() & head.mask_type() == 0 && !tone_ahead {
                syllable += head;
            } else if tone_ahead && head.belongs_to_zcsr_class() && syllable.is_empty() {
                syllable += head;
            } else if syllable.mask_type() < follow.mask_type() {
                syllable += follow;
            } else {
                syllable += ending;
            }
        }

        if self.kind == LayoutKind::Hsu {
            syllable = apply_hsu_corrections(syllable);
        }

        tracing::trace!(layout = %self.name, sequence, syllable = %syllable, "resolved key sequence");
        syllable
    }

    /// A single ambiguous key with nothing around it.
    fn resolve_lone_key(head: Syllable, follow: Syllable, ending: Syllable) -> Syllable {
        if head.has_vowel() || follow.has_tone_marker() || head.belongs_to_zcsr_class() {
            head
        } else if follow.has_vowel() || ending.has_tone_marker() {
            follow
        } else {
            ending
        }
    }

    /// True when `ahead` is empty or starts with a tone key.
    fn end_ahead_or_ahead_has_tone_mark_key(&self, ahead: &[char]) -> bool {
        let Some(next) = ahead.first() else {
            return true;
        };
        [
            Syllable::TONE1,
            Syllable::TONE2,
            Syllable::TONE3,
            Syllable::TONE4,
            Syllable::TONE5,
        ]
        .into_iter()
        .filter_map(|tone| self.component_to_key(tone))
        .any(|tone_key| tone_key == *next)
    }

    fn sequence_contains_i_or_ue(&self, keys: &[char]) -> bool {
        let i_key = self.component_to_key(Syllable::I);
        let ue_key = self.component_to_key(Syllable::UE);
        keys.iter()
            .any(|key| Some(*key) == i_key || Some(*key) == ue_key)
    }

    pub fn standard() -> Self {
        Self::from_table(LayoutKind::Standard, STANDARD_KEYS)
    }

    pub fn eten() -> Self {
        Self::from_table(LayoutKind::ETen, ETEN_KEYS)
    }

    pub fn hsu() -> Self {
        Self::from_table(LayoutKind::Hsu, HSU_KEYS)
    }

    pub fn eten26() -> Self {
        Self::from_table(LayoutKind::ETen26, ETEN26_KEYS)
    }

    pub fn ibm() -> Self {
        Self::from_table(LayoutKind::Ibm, IBM_KEYS)
    }

    pub fn hanyu_pinyin() -> Self {
        Self::from_table(LayoutKind::HanyuPinyin, &[])
    }

    pub fn for_kind(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::Standard => Self::standard(),
            LayoutKind::ETen => Self::eten(),
            LayoutKind::Hsu => Self::hsu(),
            LayoutKind::ETen26 => Self::eten26(),
            LayoutKind::Ibm => Self::ibm(),
            LayoutKind::HanyuPinyin => Self::hanyu_pinyin(),
        }
    }
}

/// Hsu puts ㄌㄥㄦ on one key and reads `g` before ㄧ/ㄩ as ㄐ; the general
/// algorithm cannot see either, so these two fixes run after it.
///
/// - a lone ㄥ (no consonant, no medial) becomes ㄦ
/// - ㄍ followed by ㄧ or ㄩ becomes ㄐ
pub fn apply_hsu_corrections(syllable: Syllable) -> Syllable {
    if syllable.vowel_component() == Syllable::ENG
        && !syllable.has_consonant()
        && !syllable.has_middle_vowel()
    {
        syllable + Syllable::new(Syllable::ERR)
    } else if syllable.consonant_component() == Syllable::G
        && matches!(syllable.middle_vowel_component(), Syllable::I | Syllable::UE)
    {
        syllable + Syllable::new(Syllable::J)
    } else {
        syllable
    }
}

/// All pre-built layouts, constructed eagerly and shared read-only.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    layouts: [Arc<KeyboardLayout>; LayoutKind::ALL.len()],
}

impl LayoutRegistry {
    pub fn new() -> Self {
        let layouts = LayoutKind::ALL.map(|kind| Arc::new(KeyboardLayout::for_kind(kind)));
        Self { layouts }
    }

    pub fn get(&self, kind: LayoutKind) -> Arc<KeyboardLayout> {
        Arc::clone(&self.layouts[kind.index()])
    }

    pub fn by_name(&self, name: &str) -> Result<Arc<KeyboardLayout>, UnknownLayout> {
        Ok(self.get(name.parse()?))
    }

    pub fn standard(&self) -> Arc<KeyboardLayout> {
        self.get(LayoutKind::Standard)
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

type KeyTable = &'static [(char, &'static [Component])];

// 大千
const STANDARD_KEYS: KeyTable = &[
    ('1', &[Syllable::B]),
    ('q', &[Syllable::P]),
    ('a', &[Syllable::M]),
    ('z', &[Syllable::F]),
    ('2', &[Syllable::D]),
    ('w', &[Syllable::T]),
    ('s', &[Syllable::N]),
    ('x', &[Syllable::L]),
    ('e', &[Syllable::G]),
    ('d', &[Syllable::K]),
    ('c', &[Syllable::H]),
    ('r', &[Syllable::J]),
    ('f', &[Syllable::Q]),
    ('v', &[Syllable::X]),
    ('5', &[Syllable::ZH]),
    ('t', &[Syllable::CH]),
    ('g', &[Syllable::SH]),
    ('b', &[Syllable::R]),
    ('y', &[Syllable::Z]),
    ('h', &[Syllable::C]),
    ('n', &[Syllable::S]),
    ('u', &[Syllable::I]),
    ('j', &[Syllable::U]),
    ('m', &[Syllable::UE]),
    ('8', &[Syllable::A]),
    ('i', &[Syllable::O]),
    ('k', &[Syllable::ER]),
    (',', &[Syllable::E]),
    ('9', &[Syllable::AI]),
    ('o', &[Syllable::EI]),
    ('l', &[Syllable::AO]),
    ('.', &[Syllable::OU]),
    ('0', &[Syllable::AN]),
    ('p', &[Syllable::EN]),
    (';', &[Syllable::ANG]),
    ('/', &[Syllable::ENG]),
    ('-', &[Syllable::ERR]),
    (' ', &[Syllable::TONE1]),
    ('6', &[Syllable::TONE2]),
    ('3', &[Syllable::TONE3]),
    ('4', &[Syllable::TONE4]),
    ('7', &[Syllable::TONE5]),
];

// 倚天
const ETEN_KEYS: KeyTable = &[
    ('b', &[Syllable::B]),
    ('p', &[Syllable::P]),
    ('m', &[Syllable::M]),
    ('f', &[Syllable::F]),
    ('d', &[Syllable::D]),
    ('t', &[Syllable::T]),
    ('n', &[Syllable::N]),
    ('l', &[Syllable::L]),
    ('v', &[Syllable::G]),
    ('k', &[Syllable::K]),
    ('h', &[Syllable::H]),
    ('g', &[Syllable::J]),
    ('7', &[Syllable::Q]),
    ('c', &[Syllable::X]),
    (',', &[Syllable::ZH]),
    ('.', &[Syllable::CH]),
    ('/', &[Syllable::SH]),
    ('j', &[Syllable::R]),
    (';', &[Syllable::Z]),
    ('\'', &[Syllable::C]),
    ('s', &[Syllable::S]),
    ('e', &[Syllable::I]),
    ('x', &[Syllable::U]),
    ('u', &[Syllable::UE]),
    ('a', &[Syllable::A]),
    ('o', &[Syllable::O]),
    ('r', &[Syllable::ER]),
    ('w', &[Syllable::E]),
    ('i', &[Syllable::AI]),
    ('q', &[Syllable::EI]),
    ('z', &[Syllable::AO]),
    ('y', &[Syllable::OU]),
    ('8', &[Syllable::AN]),
    ('9', &[Syllable::EN]),
    ('0', &[Syllable::ANG]),
    ('-', &[Syllable::ENG]),
    ('=', &[Syllable::ERR]),
    (' ', &[Syllable::TONE1]),
    ('2', &[Syllable::TONE2]),
    ('3', &[Syllable::TONE3]),
    ('4', &[Syllable::TONE4]),
    ('1', &[Syllable::TONE5]),
];

// 許氏
const HSU_KEYS: KeyTable = &[
    ('b', &[Syllable::B]),
    ('p', &[Syllable::P]),
    ('m', &[Syllable::M, Syllable::AN]),
    ('f', &[Syllable::F, Syllable::TONE3]),
    ('d', &[Syllable::D, Syllable::TONE2]),
    ('t', &[Syllable::T]),
    ('n', &[Syllable::N, Syllable::EN]),
    ('l', &[Syllable::L, Syllable::ENG, Syllable::ERR]),
    ('g', &[Syllable::G, Syllable::ER]),
    ('k', &[Syllable::K, Syllable::ANG]),
    ('h', &[Syllable::H, Syllable::O]),
    ('j', &[Syllable::J, Syllable::ZH, Syllable::TONE4]),
    ('v', &[Syllable::Q, Syllable::CH]),
    ('c', &[Syllable::X, Syllable::SH]),
    ('r', &[Syllable::R]),
    ('z', &[Syllable::Z]),
    ('a', &[Syllable::C, Syllable::EI]),
    ('s', &[Syllable::S, Syllable::TONE5]),
    ('e', &[Syllable::I, Syllable::E]),
    ('x', &[Syllable::U]),
    ('u', &[Syllable::UE]),
    ('y', &[Syllable::A]),
    ('i', &[Syllable::AI]),
    ('w', &[Syllable::AO]),
    ('o', &[Syllable::OU]),
    (' ', &[Syllable::TONE1]),
];

// 倚天26鍵
const ETEN26_KEYS: KeyTable = &[
    ('b', &[Syllable::B]),
    ('p', &[Syllable::P, Syllable::OU]),
    ('m', &[Syllable::M, Syllable::AN]),
    ('f', &[Syllable::F, Syllable::TONE2]),
    ('d', &[Syllable::D, Syllable::TONE5]),
    ('t', &[Syllable::T, Syllable::ANG]),
    ('n', &[Syllable::N, Syllable::EN]),
    ('l', &[Syllable::L, Syllable::ENG]),
    ('v', &[Syllable::G, Syllable::Q]),
    ('k', &[Syllable::K, Syllable::TONE4]),
    ('h', &[Syllable::H, Syllable::ERR]),
    ('g', &[Syllable::ZH, Syllable::J]),
    ('c', &[Syllable::SH, Syllable::X]),
    ('y', &[Syllable::CH]),
    ('j', &[Syllable::R, Syllable::TONE3]),
    ('q', &[Syllable::Z, Syllable::EI]),
    ('w', &[Syllable::C, Syllable::E]),
    ('s', &[Syllable::S]),
    ('e', &[Syllable::I]),
    ('x', &[Syllable::U]),
    ('u', &[Syllable::UE]),
    ('a', &[Syllable::A]),
    ('o', &[Syllable::O]),
    ('r', &[Syllable::ER]),
    ('i', &[Syllable::AI]),
    ('z', &[Syllable::AO]),
    (' ', &[Syllable::TONE1]),
];

const IBM_KEYS: KeyTable = &[
    ('1', &[Syllable::B]),
    ('2', &[Syllable::P]),
    ('3', &[Syllable::M]),
    ('4', &[Syllable::F]),
    ('5', &[Syllable::D]),
    ('6', &[Syllable::T]),
    ('7', &[Syllable::N]),
    ('8', &[Syllable::L]),
    ('9', &[Syllable::G]),
    ('0', &[Syllable::K]),
    ('-', &[Syllable::H]),
    ('q', &[Syllable::J]),
    ('w', &[Syllable::Q]),
    ('e', &[Syllable::X]),
    ('r', &[Syllable::ZH]),
    ('t', &[Syllable::CH]),
    ('y', &[Syllable::SH]),
    ('u', &[Syllable::R]),
    ('i', &[Syllable::Z]),
    ('o', &[Syllable::C]),
    ('p', &[Syllable::S]),
    ('a', &[Syllable::I]),
    ('s', &[Syllable::U]),
    ('d', &[Syllable::UE]),
    ('f', &[Syllable::A]),
    ('g', &[Syllable::O]),
    ('h', &[Syllable::ER]),
    ('j', &[Syllable::E]),
    ('k', &[Syllable::AI]),
    ('l', &[Syllable::EI]),
    (';', &[Syllable::AO]),
    ('z', &[Syllable::OU]),
    ('x', &[Syllable::AN]),
    ('c', &[Syllable::EN]),
    ('v', &[Syllable::ANG]),
    ('b', &[Syllable::ENG]),
    ('n', &[Syllable::ERR]),
    (' ', &[Syllable::TONE1]),
    ('m', &[Syllable::TONE2]),
    (',', &[Syllable::TONE3]),
    ('.', &[Syllable::TONE4]),
    ('/', &[Syllable::TONE5]),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn bpmf(s: &str) -> Syllable {
        Syllable::from_composed_string(s)
    }

    #[test]
    fn layout_kind_parses_names() {
        assert_eq!("Hsu".parse::<LayoutKind>(), Ok(LayoutKind::Hsu));
        assert_eq!("eten26".parse::<LayoutKind>(), Ok(LayoutKind::ETen26));
        assert!("dvorak".parse::<LayoutKind>().is_err());
        for kind in LayoutKind::ALL {
            assert_eq!(kind.name().parse::<LayoutKind>(), Ok(kind));
        }
    }

    #[test]
    fn reverse_map_is_derived() {
        let layout = KeyboardLayout::standard();
        assert_eq!(layout.component_to_key(Syllable::B), Some('1'));
        assert_eq!(layout.component_to_key(Syllable::TONE3), Some('3'));
        assert_eq!(layout.key_to_components('u'), &[Syllable::I]);
        assert!(layout.key_to_components('`').is_empty());
    }

    #[test]
    fn key_sequence_skips_unmapped_fields() {
        let layout = KeyboardLayout::standard();
        assert_eq!(layout.key_sequence_from_syllable(bpmf("ㄋㄧˇ")), "su3");
        assert_eq!(layout.key_sequence_from_syllable(Syllable::empty()), "");
        assert_eq!(KeyboardLayout::hanyu_pinyin().key_sequence_from_syllable(bpmf("ㄋㄧˇ")), "");
    }

    #[test]
    fn unambiguous_layouts_merge_in_any_order() {
        let layout = KeyboardLayout::standard();
        assert_eq!(layout.syllable_from_key_sequence("su3"), bpmf("ㄋㄧˇ"));
        assert_eq!(layout.syllable_from_key_sequence("3us"), bpmf("ㄋㄧˇ"));
        assert_eq!(layout.syllable_from_key_sequence("s`u"), bpmf("ㄋㄧ"));
    }

    #[test]
    fn hsu_e_follows_i_or_ue() {
        let hsu = KeyboardLayout::hsu();
        assert_eq!(hsu.syllable_from_key_sequence("e"), bpmf("ㄧ"));
        assert_eq!(hsu.syllable_from_key_sequence("ee"), bpmf("ㄧㄝ"));
        assert_eq!(hsu.syllable_from_key_sequence("ue"), bpmf("ㄩㄝ"));
    }

    #[test]
    fn hsu_palatal_depends_on_following_i() {
        let hsu = KeyboardLayout::hsu();
        assert_eq!(hsu.syllable_from_key_sequence("cek"), bpmf("ㄒㄧㄤ"));
        assert_eq!(hsu.syllable_from_key_sequence("cekf"), bpmf("ㄒㄧㄤˇ"));
        assert_eq!(hsu.syllable_from_key_sequence("c"), bpmf("ㄕ"));
        assert_eq!(hsu.syllable_from_key_sequence("j"), bpmf("ㄓ"));
        assert_eq!(hsu.syllable_from_key_sequence("jd"), bpmf("ㄓˊ"));
        // once something is composed, the third reading of `j` is the tone
        assert_eq!(hsu.syllable_from_key_sequence("ej"), bpmf("ㄧˋ"));
    }

    #[test]
    fn hsu_lone_keys() {
        let hsu = KeyboardLayout::hsu();
        assert_eq!(hsu.syllable_from_key_sequence("g"), bpmf("ㄜ"));
        assert_eq!(hsu.syllable_from_key_sequence("a"), bpmf("ㄘ"));
        assert_eq!(hsu.syllable_from_key_sequence("m"), bpmf("ㄢ"));
        assert_eq!(hsu.syllable_from_key_sequence("gx"), bpmf("ㄍㄨ"));
    }

    #[test]
    fn hsu_corrections() {
        let hsu = KeyboardLayout::hsu();
        assert_eq!(hsu.syllable_from_key_sequence("l"), bpmf("ㄦ"));
        assert_eq!(hsu.syllable_from_key_sequence("ge"), bpmf("ㄐㄧ"));

        assert_eq!(apply_hsu_corrections(bpmf("ㄥ")), bpmf("ㄦ"));
        assert_eq!(apply_hsu_corrections(bpmf("ㄥˋ")), bpmf("ㄦˋ"));
        assert_eq!(apply_hsu_corrections(bpmf("ㄍㄩ")), bpmf("ㄐㄩ"));
        assert_eq!(apply_hsu_corrections(bpmf("ㄍㄨ")), bpmf("ㄍㄨ"));
        assert_eq!(apply_hsu_corrections(bpmf("ㄌㄥ")), bpmf("ㄌㄥ"));
    }

    #[test]
    fn corrections_only_apply_to_hsu() {
        // ETen26 reads `l` alone as ㄥ and leaves it alone
        assert_eq!(KeyboardLayout::eten26().syllable_from_key_sequence("l"), bpmf("ㄥ"));
    }

    #[test]
    fn eten26_ambiguous_keys() {
        let eten26 = KeyboardLayout::eten26();
        assert_eq!(eten26.syllable_from_key_sequence("ve"), bpmf("ㄑㄧ"));
        assert_eq!(eten26.syllable_from_key_sequence("vx"), bpmf("ㄍㄨ"));
        assert_eq!(eten26.syllable_from_key_sequence("gu"), bpmf("ㄐㄩ"));
        assert_eq!(eten26.syllable_from_key_sequence("g"), bpmf("ㄓ"));
        assert_eq!(eten26.syllable_from_key_sequence("m"), bpmf("ㄢ"));
        assert_eq!(eten26.syllable_from_key_sequence("ma"), bpmf("ㄇㄚ"));
        assert_eq!(eten26.syllable_from_key_sequence("maf"), bpmf("ㄇㄚˊ"));
        assert_eq!(eten26.syllable_from_key_sequence("q"), bpmf("ㄗ"));
        assert_eq!(eten26.syllable_from_key_sequence("w"), bpmf("ㄘ"));
        assert_eq!(eten26.syllable_from_key_sequence("ew"), bpmf("ㄧㄝ"));
    }

    #[test]
    fn equal_mask_takes_last_candidate() {
        // accumulator ㄇㄚ sorts above ㄢ's vowel mask, so the ending (here
        // the same as the second candidate) replaces the vowel
        let eten26 = KeyboardLayout::eten26();
        assert_eq!(eten26.syllable_from_key_sequence("mam"), bpmf("ㄇㄢ"));
        // Hsu `l` after a vowel: the third candidate ㄦ replaces it
        let hsu = KeyboardLayout::hsu();
        assert_eq!(hsu.syllable_from_key_sequence("yl"), bpmf("ㄦ"));
        // after a bare consonant the second candidate is enough
        assert_eq!(hsu.syllable_from_key_sequence("ll"), bpmf("ㄌㄥ"));
    }

    #[test]
    fn registry_hands_out_shared_layouts() {
        let registry = LayoutRegistry::new();
        let a = registry.get(LayoutKind::Hsu);
        let b = registry.by_name("hsu").expect("hsu exists");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.standard().kind(), LayoutKind::Standard);
        assert!(registry.by_name("nope").is_err());
    }

    #[test]
    fn registry_covers_every_kind_in_order() {
        let registry = LayoutRegistry::new();
        for (index, kind) in LayoutKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), index);
            assert_eq!(registry.get(kind).kind(), kind);
            assert!(Arc::ptr_eq(&registry.get(kind), &registry.get(kind)));
        }
        assert_eq!(LayoutKind::default(), LayoutKind::Standard);
    }
}

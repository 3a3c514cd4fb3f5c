//! Layout scenarios typed through the canonical key sequence
//!
//! For the ambiguous layouts (Hsu, ETen26) a syllable's canonical keys are
//! typed one at a time through a reading buffer, the way an input session
//! sees them, and must come back as the same syllable.

use libbopomofo::{LayoutKind, LayoutRegistry, ReadingBuffer, Syllable};

fn type_syllable(registry: &LayoutRegistry, kind: LayoutKind, bopomofo: &str) -> (String, Syllable) {
    let layout = registry.get(kind);
    let keys = layout.key_sequence_from_syllable(Syllable::from_composed_string(bopomofo));
    let mut buffer = ReadingBuffer::new(layout);
    for key in keys.chars() {
        assert!(buffer.combine_key(key), "{kind} rejected {key:?}");
    }
    (keys, buffer.syllable())
}

#[test]
fn hsu_canonical_sequences() {
    let registry = LayoutRegistry::new();
    let cases = [
        ("ㄋㄧˇ", "nef"),
        ("ㄓㄨㄥ", "jxl"),
        ("ㄐㄩㄝˋ", "juej"),
        ("ㄕˋ", "cj"),
        ("ㄇㄢˊ", "mmd"),
        ("ㄒㄧㄤˇ", "cekf"),
        ("ㄦˊ", "ld"),
    ];
    for (bopomofo, expected_keys) in cases {
        let (keys, syllable) = type_syllable(&registry, LayoutKind::Hsu, bopomofo);
        assert_eq!(keys, expected_keys);
        assert_eq!(syllable.composed_string(), bopomofo);
    }
}

#[test]
fn eten26_canonical_sequences() {
    let registry = LayoutRegistry::new();
    let cases = [
        ("ㄒㄧㄤˋ", "cetk"),
        ("ㄓㄨㄥ", "gxl"),
        ("ㄆㄡˇ", "ppj"),
        ("ㄖˋ", "jk"),
        ("ㄑㄧ", "ve"),
        ("ㄐㄩ", "gu"),
    ];
    for (bopomofo, expected_keys) in cases {
        let (keys, syllable) = type_syllable(&registry, LayoutKind::ETen26, bopomofo);
        assert_eq!(keys, expected_keys);
        assert_eq!(syllable.composed_string(), bopomofo);
    }
}

#[test]
fn same_syllable_across_layouts() {
    let registry = LayoutRegistry::new();
    let target = Syllable::from_composed_string("ㄓㄨㄥ");
    let expected = [
        (LayoutKind::Standard, "5j/"),
        (LayoutKind::ETen, ",x-"),
        (LayoutKind::Hsu, "jxl"),
        (LayoutKind::ETen26, "gxl"),
        (LayoutKind::Ibm, "rsb"),
        (LayoutKind::HanyuPinyin, ""),
    ];
    for (kind, keys) in expected {
        let layout = registry.get(kind);
        assert_eq!(layout.key_sequence_from_syllable(target), keys, "{kind}");
        if !keys.is_empty() {
            assert_eq!(layout.syllable_from_key_sequence(keys), target, "{kind}");
        }
    }
}

#[test]
fn space_is_tone_one_everywhere() {
    let registry = LayoutRegistry::new();
    for kind in LayoutKind::ALL {
        let layout = registry.get(kind);
        if kind == LayoutKind::HanyuPinyin {
            assert!(layout.key_to_components(' ').is_empty());
        } else {
            assert_eq!(layout.key_to_components(' '), &[Syllable::TONE1], "{kind}");
        }
    }
}

#[test]
fn layout_names_match_kinds() {
    let registry = LayoutRegistry::new();
    for kind in LayoutKind::ALL {
        let layout = registry.by_name(kind.name()).unwrap();
        assert_eq!(layout.kind(), kind);
        assert_eq!(layout.name(), kind.name());
    }
}

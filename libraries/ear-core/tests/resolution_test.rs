//! Integration tests for catalog loading and chord resolution
//!
//! Exercises the public API end to end: catalog document → template → key →
//! resolved chords → voicing.

use ear_core::{
    resolve, voice_chord, ChordQuality, CoreError, Key, KeySelector, Mode, PitchClass,
    ProgressionCatalog, RandomKeySelector,
};
use proptest::prelude::*;

const CATALOG_JSON: &str = r#"{
    "minor_swing": {
        "display_name": "Minor Swing",
        "mode": "minor",
        "slots": ["i", "iv", "V7", "i"]
    },
    "turnaround": {
        "display_name": "Turnaround",
        "slots": ["I", "vi", { "numeral": "ii7", "beats": 2 }, { "numeral": "V7", "beats": 2 }]
    },
    "broken": {
        "display_name": "Broken",
        "slots": ["I", "XI"]
    },
    "empty": {
        "display_name": "Empty",
        "slots": []
    },
    "not_a_template": 42
}"#;

#[test]
fn catalog_json_keeps_valid_entries() {
    let catalog = ProgressionCatalog::from_json(CATALOG_JSON).unwrap();

    assert_eq!(catalog.list_ids(), vec!["minor_swing", "turnaround"]);
    assert_eq!(catalog.rejected().len(), 3);
    assert!(catalog
        .rejected()
        .values()
        .all(|e| matches!(e, CoreError::InvalidTemplate { .. })));
    let rejected: Vec<&str> = catalog.rejected().keys().map(String::as_str).collect();
    assert_eq!(rejected, vec!["broken", "empty", "not_a_template"]);
    assert!(matches!(
        catalog.lookup("broken"),
        Err(CoreError::InvalidTemplate { id, .. }) if id == "broken"
    ));

    let turnaround = catalog.lookup("turnaround").unwrap();
    assert_eq!(turnaround.mode, None);
    let beats: Vec<u32> = turnaround.slots.iter().map(|s| s.beats).collect();
    assert_eq!(beats, vec![4, 4, 2, 2]);
}

#[test]
fn catalog_json_must_be_an_object() {
    let err = ProgressionCatalog::from_json("[1, 2, 3]").unwrap_err();
    assert!(matches!(err, CoreError::CatalogFormat(_)));

    let err = ProgressionCatalog::from_json("not json").unwrap_err();
    assert!(matches!(err, CoreError::CatalogFormat(_)));
}

#[test]
fn minor_swing_in_a_minor() {
    let catalog = ProgressionCatalog::from_json(CATALOG_JSON).unwrap();
    let template = catalog.lookup("minor_swing").unwrap();
    let key = Key::parse("Am").unwrap();

    let chords = resolve(template, &key).unwrap();
    let names: Vec<&str> = chords.iter().map(|c| c.display_name.as_str()).collect();
    let labels: Vec<&str> = chords.iter().map(|c| c.label.as_str()).collect();

    assert_eq!(names, vec!["Am", "Dm", "E7", "Am"]);
    assert_eq!(labels, vec!["i", "iv", "V7", "i"]);
    assert_eq!(chords[2].quality, ChordQuality::Dominant7);
}

#[test]
fn builtin_minor_swing_resolves_in_every_minor_key() {
    let catalog = ProgressionCatalog::builtin();
    let template = catalog.lookup("minor_swing").unwrap();

    for tonic in PitchClass::ALL {
        let key = Key::new(tonic, Mode::Minor);
        let chords = resolve(template, &key).unwrap();
        assert_eq!(chords.len(), 16);
        // First chord is always the tonic minor triad
        assert_eq!(chords[0].root, tonic);
        assert_eq!(chords[0].quality, ChordQuality::Minor);
        // V7 sits a fifth above the tonic
        assert_eq!(chords[6].root, tonic.transpose(7));
    }
}

#[test]
fn voicing_follows_resolution() {
    let key = Key::parse("Dm").unwrap();
    let catalog = ProgressionCatalog::builtin();
    let chords = resolve(catalog.lookup("dark_eyes").unwrap(), &key).unwrap();

    // A7 in the bass register and close position above
    let voicing = voice_chord(&chords[0], false);
    assert_eq!(voicing.bass, Some(45));
    assert_eq!(voicing.upper, vec![57, 61, 64, 67]);

    assert_eq!(voice_chord(&chords[0], true).bass, None);
}

fn any_key() -> impl Strategy<Value = Key> {
    (0i32..12, prop::sample::select(Mode::ALL.to_vec()))
        .prop_map(|(tonic, mode)| Key::new(PitchClass::new(tonic), mode))
}

proptest! {
    /// Property: resolution is pure, the same template and key always agree
    #[test]
    fn resolution_is_deterministic(key in any_key()) {
        let catalog = ProgressionCatalog::builtin();
        for template in catalog.iter() {
            let first = resolve(template, &key).unwrap();
            let second = resolve(template, &key).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    /// Property: labels never depend on the key
    #[test]
    fn labels_are_key_independent(a in any_key(), b in any_key()) {
        let catalog = ProgressionCatalog::builtin();
        for template in catalog.iter() {
            let left: Vec<String> = resolve(template, &a).unwrap().into_iter().map(|c| c.label).collect();
            let right: Vec<String> = resolve(template, &b).unwrap().into_iter().map(|c| c.label).collect();
            prop_assert_eq!(left, right);
        }
    }

    /// Property: random keys always honour the template's mode
    #[test]
    fn random_key_matches_template_mode(seed in any::<u64>()) {
        let catalog = ProgressionCatalog::builtin();
        let mut selector = RandomKeySelector::with_seed(seed);
        for template in catalog.iter() {
            let key = selector.pick(&template.allowed_modes());
            prop_assert_eq!(Some(key.mode), template.mode);
        }
    }
}

//! Highlighting tests
//!
//! Normalization, segment tables and offset resolution through the public
//! API, plus a full reading session driven by the silent backend.

use dictator::speech::backends::silent::SilentSynth;
use dictator::state::config::Config;
use dictator::state::State;
use dictator::text::{normalize, resolve_active, tokenize, tokenize_with, OffsetUnit};

const SAMPLES: &[&str] = &[
    "",
    "Hi there",
    "Hello <b>world</b>!",
    "**bold** and _underline_",
    "  # Title\n\nSome `code` and *emphasis*  \n",
    "one ** two -- three",
    "tabs\tand\u{00a0}non-breaking spaces",
    "Accents: café naïve, 世界 🎤",
];

#[test]
fn test_normalize_examples() {
    assert_eq!(normalize("Hello <b>world</b>!"), "Hello world !");
    assert_eq!(normalize("**bold** and _underline_"), "bold and underline");
}

#[test]
fn test_normalize_idempotent() {
    for sample in SAMPLES {
        let once = normalize(sample);
        assert_eq!(normalize(&once), once);
        assert!(!once.contains(&['*', '_', '#', '`'][..]));
        assert_eq!(once.trim(), once);
    }
}

#[test]
fn test_tokenize_example() {
    let table = tokenize("Hi there");
    let summary: Vec<_> = table
        .iter()
        .map(|s| (s.text.as_str(), s.is_word, s.normalized_start(), s.normalized_length()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Hi", true, Some(0), Some(2)),
            (" ", false, None, None),
            ("there", true, Some(3), Some(5)),
        ]
    );
}

#[test]
fn test_resolve_examples() {
    let table = tokenize("Hi there");
    assert_eq!(resolve_active(&table, Some(4)).map(|i| &table.segments()[i].text[..]), Some("there"));
    assert_eq!(resolve_active(&table, Some(2)), None);
    assert_eq!(resolve_active(&tokenize(""), Some(0)), None);
    assert_eq!(resolve_active(&tokenize(""), None), None);
}

#[test]
fn test_round_trip_coverage() {
    for sample in SAMPLES {
        for unit in [OffsetUnit::Chars, OffsetUnit::Utf16, OffsetUnit::Bytes] {
            assert_eq!(tokenize_with(sample, unit).raw_text(), *sample);
        }
    }
}

#[test]
fn test_word_ranges_disjoint_and_monotonic() {
    for sample in SAMPLES {
        let table = tokenize(sample);
        let spans: Vec<_> = table.words().filter_map(|(_, s)| s.normalized).collect();

        for pair in spans.windows(2) {
            assert!(pair[0].start <= pair[1].start, "not monotonic in {:?}", sample);
        }
        for (i, a) in spans.iter().enumerate() {
            for b in &spans[i + 1..] {
                let overlap = a.start < b.end() && b.start < a.end();
                assert!(!overlap, "{:?} overlaps {:?} in {:?}", a, b, sample);
            }
        }
    }
}

#[test]
fn test_table_matches_spoken_text() {
    for sample in SAMPLES {
        let table = tokenize(sample);
        assert!(table.validate(&normalize(sample)).is_ok(), "desync in {:?}", sample);
    }
}

#[test]
fn test_every_word_resolves_from_its_start() {
    for sample in SAMPLES {
        let table = tokenize(sample);
        for (index, segment) in table.words() {
            if segment.is_speakable() {
                assert_eq!(table.resolve_active(segment.normalized_start()), Some(index));
            }
        }
    }
}

#[test]
fn test_reading_session_highlights_each_word() {
    let synth = Box::new(SilentSynth::default());
    let mut state = State::with_synth(Config::default(), synth).unwrap();
    state.set_text("**Read** me <i>aloud</i>, please").unwrap();
    state.speak().unwrap();

    let highlighted: Vec<_> = state
        .pump_events()
        .into_iter()
        .filter_map(|change| change.current)
        .map(|idx| state.segments().get(idx).unwrap().text.clone())
        .collect();

    assert_eq!(highlighted, vec!["**Read**", "me", "<i>aloud</i>,", "please"]);
    assert!(!state.is_speaking());
    assert_eq!(state.active_segment(), None);
}

#[test]
fn test_reading_selection_with_utf16_engine() {
    let mut config = Config::default();
    config.set("highlight", "offset_unit", "utf16");
    let synth = Box::new(SilentSynth::new(OffsetUnit::Utf16));
    let mut state = State::with_synth(config, synth).unwrap();

    state.set_text("skip 🎤 mic check").unwrap();
    state.select(5..10).unwrap();
    assert_eq!(state.active_text(), "🎤 mic");

    state.speak().unwrap();
    let highlighted: Vec<_> = state
        .pump_events()
        .into_iter()
        .filter_map(|change| change.current)
        .map(|idx| state.segments().get(idx).unwrap().text.clone())
        .collect();
    assert_eq!(highlighted, vec!["🎤", "mic"]);
}

#[test]
fn test_stop_clears_highlight() {
    let synth = Box::new(SilentSynth::default());
    let mut state = State::with_synth(Config::default(), synth).unwrap();
    state.set_text("one two three").unwrap();
    state.speak().unwrap();

    let change = state.stop().unwrap();
    assert_eq!(change, None);
    assert!(state.pump_events().is_empty());
    assert!(!state.is_speaking());
}

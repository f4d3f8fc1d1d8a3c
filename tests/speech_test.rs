//! Integration tests for speech synthesis
//!
//! The native backend may be unavailable in CI, so those tests only check
//! that failures are reported as errors. The silent backend is exercised fully.

use dictator::speech::{create_synth, Backend, SpeechCommand, SpeechEvent};
use dictator::text::OffsetUnit;

#[test]
fn test_create_native_synth() {
    match create_synth(Backend::Native, OffsetUnit::Chars) {
        Ok(synth) => {
            println!("✓ Successfully created native TTS backend");
            drop(synth);
        }
        Err(e) => {
            // This may fail in CI or environments without speech-dispatcher
            println!("⚠ TTS creation failed (may be expected): {}", e);
        }
    }
}

#[test]
fn test_native_configuration() {
    if let Ok(mut synth) = create_synth(Backend::Native, OffsetUnit::Chars) {
        assert!(synth.set_rate(1.0).is_ok(), "Should set normal rate");
        assert!(synth.set_pitch(1.0).is_ok(), "Should set normal pitch");
        assert!(synth.set_volume(0.5).is_ok(), "Should set volume");

        // An unknown voice keeps the default rather than failing
        let voice_result = synth.set_voice("no-such-voice");
        println!("Voice selection result: {:?}", voice_result);
    } else {
        println!("⚠ Skipping configuration tests (TTS not available)");
    }
}

#[test]
fn test_silent_commands() {
    let mut synth = create_synth(Backend::Silent, OffsetUnit::Chars).unwrap();

    synth.send(SpeechCommand::SetRate(2.0)).unwrap();
    synth.send(SpeechCommand::SetVoice("silent".to_string())).unwrap();
    synth
        .send(SpeechCommand::Speak("Hello world !".to_string()))
        .unwrap();

    let events = synth.poll_events();
    assert_eq!(
        events,
        vec![
            SpeechEvent::Start,
            SpeechEvent::Boundary(0),
            SpeechEvent::Boundary(6),
            SpeechEvent::Boundary(12),
            SpeechEvent::End,
        ]
    );

    synth.send(SpeechCommand::Cancel).unwrap();
    assert!(synth.poll_events().is_empty());
}

#[test]
fn test_silent_unicode() {
    let mut synth = create_synth(Backend::Silent, OffsetUnit::Utf16).unwrap();
    synth.speak("Emoji: 🎤 café").unwrap();

    let boundaries: Vec<_> = synth
        .poll_events()
        .into_iter()
        .filter_map(|e| match e {
            SpeechEvent::Boundary(offset) => Some(offset),
            _ => None,
        })
        .collect();
    assert_eq!(boundaries, vec![0, 7, 10]);
}

//! Silent speech backend
//!
//! Produces no audio. Each utterance immediately queues Start, one Boundary
//! per word of the text, and End. Used for dry runs and in tests, where it
//! stands in for an engine that reports word boundaries.

use crate::speech::{SpeechEvent, Synth, VoiceInfo};
use crate::text::OffsetUnit;
use crate::Result;
use log::{debug, warn};
use std::collections::VecDeque;

const SILENT_VOICE: &str = "silent";

/// Speech backend that only reports progress events
pub struct SilentSynth {
    unit: OffsetUnit,
    events: VecDeque<SpeechEvent>,
    spoken: Vec<String>,
    speaking: bool,
    rate: f32,
    pitch: f32,
    volume: f32,
}

impl SilentSynth {
    pub fn new(unit: OffsetUnit) -> Self {
        Self {
            unit,
            events: VecDeque::new(),
            spoken: Vec::new(),
            speaking: false,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }

    /// Every text passed to `speak`, oldest first
    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }

    /// Current (rate, pitch, volume)
    pub fn settings(&self) -> (f32, f32, f32) {
        (self.rate, self.pitch, self.volume)
    }

    /// Offsets at which each whitespace-separated word of `text` starts
    fn word_starts(&self, text: &str) -> Vec<usize> {
        let mut starts = Vec::new();
        let mut position = 0;
        let mut previous_whitespace = true;

        for ch in text.chars() {
            let whitespace = ch.is_whitespace();
            if previous_whitespace && !whitespace {
                starts.push(position);
            }
            previous_whitespace = whitespace;
            position += self.unit.char_width(ch);
        }
        starts
    }
}

impl Default for SilentSynth {
    fn default() -> Self {
        Self::new(OffsetUnit::Chars)
    }
}

impl Synth for SilentSynth {
    fn set_rate(&mut self, rate: f32) -> Result<()> {
        debug!("Setting rate to {}", rate);
        self.rate = rate;
        Ok(())
    }

    fn set_pitch(&mut self, pitch: f32) -> Result<()> {
        debug!("Setting pitch to {}", pitch);
        self.pitch = pitch;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        debug!("Setting volume to {}", volume);
        self.volume = volume;
        Ok(())
    }

    fn set_voice(&mut self, voice: &str) -> Result<()> {
        if voice != SILENT_VOICE {
            warn!("Voice '{}' not available, keeping '{}'", voice, SILENT_VOICE);
        }
        Ok(())
    }

    fn voices(&self) -> Result<Vec<VoiceInfo>> {
        Ok(vec![VoiceInfo {
            id: SILENT_VOICE.to_string(),
            name: SILENT_VOICE.to_string(),
            language: "und".to_string(),
        }])
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        // A new utterance replaces the current one
        if self.speaking {
            self.cancel()?;
        }

        debug!("Speaking silently: {} chars", text.chars().count());
        self.spoken.push(text.to_string());
        self.events.push_back(SpeechEvent::Start);
        for start in self.word_starts(text) {
            self.events.push_back(SpeechEvent::Boundary(start));
        }
        self.events.push_back(SpeechEvent::End);
        self.speaking = true;
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        if self.speaking {
            debug!("Canceling silent speech");
            self.events.clear();
            self.events.push_back(SpeechEvent::End);
            self.speaking = false;
        }
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<SpeechEvent> {
        let events: Vec<_> = self.events.drain(..).collect();
        if events.last() == Some(&SpeechEvent::End) {
            self.speaking = false;
        }
        events
    }

    fn offset_unit(&self) -> OffsetUnit {
        self.unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speak_reports_boundaries() {
        let mut synth = SilentSynth::default();
        synth.speak("Hi there").unwrap();

        assert_eq!(
            synth.poll_events(),
            vec![
                SpeechEvent::Start,
                SpeechEvent::Boundary(0),
                SpeechEvent::Boundary(3),
                SpeechEvent::End,
            ]
        );
        assert!(synth.poll_events().is_empty());
        assert_eq!(synth.spoken(), ["Hi there".to_string()]);
    }

    #[test]
    fn test_empty_text_is_noop() {
        let mut synth = SilentSynth::default();
        synth.speak("").unwrap();
        assert!(synth.poll_events().is_empty());
        assert!(synth.spoken().is_empty());
    }

    #[test]
    fn test_cancel_drops_pending_events() {
        let mut synth = SilentSynth::default();
        synth.speak("one two three").unwrap();
        synth.cancel().unwrap();
        assert_eq!(synth.poll_events(), vec![SpeechEvent::End]);

        // Nothing to cancel
        synth.cancel().unwrap();
        assert!(synth.poll_events().is_empty());
    }

    #[test]
    fn test_utf16_boundaries() {
        let mut synth = SilentSynth::new(OffsetUnit::Utf16);
        synth.speak("🎤 mic").unwrap();
        let events = synth.poll_events();
        assert_eq!(events[1], SpeechEvent::Boundary(0));
        assert_eq!(events[2], SpeechEvent::Boundary(3));
    }

    #[test]
    fn test_settings() {
        let mut synth = SilentSynth::default();
        synth.set_rate(1.5).unwrap();
        synth.set_pitch(0.5).unwrap();
        synth.set_volume(0.25).unwrap();
        assert_eq!(synth.settings(), (1.5, 0.5, 0.25));
        assert!(synth.set_voice("Alex").is_ok());
        assert_eq!(synth.voices().unwrap().len(), 1);
    }
}

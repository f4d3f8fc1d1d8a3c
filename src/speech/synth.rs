//! Speech synthesizer abstraction
//!
//! Provides a unified interface for text-to-speech engines. The reader sends
//! normalized text through this trait and drains engine progress events to
//! drive word highlighting.

use crate::text::OffsetUnit;
use crate::{DictatorError, Result};
use log::info;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Commands sent to a speech backend
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechCommand {
    /// Speak a string of text
    Speak(String),
    /// Cancel/silence current speech
    Cancel,
    /// Set speech rate multiplier (1.0 is normal)
    SetRate(f32),
    /// Set pitch multiplier (1.0 is normal)
    SetPitch(f32),
    /// Set volume (0.0-1.0)
    SetVolume(f32),
    /// Select a voice by id or name
    SetVoice(String),
}

/// Progress reported by a speech engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Utterance started
    Start,
    /// Engine reached the word at this offset of the spoken text
    Boundary(usize),
    /// Utterance finished or was cancelled
    End,
    /// Engine failed while speaking
    Error(String),
}

/// A voice offered by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    pub language: String,
}

impl VoiceInfo {
    /// Whether `query` names this voice (id exact, name case-insensitive)
    pub fn matches(&self, query: &str) -> bool {
        self.id == query || self.name.eq_ignore_ascii_case(query)
    }
}

/// Speech synthesizer trait
///
/// All backends implement this. Events are queued by the backend and
/// collected with `poll_events`, so callers stay single-threaded.
pub trait Synth: Send {
    /// Send a raw command to the backend
    fn send(&mut self, cmd: SpeechCommand) -> Result<()> {
        match cmd {
            SpeechCommand::Speak(text) => self.speak(&text),
            SpeechCommand::Cancel => self.cancel(),
            SpeechCommand::SetRate(rate) => self.set_rate(rate),
            SpeechCommand::SetPitch(pitch) => self.set_pitch(pitch),
            SpeechCommand::SetVolume(volume) => self.set_volume(volume),
            SpeechCommand::SetVoice(voice) => self.set_voice(&voice),
        }
    }

    /// Set speech rate multiplier (0.1-10.0, 1.0 is normal)
    fn set_rate(&mut self, rate: f32) -> Result<()>;

    /// Set pitch multiplier (0.0-2.0, 1.0 is normal)
    fn set_pitch(&mut self, pitch: f32) -> Result<()>;

    /// Set speech volume (0.0-1.0)
    fn set_volume(&mut self, volume: f32) -> Result<()>;

    /// Select a voice by id or name
    fn set_voice(&mut self, voice: &str) -> Result<()>;

    /// Voices the engine offers
    fn voices(&self) -> Result<Vec<VoiceInfo>>;

    /// Speak text, replacing anything currently being spoken
    fn speak(&mut self, text: &str) -> Result<()>;

    /// Cancel/silence current speech
    fn cancel(&mut self) -> Result<()>;

    /// Drain the events reported since the last call
    fn poll_events(&mut self) -> Vec<SpeechEvent>;

    /// Unit the engine reports boundary offsets in
    fn offset_unit(&self) -> OffsetUnit {
        OffsetUnit::Chars
    }
}

/// Which speech backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Platform TTS through the tts crate
    #[default]
    Native,
    /// No audio; reports one boundary per word immediately
    Silent,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Native => f.write_str("native"),
            Backend::Silent => f.write_str("silent"),
        }
    }
}

impl FromStr for Backend {
    type Err = DictatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "" => Ok(Backend::Native),
            "silent" | "none" => Ok(Backend::Silent),
            other => Err(DictatorError::Config(format!(
                "unknown speech backend '{}'",
                other
            ))),
        }
    }
}

/// Create a speech synthesizer for the requested backend
///
/// `unit` is the offset unit the silent backend reports in; the native
/// backend has no word boundaries to report.
pub fn create_synth(backend: Backend, unit: OffsetUnit) -> Result<Box<dyn Synth>> {
    match backend {
        Backend::Native => {
            info!(
                "Creating native speech synthesizer for platform: {}",
                std::env::consts::OS
            );
            use super::backends::native::NativeSynth;

            match NativeSynth::new() {
                Ok(synth) => {
                    info!("✓ Successfully initialized native TTS backend");
                    Ok(Box::new(synth))
                }
                Err(e) => Err(DictatorError::Speech(format!(
                    "Failed to initialize speech backend for platform '{}': {}",
                    std::env::consts::OS,
                    e
                ))),
            }
        }
        Backend::Silent => {
            info!("Using silent speech backend ({} offsets)", unit);
            use super::backends::silent::SilentSynth;
            Ok(Box::new(SilentSynth::new(unit)))
        }
    }
}

//! Native Rust TTS backend using the tts crate
//!
//! This backend uses the `tts` crate which provides a unified interface to:
//! - Speech Dispatcher on Linux (via native bindings)
//! - AVFoundation on macOS/iOS (via native bindings)
//! - WinRT/SAPI on Windows
//!
//! The platform APIs report when an utterance begins and ends but not word
//! boundaries, so highlighting stays on the first word until End.

use crate::speech::{SpeechEvent, Synth, VoiceInfo};
use crate::{DictatorError, Result};
use log::{debug, error, warn};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::mpsc::{self, Receiver, Sender};
use tts::{Tts as TtsCrate, UtteranceId};

/// Event with the key of the utterance it belongs to (None: not engine-tagged)
type TaggedEvent = (Option<u64>, SpeechEvent);

/// Reader rate multipliers accepted by `set_rate`
const RATE_RANGE: (f32, f32) = (0.1, 10.0);

/// Reader pitch multipliers accepted by `set_pitch`
const PITCH_RANGE: (f32, f32) = (0.0, 2.0);

/// Map a reader multiplier onto an engine range
///
/// `value` is clamped to `input` (whose midpoint is 1.0, the "normal"
/// setting). The lower part maps linearly onto `min..=normal`, the upper
/// part onto `normal..=max`.
fn scale_around(value: f32, input: (f32, f32), min: f32, normal: f32, max: f32) -> f32 {
    let (low, high) = input;
    let value = value.clamp(low, high);
    if value <= 1.0 {
        let fraction = (value - low) / (1.0 - low);
        min + (normal - min) * fraction
    } else {
        let fraction = (value - 1.0) / (high - 1.0);
        normal + (max - normal) * fraction
    }
}

/// Sendable key identifying an utterance
fn utterance_key(id: &UtteranceId) -> u64 {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    hasher.finish()
}

/// Whether an event tagged `tag` belongs to the `current` utterance
///
/// Untagged events are ours; with no known current utterance nothing is dropped.
fn is_current(tag: Option<u64>, current: Option<u64>) -> bool {
    match (tag, current) {
        (Some(tag), Some(current)) => tag == current,
        _ => true,
    }
}

/// Native TTS backend using the tts crate
pub struct NativeSynth {
    /// The tts crate's TTS instance
    tts: TtsCrate,

    /// Events pushed by utterance callbacks
    events: Receiver<TaggedEvent>,

    /// Sender for events raised here rather than by the engine
    fallback: Sender<TaggedEvent>,

    /// Key of the utterance last passed to `speak`
    current: Option<u64>,

    /// Whether the engine reports utterance begin/end itself
    callbacks: bool,

    /// Whether an utterance is in progress (fallback tracking)
    speaking: bool,
}

impl NativeSynth {
    /// Create a new native TTS synthesizer
    ///
    /// Initializes the platform-appropriate TTS backend and hooks its
    /// utterance callbacks into the event queue.
    pub fn new() -> Result<Self> {
        debug!("Creating native TTS backend");

        let tts = TtsCrate::default()
            .map_err(|e| DictatorError::Speech(format!("Failed to initialize TTS: {}", e)))?;

        let (tx, events) = mpsc::channel();
        let callbacks = tts.supported_features().utterance_callbacks;

        if callbacks {
            let begin = tx.clone();
            let end = tx.clone();
            let stop = tx.clone();
            tts.on_utterance_begin(Some(Box::new(move |id: UtteranceId| {
                let _ = begin.send((Some(utterance_key(&id)), SpeechEvent::Start));
            })))
            .and_then(|_| {
                tts.on_utterance_end(Some(Box::new(move |id: UtteranceId| {
                    let _ = end.send((Some(utterance_key(&id)), SpeechEvent::End));
                })))
            })
            .and_then(|_| {
                tts.on_utterance_stop(Some(Box::new(move |id: UtteranceId| {
                    let _ = stop.send((Some(utterance_key(&id)), SpeechEvent::End));
                })))
            })
            .map_err(|e| {
                DictatorError::Speech(format!("Failed to register utterance callbacks: {}", e))
            })?;
        } else {
            warn!("Utterance callbacks not supported on this platform");
        }

        debug!("Native TTS backend created successfully");

        Ok(Self {
            tts,
            events,
            fallback: tx,
            current: None,
            callbacks,
            speaking: false,
        })
    }
}

impl Synth for NativeSynth {
    fn set_rate(&mut self, rate: f32) -> Result<()> {
        debug!("Setting rate to {}", rate);

        let features = self.tts.supported_features();
        if !features.rate {
            warn!("Rate control not supported on this platform");
            return Ok(());
        }

        let converted = scale_around(
            rate,
            RATE_RANGE,
            self.tts.min_rate(),
            self.tts.normal_rate(),
            self.tts.max_rate(),
        );
        self.tts
            .set_rate(converted)
            .map_err(|e| DictatorError::Speech(format!("Failed to set rate: {}", e)))?;

        Ok(())
    }

    fn set_pitch(&mut self, pitch: f32) -> Result<()> {
        debug!("Setting pitch to {}", pitch);

        let features = self.tts.supported_features();
        if !features.pitch {
            warn!("Pitch control not supported on this platform");
            return Ok(());
        }

        let converted = scale_around(
            pitch,
            PITCH_RANGE,
            self.tts.min_pitch(),
            self.tts.normal_pitch(),
            self.tts.max_pitch(),
        );
        self.tts
            .set_pitch(converted)
            .map_err(|e| DictatorError::Speech(format!("Failed to set pitch: {}", e)))?;

        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        debug!("Setting volume to {}", volume);

        let features = self.tts.supported_features();
        if !features.volume {
            warn!("Volume control not supported on this platform");
            return Ok(());
        }

        let (min, max) = (self.tts.min_volume(), self.tts.max_volume());
        let converted = min + (max - min) * volume.clamp(0.0, 1.0);
        self.tts
            .set_volume(converted)
            .map_err(|e| DictatorError::Speech(format!("Failed to set volume: {}", e)))?;

        Ok(())
    }

    fn set_voice(&mut self, voice: &str) -> Result<()> {
        debug!("Selecting voice {:?}", voice);

        if !self.tts.supported_features().voice {
            warn!("Voice selection not supported on this platform");
            return Ok(());
        }

        let voices = self
            .tts
            .voices()
            .map_err(|e| DictatorError::Speech(format!("Failed to get voices: {}", e)))?;

        let found = voices
            .iter()
            .find(|v| v.id() == voice || v.name().eq_ignore_ascii_case(voice));

        match found {
            Some(v) => self
                .tts
                .set_voice(v)
                .map_err(|e| DictatorError::Speech(format!("Failed to set voice: {}", e))),
            None => {
                warn!(
                    "Voice {:?} not found (have {} voices), keeping default",
                    voice,
                    voices.len()
                );
                Ok(())
            }
        }
    }

    fn voices(&self) -> Result<Vec<VoiceInfo>> {
        let voices = self
            .tts
            .voices()
            .map_err(|e| DictatorError::Speech(format!("Failed to get voices: {}", e)))?;

        Ok(voices
            .iter()
            .map(|v| VoiceInfo {
                id: v.id(),
                name: v.name(),
                language: v.language().to_string(),
            })
            .collect())
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        debug!("Speaking: {}", text);
        let id = self.tts.speak(text, true).map_err(|e| {
            error!("Failed to speak: {}", e);
            let _ = self.fallback.send((None, SpeechEvent::Error(e.to_string())));
            DictatorError::Speech(format!("Speak failed: {}", e))
        })?;

        // Callbacks still in flight for the interrupted utterance are dropped
        self.current = id.as_ref().map(utterance_key);

        if !self.callbacks {
            let _ = self.fallback.send((None, SpeechEvent::Start));
        }
        self.speaking = true;
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        debug!("Canceling speech");
        self.tts.stop().map_err(|e| {
            error!("Failed to cancel speech: {}", e);
            DictatorError::Speech(format!("Cancel failed: {}", e))
        })?;

        if !self.callbacks && self.speaking {
            let _ = self.fallback.send((None, SpeechEvent::End));
        }
        self.speaking = false;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<SpeechEvent> {
        // Without callbacks, End is inferred from the engine going quiet
        if !self.callbacks && self.speaking && self.tts.supported_features().is_speaking {
            if let Ok(false) = self.tts.is_speaking() {
                let _ = self.fallback.send((None, SpeechEvent::End));
                self.speaking = false;
            }
        }

        let current = self.current;
        let events: Vec<_> = self
            .events
            .try_iter()
            .filter_map(|(tag, event)| {
                if is_current(tag, current) {
                    Some(event)
                } else {
                    debug!("Dropping {:?} from an earlier utterance", event);
                    None
                }
            })
            .collect();
        if events.contains(&SpeechEvent::End) {
            self.speaking = false;
        }
        events
    }
}

//! Speech synthesis system

pub mod backends;
pub mod synth;

pub use synth::{create_synth, Backend, SpeechCommand, SpeechEvent, Synth, VoiceInfo};

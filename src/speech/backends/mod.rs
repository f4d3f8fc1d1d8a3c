//! Speech backends

// Native TTS backend using the tts crate (cross-platform)
pub mod native;

// Event-only backend for dry runs and tests
pub mod silent;

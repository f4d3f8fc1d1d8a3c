//! Reading session state
//!
//! The State struct ties the pieces together: the text being read, the
//! active selection, the segment table built from it, the speech engine and
//! the highlight tracker fed by the engine's events.

pub mod config;
pub mod highlight;

use crate::speech::{create_synth, SpeechEvent, Synth, VoiceInfo};
use crate::text::{normalize, tokenize_with, OffsetUnit, Segment, SegmentTable};
use crate::{DictatorError, Result};
use config::Config;
use highlight::{HighlightChange, HighlightTracker};
use log::{debug, info, warn};
use std::ops::Range;

/// A reading session
pub struct State {
    /// Configuration loaded from ~/.dictator.cfg
    pub config: Config,

    /// Speech synthesizer the normalized text is sent to
    pub synth: Box<dyn Synth>,

    /// Raw text as the user supplied it
    text: String,

    /// Selected byte range of `text`, if any
    selection: Option<Range<usize>>,

    /// Segments of the active text, rebuilt whenever it changes
    table: SegmentTable,

    /// Which segment is highlighted while speaking
    tracker: HighlightTracker,

    /// Unit the engine reports offsets in
    unit: OffsetUnit,

    /// An utterance was sent and has not ended yet
    pending: bool,

    /// Events before the new utterance's Start belong to a cancelled one
    awaiting_start: bool,
}

impl State {
    /// Create a session with the backend named in the configuration
    pub fn new(config: Config) -> Result<Self> {
        let backend = config.backend()?;
        let synth = create_synth(backend, config.offset_unit())?;
        info!("Speech synthesizer created ({})", backend);
        Self::with_synth(config, synth)
    }

    /// Create a session around an existing synthesizer
    ///
    /// Offsets are measured in the unit the synthesizer reports.
    pub fn with_synth(config: Config, synth: Box<dyn Synth>) -> Result<Self> {
        let unit = synth.offset_unit();
        if unit != config.offset_unit() {
            warn!(
                "Configured offset unit {} ignored, engine reports {}",
                config.offset_unit(),
                unit
            );
        }
        let mut state = Self {
            config,
            synth,
            text: String::new(),
            selection: None,
            table: SegmentTable::default(),
            tracker: HighlightTracker::new(),
            unit,
            pending: false,
            awaiting_start: false,
        };
        state.apply_config()?;
        Ok(state)
    }

    /// Push voice, rate, pitch and volume from the configuration to the engine
    pub fn apply_config(&mut self) -> Result<()> {
        let (rate, pitch, volume) = (self.config.rate(), self.config.pitch(), self.config.volume());
        self.synth.set_rate(rate)?;
        self.synth.set_pitch(pitch)?;
        self.synth.set_volume(volume)?;
        info!("Speech rate {}, pitch {}, volume {}", rate, pitch, volume);

        if let Some(voice) = self.config.voice() {
            self.synth.set_voice(&voice)?;
            info!("Speech voice set to {}", voice);
        }
        Ok(())
    }

    /// Voices offered by the engine
    pub fn voices(&self) -> Result<Vec<VoiceInfo>> {
        self.synth.voices()
    }

    /// Replace the text being read
    ///
    /// Clears the selection and stops any speech of the old text.
    pub fn set_text(&mut self, raw: impl Into<String>) -> Result<()> {
        self.stop_if_speaking()?;
        self.text = raw.into();
        self.selection = None;
        self.rebuild();
        Ok(())
    }

    /// Raw text of the session
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Restrict reading to a character range of the text
    pub fn select(&mut self, range: Range<usize>) -> Result<()> {
        let bytes = char_range_to_bytes(&self.text, range.clone()).ok_or_else(|| {
            DictatorError::Selection(format!(
                "{}..{} is outside a text of {} characters",
                range.start,
                range.end,
                self.text.chars().count()
            ))
        })?;

        self.stop_if_speaking()?;
        debug!("Selected chars {:?} (bytes {:?})", range, bytes);
        self.selection = Some(bytes);
        self.rebuild();
        Ok(())
    }

    /// Read the whole text again
    pub fn clear_selection(&mut self) -> Result<()> {
        if self.selection.is_none() {
            return Ok(());
        }
        self.stop_if_speaking()?;
        self.selection = None;
        self.rebuild();
        Ok(())
    }

    /// Check if a selection is active
    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    /// The selection if there is one, otherwise the whole text
    pub fn active_text(&self) -> &str {
        match &self.selection {
            Some(range) => &self.text[range.clone()],
            None => &self.text,
        }
    }

    /// The text sent to the speech engine
    pub fn spoken_text(&self) -> String {
        normalize(self.active_text())
    }

    /// Segment table of the active text
    pub fn segments(&self) -> &SegmentTable {
        &self.table
    }

    /// Start reading the active text aloud
    pub fn speak(&mut self) -> Result<()> {
        let spoken = self.spoken_text();
        if spoken.is_empty() {
            debug!("Nothing to speak");
            return Ok(());
        }
        info!("Speaking {} segments", self.table.len());
        self.synth.speak(&spoken)?;
        self.pending = true;
        self.awaiting_start = true;
        Ok(())
    }

    /// Stop speaking and clear the highlight
    pub fn stop(&mut self) -> Result<Option<HighlightChange>> {
        self.synth.cancel()?;
        // Drop events from the cancelled utterance
        self.synth.poll_events();
        self.pending = false;
        self.awaiting_start = false;
        Ok(self.tracker.reset())
    }

    /// Whether speech is in progress
    pub fn is_speaking(&self) -> bool {
        self.tracker.is_active()
    }

    /// Whether an utterance was sent and has not ended yet
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Feed pending engine events to the highlight tracker
    ///
    /// Returns every change of the highlighted segment, in order.
    pub fn pump_events(&mut self) -> Vec<HighlightChange> {
        let mut changes = Vec::new();
        for event in self.synth.poll_events() {
            debug!("Speech event: {:?}", event);
            if self.awaiting_start {
                if event != SpeechEvent::Start {
                    debug!("Dropping {:?} from a cancelled utterance", event);
                    continue;
                }
                self.awaiting_start = false;
            }
            if matches!(event, SpeechEvent::End | SpeechEvent::Error(_)) {
                self.pending = false;
            }
            if let Some(change) = self.tracker.on_event(&event, &self.table) {
                changes.push(change);
            }
        }
        changes
    }

    /// Index of the highlighted segment
    pub fn active_index(&self) -> Option<usize> {
        self.tracker.active_segment()
    }

    /// The highlighted segment
    pub fn active_segment(&self) -> Option<&Segment> {
        self.active_index().and_then(|idx| self.table.get(idx))
    }

    fn stop_if_speaking(&mut self) -> Result<()> {
        if self.pending || self.tracker.is_active() {
            debug!("Text changed while speaking, stopping");
            self.stop()?;
        }
        Ok(())
    }

    /// Rebuild the segment table for the active text
    fn rebuild(&mut self) {
        let active = self.active_text();
        let table = tokenize_with(active, self.unit);

        if self.config.validate_offsets() {
            if let Err(desync) = table.validate(&normalize(active)) {
                warn!("Highlighting may drift: {}", desync);
            }
        }

        self.table = table;
    }
}

/// Convert a character range to a byte range of `text`
fn char_range_to_bytes(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    if range.start > range.end {
        return None;
    }
    let start = OffsetUnit::Chars.byte_index(text, range.start)?;
    let end = OffsetUnit::Chars.byte_index(text, range.end)?;
    Some(start..end)
}

//! Highlight tracking while speech is in progress
//!
//! IDLE -> ACTIVE on Start (offset 0), ACTIVE -> ACTIVE on every Boundary,
//! ACTIVE -> IDLE on End, Error or stop.

use crate::speech::SpeechEvent;
use crate::text::{resolve_active, ActiveOffset, SegmentTable};
use log::{debug, warn};

/// Change of the highlighted segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

/// Tracks the engine's current offset and the segment it resolves to
#[derive(Debug, Default)]
pub struct HighlightTracker {
    offset: ActiveOffset,
    active: Option<usize>,
}

impl HighlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether speech is in progress
    pub fn is_active(&self) -> bool {
        self.offset.is_some()
    }

    /// Last offset reported by the engine
    pub fn offset(&self) -> ActiveOffset {
        self.offset
    }

    /// Index of the highlighted segment
    pub fn active_segment(&self) -> Option<usize> {
        self.active
    }

    /// Apply one engine event
    ///
    /// Returns a change only when the highlighted segment differs from before.
    pub fn on_event(&mut self, event: &SpeechEvent, table: &SegmentTable) -> Option<HighlightChange> {
        match event {
            SpeechEvent::Start => self.move_to(Some(0), table),
            SpeechEvent::Boundary(offset) => {
                if !self.is_active() {
                    debug!("Ignoring boundary {} while idle", offset);
                    return None;
                }
                self.move_to(Some(*offset), table)
            }
            SpeechEvent::End => self.reset(),
            SpeechEvent::Error(message) => {
                warn!("Speech engine error: {}", message);
                self.reset()
            }
        }
    }

    /// Return to IDLE (speech stopped by the caller)
    pub fn reset(&mut self) -> Option<HighlightChange> {
        self.offset = None;
        self.update(None)
    }

    fn move_to(&mut self, offset: ActiveOffset, table: &SegmentTable) -> Option<HighlightChange> {
        self.offset = offset;
        let active = resolve_active(table, offset);
        if active.is_none() {
            debug!("Offset {:?} does not map to a word", offset);
        }
        self.update(active)
    }

    fn update(&mut self, active: Option<usize>) -> Option<HighlightChange> {
        if active == self.active {
            return None;
        }
        let change = HighlightChange {
            previous: self.active,
            current: active,
        };
        self.active = active;
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    #[test]
    fn test_lifecycle() {
        let table = tokenize("Hi there");
        let mut tracker = HighlightTracker::new();
        assert!(!tracker.is_active());

        let change = tracker.on_event(&SpeechEvent::Start, &table);
        assert_eq!(
            change,
            Some(HighlightChange {
                previous: None,
                current: Some(0)
            })
        );
        assert!(tracker.is_active());
        assert_eq!(tracker.offset(), Some(0));

        // Same word again: no change
        assert_eq!(tracker.on_event(&SpeechEvent::Boundary(1), &table), None);

        let change = tracker.on_event(&SpeechEvent::Boundary(3), &table);
        assert_eq!(change.unwrap().current, Some(2));

        let change = tracker.on_event(&SpeechEvent::End, &table);
        assert_eq!(
            change,
            Some(HighlightChange {
                previous: Some(2),
                current: None
            })
        );
        assert!(!tracker.is_active());
        assert_eq!(tracker.offset(), None);
    }

    #[test]
    fn test_unmapped_offset_clears_highlight() {
        let table = tokenize("Hi there");
        let mut tracker = HighlightTracker::new();
        tracker.on_event(&SpeechEvent::Start, &table);

        let change = tracker.on_event(&SpeechEvent::Boundary(42), &table);
        assert_eq!(change.unwrap().current, None);
        // Still speaking
        assert!(tracker.is_active());
    }

    #[test]
    fn test_boundary_while_idle_is_ignored() {
        let table = tokenize("Hi there");
        let mut tracker = HighlightTracker::new();
        assert_eq!(tracker.on_event(&SpeechEvent::Boundary(3), &table), None);
        assert_eq!(tracker.active_segment(), None);
    }

    #[test]
    fn test_error_returns_to_idle() {
        let table = tokenize("Hi there");
        let mut tracker = HighlightTracker::new();
        tracker.on_event(&SpeechEvent::Start, &table);
        tracker.on_event(&SpeechEvent::Error("device lost".to_string()), &table);
        assert!(!tracker.is_active());
        assert_eq!(tracker.active_segment(), None);
    }

    #[test]
    fn test_start_on_empty_table() {
        let table = tokenize("");
        let mut tracker = HighlightTracker::new();
        assert_eq!(tracker.on_event(&SpeechEvent::Start, &table), None);
        assert!(tracker.is_active());
    }
}

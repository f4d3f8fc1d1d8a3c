//! Segment table for word highlighting
//!
//! The raw display text is split into alternating word and gap segments.
//! Each word carries the range it occupies in the normalized text, so a
//! boundary offset reported by the speech engine can be mapped back to the
//! word on screen.
//!
//! The table assumes the engine receives the cleaned words joined by exactly
//! one separator. `SegmentTable::validate` checks that assumption against the
//! text that was really sent.

use super::normalizer::normalize;
use super::offsets::OffsetUnit;
use log::debug;
use serde::Serialize;
use thiserror::Error;

/// Character offset into the normalized text, or None when nothing is being spoken
pub type ActiveOffset = Option<usize>;

/// Range a word occupies in the normalized text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedSpan {
    pub start: usize,
    pub length: usize,
}

impl NormalizedSpan {
    /// Exclusive end of the span
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Whether `offset` falls inside the span (never true for empty spans)
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }
}

/// One word or whitespace run of the raw text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Literal text of the run, exactly as it appears in the raw text
    pub text: String,

    pub is_word: bool,

    /// Position in the normalized text (words only)
    #[serde(flatten)]
    pub normalized: Option<NormalizedSpan>,
}

impl Segment {
    fn gap(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_word: false,
            normalized: None,
        }
    }

    fn word(text: &str, start: usize, length: usize) -> Self {
        Self {
            text: text.to_string(),
            is_word: true,
            normalized: Some(NormalizedSpan { start, length }),
        }
    }

    pub fn normalized_start(&self) -> Option<usize> {
        self.normalized.map(|span| span.start)
    }

    pub fn normalized_length(&self) -> Option<usize> {
        self.normalized.map(|span| span.length)
    }

    /// A word whose text normalizes away can never be highlighted
    pub fn is_speakable(&self) -> bool {
        self.normalized.map_or(false, |span| span.length > 0)
    }
}

/// A word segment whose cleaned text is not where the table expects it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("segment {segment} ({word:?}) not found at offset {expected_start} of the spoken text")]
pub struct Desync {
    /// Index of the offending segment
    pub segment: usize,
    /// Cleaned word the table expected
    pub word: String,
    /// Offset the table assigned to it
    pub expected_start: usize,
}

/// Ordered word/gap segments covering the raw text end to end
///
/// Immutable once built; rebuild on every text change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentTable {
    segments: Vec<Segment>,
    #[serde(skip)]
    unit: OffsetUnit,
}

impl SegmentTable {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Unit the table's offsets are measured in
    pub fn unit(&self) -> OffsetUnit {
        self.unit
    }

    /// Word segments with their table indices
    pub fn words(&self) -> impl Iterator<Item = (usize, &Segment)> {
        self.segments.iter().enumerate().filter(|(_, s)| s.is_word)
    }

    /// Concatenation of every segment, which is the raw text
    pub fn raw_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// The text the offsets assume: cleaned words joined by single spaces
    pub fn spoken_text(&self) -> String {
        self.segments
            .iter()
            .filter(|s| s.is_speakable())
            .map(|s| normalize(&s.text))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Index of the segment being spoken at `offset`
    pub fn resolve_active(&self, offset: ActiveOffset) -> Option<usize> {
        resolve_active(self, offset)
    }

    /// Check every word against the text actually sent to the engine
    ///
    /// Each cleaned word must appear verbatim at its `normalized_start`.
    /// Returns the first mismatch.
    pub fn validate(&self, spoken: &str) -> Result<(), Desync> {
        for (index, segment) in self.words() {
            let Some(span) = segment.normalized.filter(|span| span.length > 0) else {
                continue;
            };
            let word = normalize(&segment.text);
            let found = self
                .unit
                .byte_index(spoken, span.start)
                .zip(self.unit.byte_index(spoken, span.end()))
                .and_then(|(from, to)| spoken.get(from..to));

            if found != Some(word.as_str()) {
                return Err(Desync {
                    segment: index,
                    word,
                    expected_start: span.start,
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SegmentTable {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Split raw text into alternating runs of whitespace and non-whitespace
///
/// Every character is kept, so the runs concatenate back to `raw`.
fn split_runs(raw: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_whitespace = None;

    for (idx, ch) in raw.char_indices() {
        let whitespace = ch.is_whitespace();
        match in_whitespace {
            Some(current) if current != whitespace => {
                runs.push(&raw[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_whitespace = Some(whitespace);
    }

    if start < raw.len() {
        runs.push(&raw[start..]);
    }
    runs
}

/// Build the segment table for `raw`, measuring offsets in characters
pub fn tokenize(raw: &str) -> SegmentTable {
    tokenize_with(raw, OffsetUnit::Chars)
}

/// Build the segment table for `raw`, measuring offsets in `unit`
pub fn tokenize_with(raw: &str, unit: OffsetUnit) -> SegmentTable {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for run in split_runs(raw) {
        if run.chars().next().map_or(true, char::is_whitespace) {
            segments.push(Segment::gap(run));
            continue;
        }

        let cleaned = normalize(run);
        let length = unit.measure(&cleaned);
        segments.push(Segment::word(run, cursor, length));

        // One separator between words in the spoken text
        if length > 0 {
            cursor += length + 1;
        }
    }

    debug!(
        "Tokenized {} bytes into {} segments ({})",
        raw.len(),
        segments.len(),
        unit
    );

    SegmentTable { segments, unit }
}

/// Find the word segment whose normalized range contains `offset`
///
/// Returns None for the "nothing active" sentinel and for offsets that fall
/// between words or past the end.
pub fn resolve_active(table: &SegmentTable, offset: ActiveOffset) -> Option<usize> {
    let offset = offset?;
    table
        .words()
        .find(|(_, segment)| segment.normalized.map_or(false, |span| span.contains(offset)))
        .map(|(index, _)| index)
}

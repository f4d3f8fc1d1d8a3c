//! Offset units for speech-engine boundary positions
//!
//! Engines disagree on what a "character offset" is. Browsers report UTF-16
//! code units, most native engines report characters, a few report bytes.
//! Every length and offset in a segment table is measured in one unit.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Unit in which normalized offsets and lengths are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    /// Unicode scalar values
    #[default]
    Chars,
    /// UTF-16 code units
    Utf16,
    /// UTF-8 bytes
    Bytes,
}

impl OffsetUnit {
    /// Length of `text` in this unit
    pub fn measure(self, text: &str) -> usize {
        match self {
            OffsetUnit::Chars => text.chars().count(),
            OffsetUnit::Utf16 => text.encode_utf16().count(),
            OffsetUnit::Bytes => text.len(),
        }
    }

    /// Length of a single character in this unit
    pub fn char_width(self, ch: char) -> usize {
        match self {
            OffsetUnit::Chars => 1,
            OffsetUnit::Utf16 => ch.len_utf16(),
            OffsetUnit::Bytes => ch.len_utf8(),
        }
    }

    /// Convert an offset in this unit to a byte index into `text`
    ///
    /// Returns None when the offset is past the end or falls inside a
    /// character. An offset equal to the text length maps to `text.len()`.
    pub fn byte_index(self, text: &str, offset: usize) -> Option<usize> {
        let mut position = 0;
        for (idx, ch) in text.char_indices() {
            if position == offset {
                return Some(idx);
            }
            if position > offset {
                return None;
            }
            position += self.char_width(ch);
        }
        (position == offset).then_some(text.len())
    }
}

impl fmt::Display for OffsetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OffsetUnit::Chars => "chars",
            OffsetUnit::Utf16 => "utf16",
            OffsetUnit::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

impl FromStr for OffsetUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chars" | "char" | "characters" => Ok(OffsetUnit::Chars),
            "utf16" | "utf-16" => Ok(OffsetUnit::Utf16),
            "bytes" | "byte" | "utf8" | "utf-8" => Ok(OffsetUnit::Bytes),
            other => Err(format!("unknown offset unit '{}'", other)),
        }
    }
}

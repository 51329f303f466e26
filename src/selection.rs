//! Turns editor selections into the literal texts the engine works on.

use crate::text::{LineIndex, OffsetEncoding, Position};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A selected range; `start == end` is a bare cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: Position,
    pub end: Position,
}

impl SelectionRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn cursor(position: Position) -> Self {
        Self::new(position, position)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Byte span of the word touching `offset`, if any.
pub fn word_range_at(text: &str, offset: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let offset = offset.min(bytes.len());
    let mut start = offset;
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    let mut end = offset;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }
    (start < end).then_some((start, end))
}

/// Selected texts in selection order.
///
/// A bare cursor selects the word under it; multi-line selections and cursors
/// away from any word are dropped.
pub fn capture_selections(
    text: &str,
    ranges: &[SelectionRange],
    encoding: OffsetEncoding,
) -> Vec<String> {
    let index = LineIndex::new(text);
    let mut selected = Vec::new();

    for range in ranges {
        if !range.is_single_line() {
            debug!(?range, "skipping multi-line selection");
            continue;
        }

        let start = index.offset_at(range.start, encoding);
        let end = index.offset_at(range.end, encoding);
        let span = if range.is_empty() {
            word_range_at(text, start)
        } else {
            Some((start.min(end), start.max(end)))
        };

        match span {
            Some((start, end)) => selected.push(text[start..end].to_string()),
            None => debug!(?range, "no word at cursor"),
        }
    }

    selected
}

//! # Text Positions
//!
//! Conversions between byte offsets (what the engine produces), editor
//! positions, and the offset units different clients count in.

use crate::refactoring::Edit;
use serde::{Deserialize, Serialize};

/// Unit that client-facing offsets and positions are counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetEncoding {
    /// UTF-8 bytes
    #[default]
    Utf8,
    /// UTF-16 code units, as used by LSP and VS Code
    Utf16,
    /// Unicode scalar values
    Chars,
}

impl OffsetEncoding {
    fn width(self, c: char) -> usize {
        match self {
            OffsetEncoding::Utf8 => c.len_utf8(),
            OffsetEncoding::Utf16 => c.len_utf16(),
            OffsetEncoding::Chars => 1,
        }
    }

    /// Length of `text` in this unit.
    pub fn measure(self, text: &str) -> usize {
        match self {
            OffsetEncoding::Utf8 => text.len(),
            _ => text.chars().map(|c| self.width(c)).sum(),
        }
    }

    /// Byte offset of the `units`-th unit in `text`, clamped to the end.
    ///
    /// A unit count that lands inside a character resolves to the start of it.
    pub fn byte_offset(self, text: &str, units: usize) -> usize {
        let mut counted = 0;
        for (index, c) in text.char_indices() {
            let next = counted + self.width(c);
            if next > units {
                return index;
            }
            counted = next;
        }
        text.len()
    }
}

/// Zero-based line/character position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// Line start table for one text snapshot.
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(index, _)| index + 1));
        Self { text, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte span of a line without its terminator.
    pub fn line_span(&self, line: usize) -> Option<(usize, usize)> {
        let start = *self.line_starts.get(line)?;
        let mut end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |next| next - 1);
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        Some((start, end))
    }

    /// Byte offset of a position. Lines and characters past the end clamp.
    pub fn offset_at(&self, position: Position, encoding: OffsetEncoding) -> usize {
        match self.line_span(position.line) {
            Some((start, end)) => {
                start + encoding.byte_offset(&self.text[start..end], position.character)
            }
            None => self.text.len(),
        }
    }
}

/// Re-express a byte offset into `text` in another unit.
pub fn encode_offset(text: &str, offset: usize, encoding: OffsetEncoding) -> usize {
    match text.get(..offset) {
        Some(prefix) => encoding.measure(prefix),
        None => encoding.measure(text),
    }
}

/// Re-express the offsets of an edit list computed against `text`.
pub fn encode_edits(text: &str, edits: &[Edit], encoding: OffsetEncoding) -> Vec<Edit> {
    if encoding == OffsetEncoding::Utf8 {
        return edits.to_vec();
    }
    edits
        .iter()
        .map(|edit| match edit {
            Edit::Insert { text: inserted, offset } => {
                Edit::insert(inserted.clone(), encode_offset(text, *offset, encoding))
            }
            Edit::Replace {
                text: replacement,
                start_offset,
                end_offset,
            } => Edit::replace(
                replacement.clone(),
                encode_offset(text, *start_offset, encoding),
                encode_offset(text, *end_offset, encoding),
            ),
        })
        .collect()
}

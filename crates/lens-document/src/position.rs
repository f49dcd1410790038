//! Line/column positions derived from byte offsets.
//!
//! Every structural element of a document (sections, headings, front matter, matches) is
//! located by a [`Position`]: a start and an end [`Loc`], each carrying the zero-based line,
//! the zero-based column and the byte offset into the document content.

use serde::Serialize;

/// A single location in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Loc {
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based column, in bytes from the start of the line.
    pub col: usize,
    /// Byte offset from the start of the content.
    pub offset: usize,
}

/// A span between two locations (end exclusive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// Where the span starts.
    pub start: Loc,
    /// Where the span ends.
    pub end: Loc,
}

impl Position {
    /// Returns true if `other` lies within this position's lines.
    ///
    /// Containment is line based: a match anywhere on the last line of a section
    /// still belongs to that section.
    pub fn contains_lines(&self, other: &Self) -> bool {
        self.start.line <= other.start.line && other.end.line <= self.end.line
    }

    /// Returns true if the byte span of `other` lies within this position.
    pub fn contains_offsets(&self, other: &Self) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }

    /// Byte length of the span.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Returns true for zero-length spans.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Computes the location of a byte offset.
///
/// Offsets past the end of `content` are clamped to `content.len()`.
pub fn loc_from_offset(content: &str, offset: usize) -> Loc {
    let offset = offset.min(content.len());
    let before = &content.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count();
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |idx| idx + 1);
    Loc {
        line,
        col: offset - line_start,
        offset,
    }
}

/// Converts a `[start, end)` byte range into a [`Position`].
///
/// Total for any input: out-of-range offsets are clamped and a reversed range is
/// normalised so that `start <= end`.
pub fn position_from_offsets(content: &str, start: usize, end: usize) -> Position {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    Position {
        start: loc_from_offset(content, start),
        end: loc_from_offset(content, end),
    }
}

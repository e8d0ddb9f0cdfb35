//! Text span and line map types for source location tracking.
//!
//! Tokens and diagnostics carry a [`TextSpan`] pointing back into the
//! scanned source; [`LineMap`] converts those offsets to line/column pairs.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A span in source text, defined by a start position and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Serialize)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    /// Create a new text span.
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// Create a span from `usize` byte offsets, as produced by string slicing.
    #[inline]
    pub fn from_offsets(start: usize, end: usize) -> Self {
        Self::from_bounds(start as TextPos, end as TextPos)
    }

    /// Create an empty span at a position.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self {
            start: pos,
            length: 0,
        }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    /// Whether this span is empty (zero-length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether this span contains the given position.
    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Convert to a byte range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }

    /// Return a new span covering both this span and the other.
    pub fn union(&self, other: &TextSpan) -> TextSpan {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        TextSpan::from_bounds(start, end)
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// Line and column information derived from source text.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    /// 0-based line number.
    pub line: u32,
    /// 0-based column, counted in characters.
    pub character: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A map from byte offsets to line numbers, built from source text.
///
/// Only `\n` starts a new line, which is the same rule the scanner uses
/// when it counts lines.
#[derive(Debug, Clone)]
pub struct LineMap<'a> {
    text: &'a str,
    /// Byte offsets of the start of each line.
    line_starts: Vec<TextPos>,
}

impl<'a> LineMap<'a> {
    /// Build a line map from source text.
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| (i + 1) as TextPos));
        Self { text, line_starts }
    }

    /// Get the line number (0-based) for a byte offset.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    /// Get the line and column for a byte offset.
    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize] as usize;
        let end = (pos as usize).min(self.text.len());
        let character = self
            .text
            .get(line_start..end)
            .map_or(end - line_start, |prefix| prefix.chars().count());
        LineAndColumn {
            line,
            character: character as u32,
        }
    }

    /// Get the byte offset of the start of a line.
    pub fn line_start(&self, line: u32) -> TextPos {
        self.line_starts[line as usize]
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get all line starts.
    pub fn line_starts(&self) -> &[TextPos] {
        &self.line_starts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span() {
        let span = TextSpan::new(5, 10);
        assert_eq!(span.start, 5);
        assert_eq!(span.length, 10);
        assert_eq!(span.end(), 15);
        assert!(span.contains(5));
        assert!(span.contains(14));
        assert!(!span.contains(15));
    }

    #[test]
    fn test_text_span_from_offsets() {
        let span = TextSpan::from_offsets(5, 15);
        assert_eq!(span.start, 5);
        assert_eq!(span.length, 10);
        assert_eq!(span.to_range(), 5..15);
    }

    #[test]
    fn test_empty_span() {
        let span = TextSpan::empty(7);
        assert!(span.is_empty());
        assert!(!span.contains(7));
        assert_eq!(format!("{:?}", span), "7..7");
    }

    #[test]
    fn test_union() {
        let a = TextSpan::from_bounds(2, 4);
        let b = TextSpan::from_bounds(8, 9);
        assert_eq!(a.union(&b), TextSpan::from_bounds(2, 9));
    }

    #[test]
    fn test_line_map() {
        let text = "line1\nline2\nline3";
        let map = LineMap::new(text);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(5), 0); // newline char
        assert_eq!(map.line_of(6), 1); // start of line2
        assert_eq!(map.line_of(12), 2);
        assert_eq!(map.line_start(2), 12);

        let lc = map.line_and_column_of(8);
        assert_eq!(lc, LineAndColumn::new(1, 2));
    }

    #[test]
    fn test_line_map_counts_characters() {
        let text = "héllo @";
        let map = LineMap::new(text);
        let at = text.find('@').unwrap() as TextPos;
        assert_eq!(map.line_and_column_of(at), LineAndColumn::new(0, 6));
    }

    #[test]
    fn test_line_map_trailing_newline() {
        let map = LineMap::new("a\n");
        assert_eq!(map.line_count(), 2);
        assert_eq!(map.line_of(2), 1);
    }
}

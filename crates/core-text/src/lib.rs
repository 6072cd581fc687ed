//! Rope-based text buffer abstraction.
//!
//! Two coordinate systems coexist: absolute byte offsets (used by the command
//! interpreter for ranges, registers and undo) and `Position` (line, byte in
//! line) used by views for cursor display. Conversions live on `Buffer`.

use anyhow::Result;
use ropey::Rope;

pub mod block;
pub mod motion;

pub use block::{BlockKind, BufferBlock, Direction};

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

/// A position inside a buffer expressed as (line index, byte offset within that line).
/// Lines and byte offsets are guaranteed (when clamped) to be on UTF-8 code unit boundaries; grapheme
/// safety is enforced by higher-level navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub byte: usize,
}

impl Position {
    pub fn new(line: usize, byte: usize) -> Self {
        Self { line, byte }
    }
    pub fn origin() -> Self {
        Self { line: 0, byte: 0 }
    }
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.byte = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.byte > max_len {
            self.byte = max_len;
        }
    }
}

/// Named offsets relative to a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLocation {
    /// First byte of the line.
    LineBegin,
    /// First non-blank character, or the terminator when the line is blank.
    LineFirstGraphChar,
    /// Last character before the terminator (line begin for empty lines).
    LineLastNonCr,
    /// The line terminator itself (buffer end for an unterminated last line).
    LineCrBegin,
    /// One past the terminator, i.e. the start of the following line.
    LineEnd,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Ok(Self {
            rope: Rope::from_str(content),
            name: name.into(),
        })
    }

    /// Total length in bytes.
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Whole buffer contents as an owned string.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Return the requested line as an owned `String` (including trailing newline if present).
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx < self.rope.len_lines() {
            Some(self.rope.line(idx).to_string())
        } else {
            None
        }
    }

    /// Byte length of a line (excluding any newline) for clamping purposes.
    pub fn line_byte_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(idx);
        // ropey lines include the trailing newline except possibly the last line.
        let s = line.to_string();
        if s.ends_with('\n') {
            s.len() - 1
        } else {
            s.len()
        }
    }

    fn line_content_string(&self, idx: usize) -> String {
        let mut s = self.rope.line(idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    /// Line index containing the absolute byte offset (clamped to the buffer).
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.rope.byte_to_line(offset.min(self.rope.len_bytes()))
    }

    /// Resolve a named location on `line` to an absolute byte offset.
    pub fn line_location(&self, line: usize, loc: LineLocation) -> usize {
        let line = line.min(self.rope.len_lines().saturating_sub(1));
        let begin = self.rope.line_to_byte(line);
        let content = self.line_content_string(line);
        let cr_begin = begin + content.len();
        match loc {
            LineLocation::LineBegin => begin,
            LineLocation::LineFirstGraphChar => content
                .char_indices()
                .find(|(_, c)| !c.is_whitespace())
                .map(|(i, _)| begin + i)
                .unwrap_or(cr_begin),
            LineLocation::LineLastNonCr => begin + grapheme::prev_boundary(&content, content.len()),
            LineLocation::LineCrBegin => cr_begin,
            LineLocation::LineEnd => {
                if line + 1 < self.rope.len_lines() {
                    self.rope.line_to_byte(line + 1)
                } else {
                    self.rope.len_bytes()
                }
            }
        }
    }

    /// Named location on the line that contains `offset`.
    pub fn location_at(&self, offset: usize, loc: LineLocation) -> usize {
        self.line_location(self.line_of_offset(offset), loc)
    }

    /// True when the line has a terminator (every line but possibly the last).
    pub fn line_has_terminator(&self, line: usize) -> bool {
        self.line_location(line, LineLocation::LineEnd)
            > self.line_location(line, LineLocation::LineCrBegin)
    }

    /// Convert an absolute byte offset into a display `Position`.
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_bytes());
        let line = self.rope.byte_to_line(offset);
        Position::new(line, offset - self.rope.line_to_byte(line))
    }

    /// Convert a display `Position` into an absolute byte offset, clamping both coordinates.
    pub fn offset_of(&self, pos: Position) -> usize {
        let mut pos = pos;
        pos.clamp_to(self.line_count(), |l| self.line_byte_len(l));
        self.rope.line_to_byte(pos.line) + pos.byte
    }

    /// Character starting at `offset`, if any.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.rope.len_bytes() {
            return None;
        }
        Some(self.rope.char(self.rope.byte_to_char(offset)))
    }

    /// Move `offset` by `delta` characters, clamped to `[0, len]`.
    pub fn offset_by_chars(&self, offset: usize, delta: isize) -> usize {
        let current = self.rope.byte_to_char(offset.min(self.rope.len_bytes())) as isize;
        let target = (current + delta).clamp(0, self.rope.len_chars() as isize) as usize;
        self.rope.char_to_byte(target)
    }

    /// Insert `text` at an absolute byte offset. Returns the offset just past the inserted text.
    pub fn insert(&mut self, offset: usize, text: &str) -> usize {
        let offset = offset.min(self.rope.len_bytes());
        let char_index = self.rope.byte_to_char(offset);
        self.rope.insert(char_index, text);
        offset + text.len()
    }

    /// Return the UTF-8 slice in the absolute byte range `[start,end)`.
    /// Caller guarantees `start <= end` and both on character boundaries.
    pub fn slice_bytes(&self, start: usize, end: usize) -> String {
        if start >= end {
            return String::new();
        }
        let total = self.rope.len_bytes();
        let s = start.min(total);
        let e = end.min(total);
        if s >= e {
            return String::new();
        }
        // Translate byte offsets to char indices (rope.slice expects char range)
        let start_char = self.rope.byte_to_char(s);
        let end_char = self.rope.byte_to_char(e);
        debug_assert_eq!(self.rope.char_to_byte(start_char), s);
        debug_assert_eq!(self.rope.char_to_byte(end_char), e);
        self.rope.slice(start_char..end_char).to_string()
    }

    /// Delete the UTF-8 slice in absolute byte range `[start,end)` (clamped).
    /// Returns the removed text for register / undo integration.
    pub fn delete_bytes(&mut self, start: usize, end: usize) -> String {
        if start >= end {
            return String::new();
        }
        let total = self.rope.len_bytes();
        let s = start.min(total);
        let e = end.min(total);
        if s >= e {
            return String::new();
        }
        let start_char = self.rope.byte_to_char(s);
        let end_char = self.rope.byte_to_char(e);
        debug_assert_eq!(self.rope.char_to_byte(start_char), s);
        debug_assert_eq!(self.rope.char_to_byte(end_char), e);
        let removed = self.rope.slice(start_char..end_char).to_string();
        self.rope.remove(start_char..end_char);
        removed
    }

    pub(crate) fn rope(&self) -> &Rope {
        &self.rope
    }
}

/// Grapheme and width utilities. These are pure helpers operating on a single line.
pub mod grapheme {
    use unicode_segmentation::UnicodeSegmentation;
    use unicode_width::UnicodeWidthStr;

    /// Previous grapheme boundary (returns 0 if already at or below 1st boundary).
    pub fn prev_boundary(line: &str, byte: usize) -> usize {
        if byte == 0 || byte > line.len() {
            return 0;
        }
        let mut last = 0;
        for (idx, _) in line.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Next grapheme boundary (returns line.len() if at or beyond end).
    pub fn next_boundary(line: &str, byte: usize) -> usize {
        if byte >= line.len() {
            return line.len();
        }
        for (idx, _) in line.grapheme_indices(true) {
            if idx > byte {
                return idx;
            }
        }
        line.len()
    }

    /// Compute visual column (terminal cells) up to (but not including) byte offset.
    pub fn visual_col(line: &str, byte: usize) -> usize {
        let mut col = 0;
        for (idx, g) in line.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            col += cluster_width(g);
        }
        col
    }

    /// Width in terminal cells of this grapheme cluster (at least one cell).
    pub fn cluster_width(g: &str) -> usize {
        g.width().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::grapheme;
    use super::*;

    #[test]
    fn create_buffer_and_read_line() {
        let b = Buffer::from_str("test", "hello\nworld").unwrap();
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0).unwrap(), "hello\n");
        assert_eq!(b.line(1).unwrap(), "world");
    }

    #[test]
    fn grapheme_combining_mark() {
        let s = "e\u{0301}"; // 'e' + U+0301 combining acute
        let nb = grapheme::next_boundary(s, 0);
        assert_eq!(nb, s.len()); // should be single cluster
        assert_eq!(grapheme::prev_boundary(s, nb), 0);
    }

    #[test]
    fn visual_col_counts_wide_cjk() {
        let s = "\u{6F22}\u{5B57}x";
        let after_cjk = grapheme::next_boundary(s, grapheme::next_boundary(s, 0));
        assert_eq!(grapheme::visual_col(s, after_cjk), 4);
    }

    #[test]
    fn line_locations_terminated_line() {
        let b = Buffer::from_str("t", "  ab\ncd").unwrap();
        assert_eq!(b.line_location(0, LineLocation::LineBegin), 0);
        assert_eq!(b.line_location(0, LineLocation::LineFirstGraphChar), 2);
        assert_eq!(b.line_location(0, LineLocation::LineLastNonCr), 3);
        assert_eq!(b.line_location(0, LineLocation::LineCrBegin), 4);
        assert_eq!(b.line_location(0, LineLocation::LineEnd), 5);
        assert!(b.line_has_terminator(0));
    }

    #[test]
    fn line_locations_last_line_without_terminator() {
        let b = Buffer::from_str("t", "ab\ncd").unwrap();
        assert_eq!(b.line_location(1, LineLocation::LineBegin), 3);
        assert_eq!(b.line_location(1, LineLocation::LineCrBegin), 5);
        assert_eq!(b.line_location(1, LineLocation::LineEnd), 5);
        assert!(!b.line_has_terminator(1));
        assert_eq!(b.location_at(4, LineLocation::LineBegin), 3);
    }

    #[test]
    fn blank_line_first_graph_char_is_terminator() {
        let b = Buffer::from_str("t", "   \nx").unwrap();
        assert_eq!(b.line_location(0, LineLocation::LineFirstGraphChar), 3);
    }

    #[test]
    fn position_offset_round_trip() {
        let b = Buffer::from_str("t", "ab\ncde\n").unwrap();
        let pos = b.position_of(4);
        assert_eq!(pos, Position::new(1, 1));
        assert_eq!(b.offset_of(pos), 4);
        // Clamped past the end of a line.
        assert_eq!(b.offset_of(Position::new(0, 99)), 2);
    }

    #[test]
    fn offset_by_chars_handles_multibyte_and_clamps() {
        let b = Buffer::from_str("t", "a\u{00E9}b").unwrap();
        assert_eq!(b.offset_by_chars(0, 1), 1);
        assert_eq!(b.offset_by_chars(1, 1), 3);
        assert_eq!(b.offset_by_chars(3, -1), 1);
        assert_eq!(b.offset_by_chars(0, -5), 0);
        assert_eq!(b.offset_by_chars(0, 50), b.len_bytes());
    }

    #[test]
    fn insert_returns_offset_after_text() {
        let mut b = Buffer::from_str("t", "abc").unwrap();
        let after = b.insert(1, "XY");
        assert_eq!(after, 3);
        assert_eq!(b.text(), "aXYbc");
        // Offsets past the end append.
        let after = b.insert(99, "!");
        assert_eq!(after, 6);
        assert_eq!(b.text(), "aXYbc!");
    }

    #[test]
    fn delete_bytes_returns_removed_text() {
        let mut b = Buffer::from_str("t", "hello world").unwrap();
        let removed = b.delete_bytes(5, 11);
        assert_eq!(removed, " world");
        assert_eq!(b.text(), "hello");
        assert_eq!(b.delete_bytes(3, 3), "");
        assert_eq!(b.char_at(4), Some('o'));
        assert_eq!(b.char_at(5), None);
    }
}

//! Operator span resolver.
//!
//! Turns an operator target (`dd`, `cw`, `diw`, a visual selection, ...) into
//! an absolute byte range `[begin, end)` plus the cursor offset to place after
//! the operator runs. Word targets are derived from `Buffer::get_block`; the
//! same block arithmetic backs the `w`/`b`/`e`/`ge` motions so operators and
//! motions always agree on where a word starts and ends.
//!
//! The resolver never mutates the buffer. Block fields may be `-1` when a
//! backward scan runs off the buffer start; arithmetic stays signed until the
//! final clamp.

use core_text::{BlockKind, Buffer, BufferBlock, Direction, LineLocation};

/// What an operator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The active visual selection.
    Visual,
    /// Whole line including its terminator (`dd`, `cc`, `yy`).
    Line,
    /// Line text without the terminator (`S`).
    LineContent,
    /// Cursor up to the terminator (`D`, `C`, `y$`).
    ToLineEnd,
    /// Cursor up to the next word start, which may be on a later line (`dw`).
    Word(BlockKind),
    /// Cursor to the end of the current word or space run (`cw`).
    ChangeWord(BlockKind),
    AroundWord(BlockKind),
    InnerWord(BlockKind),
    /// The character under the cursor (`s`).
    Cursor,
}

/// Resolved operator range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub begin: usize,
    pub end: usize,
    pub cursor_after: usize,
    pub line_wise: bool,
}

impl Range {
    fn chars(begin: usize, end: usize) -> Self {
        Self {
            begin,
            end: end.max(begin),
            cursor_after: begin,
            line_wise: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }
}

/// Inclusive visual span as computed from the anchor and cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub begin: usize,
    /// Offset of the last selected character.
    pub last: usize,
    pub line_wise: bool,
}

/// Visual mode anchor. The cursor is the moving end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisualSelection {
    pub anchor: usize,
    pub line_wise: bool,
}

impl VisualSelection {
    /// Selected span for a cursor at `cursor`. Linewise spans run from the start
    /// of the first line to the terminator of the last one.
    pub fn span(&self, buffer: &Buffer, cursor: usize) -> Span {
        let lo = self.anchor.min(cursor);
        let hi = self.anchor.max(cursor);
        if !self.line_wise {
            return Span {
                begin: lo,
                last: hi,
                line_wise: false,
            };
        }
        let first = buffer.location_at(lo, LineLocation::LineBegin);
        let last_begin = buffer.location_at(hi, LineLocation::LineBegin);
        let last_end = buffer.location_at(hi, LineLocation::LineEnd);
        Span {
            begin: first,
            last: last_begin.max(buffer.offset_by_chars(last_end, -1)),
            line_wise: true,
        }
    }
}

/// Resolve `target` around `cursor`. `None` only for `Target::Visual` without
/// an active selection.
pub fn resolve(
    target: Target,
    buffer: &Buffer,
    cursor: usize,
    visual: Option<Span>,
) -> Option<Range> {
    let range = match target {
        Target::Visual => {
            let span = visual?;
            Range {
                line_wise: span.line_wise,
                ..Range::chars(span.begin, buffer.offset_by_chars(span.last, 1))
            }
        }
        Target::Line => Range {
            line_wise: true,
            ..Range::chars(
                buffer.location_at(cursor, LineLocation::LineBegin),
                buffer.location_at(cursor, LineLocation::LineEnd),
            )
        },
        Target::LineContent => Range::chars(
            buffer.location_at(cursor, LineLocation::LineBegin),
            buffer.location_at(cursor, LineLocation::LineCrBegin),
        ),
        Target::ToLineEnd => {
            Range::chars(cursor, buffer.location_at(cursor, LineLocation::LineCrBegin))
        }
        Target::Cursor => match buffer.char_at(cursor) {
            Some(c) if c != '\n' => Range::chars(cursor, cursor + c.len_utf8()),
            _ => Range::chars(cursor, cursor),
        },
        Target::Word(kind) => {
            Range::chars(cursor, word_motion(buffer, kind, cursor, Direction::Forward))
        }
        Target::ChangeWord(kind) => {
            let block = buffer.get_block(kind, cursor, Direction::Forward);
            let end = if block.space_before {
                block.first_block
            } else {
                block.first_non_block
            };
            Range::chars(cursor, clamp(end))
        }
        Target::AroundWord(kind) => {
            let block = buffer.get_block(kind, cursor, Direction::Forward);
            let (begin, end) = if block.space_before {
                (block.block_search_pos, block.first_non_block)
            } else {
                (block.first_block, block.second_block)
            };
            Range::chars(clamp(begin), clamp(end))
        }
        Target::InnerWord(kind) => {
            let block = buffer.get_block(kind, cursor, Direction::Forward);
            let (begin, end) = if block.space_before {
                (block.space_before_start, block.first_block)
            } else {
                (block.first_block, block.first_non_block)
            };
            Range::chars(clamp(begin), clamp(end))
        }
    };
    Some(range)
}

/// `w` (forward) and `b` (backward) from `pos`.
pub fn word_motion(buffer: &Buffer, kind: BlockKind, pos: usize, direction: Direction) -> usize {
    let block = buffer.get_block(kind, pos, direction);
    let target = match direction {
        Direction::Forward => {
            if block.space_before {
                block.first_block
            } else {
                block.second_block
            }
        }
        Direction::Backward => {
            let word_start = step(buffer, block.first_non_block, 1);
            if pos as isize == word_start {
                step(buffer, block.second_non_block, 1)
            } else {
                word_start
            }
        }
    };
    clamp(target)
}

/// `e` (forward) and `ge` (backward) from `pos`.
pub fn word_end_motion(
    buffer: &Buffer,
    kind: BlockKind,
    pos: usize,
    direction: Direction,
) -> usize {
    let block = buffer.get_block(kind, pos, direction);
    let target = match direction {
        Direction::Forward => {
            let word_end = step(buffer, block.first_non_block, -1);
            if pos as isize == word_end {
                step(buffer, block.second_non_block, -1)
            } else {
                word_end
            }
        }
        Direction::Backward => backward_word_end(&block),
    };
    clamp(target)
}

fn backward_word_end(block: &BufferBlock) -> isize {
    if block.space_before {
        block.first_block
    } else {
        block.second_block
    }
}

// Character step that tolerates the `-1` sentinel.
fn step(buffer: &Buffer, offset: isize, delta: isize) -> isize {
    if offset < 0 {
        offset + delta
    } else {
        buffer.offset_by_chars(offset as usize, delta) as isize
    }
}

fn clamp(offset: isize) -> usize {
    offset.max(0) as usize
}
